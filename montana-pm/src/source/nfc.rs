use montana_hal::nfc::{AnticollisionResponse, FieldLevel, NfcPort};
use montana_hal::{StickyStatus, WakeupSet, WakeupSourceKind};

/// RF field detected by the NFC front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NfcField {
    uid: [u8; 10],
    level: FieldLevel,
}

impl NfcField {
    pub const fn new(uid: [u8; 10]) -> Self {
        Self {
            uid,
            level: FieldLevel(0),
        }
    }

    pub const fn field_level(mut self, level: FieldLevel) -> Self {
        self.level = level;
        self
    }

    pub const fn uid(&self) -> &[u8; 10] {
        &self.uid
    }

    pub(crate) fn init<P: NfcPort + StickyStatus + ?Sized>(&self, hw: &mut P) {
        hw.enable_front_end();
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::NfcField));
        hw.set_field_wakeup(Some(self.level));
        hw.load_anticollision(&AnticollisionResponse::new(self.uid));
    }

    pub(crate) fn on_wake<P: StickyStatus + ?Sized>(&self, hw: &mut P) {
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::NfcField));
    }

    pub(crate) fn shutdown<P: NfcPort + ?Sized>(&self, hw: &mut P) {
        hw.set_field_wakeup(None);
    }
}
