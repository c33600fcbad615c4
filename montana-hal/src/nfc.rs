//! NFC front end as a field-presence wake source.
//!
//! Only the pieces needed to wake on an RF field and answer anticollision are
//! modeled; the ISO 14443 protocol stack lives elsewhere.

/// Field strength threshold for the wake comparator (0 is most sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldLevel(pub u8);

/// ISO 14443-A layer 3 anticollision answer: ATQA, 10-byte UID, SAK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnticollisionResponse([u8; 14]);

impl AnticollisionResponse {
    const ATQA: [u8; 2] = [0x44, 0x00];
    /// Not ISO 14443-4 compliant.
    const SAK: [u8; 2] = [0x0F, 0x00];

    pub const fn new(uid: [u8; 10]) -> Self {
        let mut raw = [0u8; 14];
        raw[0] = Self::ATQA[0];
        raw[1] = Self::ATQA[1];
        let mut i = 0;
        while i < uid.len() {
            raw[2 + i] = uid[i];
            i += 1;
        }
        raw[12] = Self::SAK[0];
        raw[13] = Self::SAK[1];
        Self(raw)
    }

    pub const fn as_bytes(&self) -> &[u8; 14] {
        &self.0
    }
}

pub trait NfcPort {
    /// Power the NFC block and its clock extractor.
    fn enable_front_end(&mut self);
    /// Enable (or with `None` disable) wake on an RF field at `level`.
    fn set_field_wakeup(&mut self, level: Option<FieldLevel>);
    /// Enable end-of-communication interrupts and load the layer 3 boot table.
    fn load_anticollision(&mut self, response: &AnticollisionResponse);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anticollision_layout() {
        let uid = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let rsp = AnticollisionResponse::new(uid);
        assert_eq!(
            rsp.as_bytes(),
            &[0x44, 0x00, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 0x0F, 0x00]
        );
    }
}
