use montana_hal::gpio::{GpioWakeupPort, Pull};
use montana_hal::{StickyStatus, WakeupSet, WakeupSourceKind};

/// Edge on the GPIO wake pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioEdge {
    pin: u8,
    pull: Pull,
}

impl GpioEdge {
    pub const fn new(pin: u8) -> Self {
        Self { pin, pull: Pull::Up }
    }

    pub const fn pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    pub const fn pin(&self) -> u8 {
        self.pin
    }

    pub(crate) fn init<P: GpioWakeupPort + ?Sized>(&self, hw: &mut P) {
        hw.configure_wake_pin(self.pin, self.pull);
    }

    pub(crate) fn on_wake<P: StickyStatus + ?Sized>(&self, hw: &mut P) {
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::GpioEdge));
    }
}

impl Default for GpioEdge {
    fn default() -> Self {
        Self::new(1)
    }
}
