//! GPIO pieces used by wakeup sources.

/// Pull configuration.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull
    None,
    /// Weak pull up
    Up,
    /// Pull down
    Down,
}

/// Edge that raises a GPIO interrupt line.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeTrigger {
    /// Line idle, no event.
    None,
    Rising,
    Falling,
}

/// Electrical setup of the pin whose edge wakes the chip.
pub trait GpioWakeupPort {
    /// Put `pin` in wake-input mode (digital input path off, low-pass filter
    /// off) with `pull`.
    fn configure_wake_pin(&mut self, pin: u8, pull: Pull);
}
