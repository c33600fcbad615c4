//! Time units and cycle delays.

/// Hertz
#[derive(PartialEq, PartialOrd, Clone, Copy, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hertz(pub u32);

impl Hertz {
    /// Create a `Hertz` from the given hertz.
    pub const fn hz(hertz: u32) -> Self {
        Self(hertz)
    }

    /// Create a `Hertz` from the given kilohertz.
    pub const fn khz(kilohertz: u32) -> Self {
        Self(kilohertz * 1_000)
    }

    /// Create a `Hertz` from the given megahertz.
    pub const fn mhz(megahertz: u32) -> Self {
        Self(megahertz * 1_000_000)
    }
}

/// Frequency of the always-on slow clock driving the RTC and baseband timer.
pub const LOW_POWER_CLOCK: Hertz = Hertz(32_768);

/// Busy-wait for a number of CPU cycles.
pub trait Delay {
    fn delay_cycles(&mut self, cycles: u32);
}

/// CPU cycles spanning `periods` periods of the low-power clock at `core`.
///
/// Integer division first, matching `(SystemCoreClock / 32768) * n`.
pub const fn low_power_periods_in_cycles(core: Hertz, periods: u32) -> u32 {
    (core.0 / LOW_POWER_CLOCK.0) * periods
}
