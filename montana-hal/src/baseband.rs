//! Baseband low-power timer.
//!
//! The timer keeps counting on the slow clock while the baseband core and its
//! radio sleep. Waking it means crossing back into the fast clock domain, which
//! takes a probabilistic number of slow-clock periods.

/// Deep-sleep timing of the baseband timer, in slow-clock periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BasebandTiming {
    /// Sleep duration before the timer wakes the chip.
    pub deep_sleep_ticks: u32,
    /// Oscillator stabilization allowance.
    pub twosc: u16,
    /// Radio wake-up allowance.
    pub twrm: u16,
}

impl BasebandTiming {
    pub const fn new() -> Self {
        Self {
            // 0xFFFF would be two seconds
            deep_sleep_ticks: 0x4FFFF,
            twosc: 0x60,
            twrm: 0,
        }
    }

    pub const fn deep_sleep_ticks(mut self, ticks: u32) -> Self {
        self.deep_sleep_ticks = ticks;
        self
    }

    pub const fn twosc(mut self, periods: u16) -> Self {
        self.twosc = periods;
        self
    }

    pub const fn twrm(mut self, periods: u16) -> Self {
        self.twrm = periods;
        self
    }
}

impl Default for BasebandTiming {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BasebandPort {
    /// Enable baseband clock generation, optionally with the deep-sleep request.
    fn enable_clock(&mut self, deep_sleep: bool);
    /// Assert or release the force-wake request.
    fn set_force_wake(&mut self, asserted: bool);
    /// Hold the timer in reset and soft-reset the baseband core.
    fn reset_timer(&mut self);
    /// Release the timer reset.
    fn release_timer_reset(&mut self);
    /// Program sleep duration and stabilization windows, then request deep
    /// sleep with oscillator and radio shutdown allowed.
    fn program_sleep(&mut self, timing: &BasebandTiming);

    fn oscillator_enabled(&self) -> bool;
    fn radio_enabled(&self) -> bool;
    /// `true` while the timer runs from the slow clock, `false` once the fast
    /// (master) clock is observed.
    fn on_low_power_clock(&self) -> bool;
}
