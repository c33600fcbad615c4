use montana_hal::rtc::{self, AlarmMode, RtcClockSource, RtcPort};
use montana_hal::{PollBudget, StickyStatus, WakeupSet, WakeupSourceKind};

use crate::error::PmError;
use crate::platform::Platform;

/// Periodic RTC alarm.
///
/// The alarm is one-shot in hardware: after every wake the main loop must run
/// [`RtcAlarm::reconfigure`] before the next sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcAlarm {
    interval_ms: u32,
    clock: RtcClockSource,
}

impl RtcAlarm {
    pub const DEFAULT_INTERVAL_MS: u32 = 10_000;

    /// Alarm every `interval_ms` milliseconds, validated on `init`.
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            clock: RtcClockSource::Xtal32k,
        }
    }

    pub const fn clock_source(mut self, clock: RtcClockSource) -> Self {
        self.clock = clock;
        self
    }

    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub const fn clock(&self) -> RtcClockSource {
        self.clock
    }

    /// Counter value for the configured interval.
    pub fn ticks(&self) -> Result<u32, PmError> {
        Ok(rtc::interval_ticks(self.interval_ms)?)
    }

    pub(crate) fn init<P>(&self, hw: &mut P) -> Result<(), PmError>
    where
        P: RtcPort + StickyStatus + ?Sized,
    {
        self.ticks()?;
        rtc::init(hw, self.clock);
        Ok(())
    }

    pub(crate) fn on_wake<P: StickyStatus + ?Sized>(&self, hw: &mut P) {
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::RtcAlarm));
    }

    pub(crate) fn shutdown<P: RtcPort + ?Sized>(&self, hw: &mut P) {
        hw.set_alarm(AlarmMode::Disabled);
        hw.stop();
    }

    /// Load the configured interval and re-arm the alarm.
    pub fn reconfigure<P>(&self, hw: &mut P, budget: PollBudget) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        rtc::reconfigure(hw, self.ticks()?, budget)?;
        Ok(())
    }

    /// Change the interval to `interval_ms` and re-arm the alarm with it.
    ///
    /// An out-of-range interval leaves both the configuration and the
    /// hardware untouched.
    pub fn reconfigure_ms<P: Platform + ?Sized>(
        &mut self,
        hw: &mut P,
        interval_ms: u32,
        budget: PollBudget,
    ) -> Result<(), PmError> {
        let ticks = rtc::interval_ticks(interval_ms)?;
        self.interval_ms = interval_ms;
        rtc::reconfigure(hw, ticks, budget)?;
        Ok(())
    }
}

impl Default for RtcAlarm {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL_MS)
    }
}
