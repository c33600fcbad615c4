//! RTC alarm counter in the always-on domain.
//!
//! The counter runs from the 32.768 kHz slow clock and counts down from its
//! reload value; the alarm fires at zero. Reload writes only become safe when
//! sequenced against slow-clock edges, see [`reconfigure`].

mod reconfig;

pub use reconfig::{reconfigure, ClockMirror};

use crate::error::Error;
use crate::time::LOW_POWER_CLOCK;
use crate::wakeup::{StickyStatus, WakeupSet, WakeupSourceKind};

/// Benign preload held by the reload register between reconfigurations.
pub const IDLE_PRELOAD: u32 = 0xDEAD_BEEF;

/// Shortest supported alarm interval (ms).
pub const MIN_INTERVAL_MS: u32 = 5;
/// Longest supported alarm interval (ms).
pub const MAX_INTERVAL_MS: u32 = 300_000;

/// Clock feeding the RTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcClockSource {
    /// Internal 32 kHz RC oscillator.
    RcOscillator,
    /// 32.768 kHz crystal.
    #[default]
    Xtal32k,
    /// External clock on GPIO0.
    ExternalGpio0,
    /// External clock on GPIO1.
    ExternalGpio1,
}

/// Alarm compare configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmMode {
    Disabled,
    /// Fire when the counter reaches zero.
    Zero,
}

pub trait RtcPort {
    /// Bring up `source` (start the RC oscillator or switch the GPIO to input).
    /// Leaves other oscillator settings alone.
    fn enable_clock_source(&mut self, source: RtcClockSource);
    /// Stop the counter.
    fn stop(&mut self);
    /// Pulse the counter reset.
    fn pulse_reset(&mut self);
    /// Write the reload register. Takes effect at the next reset pulse.
    fn write_reload(&mut self, value: u32);
    /// Start counting from `source` with `alarm`.
    fn start(&mut self, source: RtcClockSource, alarm: AlarmMode);
    /// Change the alarm compare without touching the rest of the control word.
    fn set_alarm(&mut self, alarm: AlarmMode);
    /// Force the counter clock node active.
    fn force_clock(&mut self);
}

/// Slow-clock ticks in `ms` milliseconds, truncated.
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ((ms as u64 * LOW_POWER_CLOCK.0 as u64) / 1000) as u32
}

/// [`ms_to_ticks`] for an alarm interval, rejecting unsupported intervals.
pub fn interval_ticks(ms: u32) -> Result<u32, Error> {
    if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&ms) {
        return Err(Error::IntervalOutOfRange {
            ms,
            min_ms: MIN_INTERVAL_MS,
            max_ms: MAX_INTERVAL_MS,
        });
    }
    Ok(ms_to_ticks(ms))
}

/// Cold configuration: counter parked at the idle preload, alarm at zero.
///
/// The real interval is installed afterwards with [`reconfigure`].
pub fn init<P>(hw: &mut P, source: RtcClockSource)
where
    P: RtcPort + StickyStatus + ?Sized,
{
    hw.enable_clock_source(source);
    hw.stop();
    hw.pulse_reset();
    hw.write_reload(IDLE_PRELOAD);
    hw.start(source, AlarmMode::Zero);
    hw.clear_sticky(WakeupSet::of(WakeupSourceKind::RtcAlarm));
    debug!("rtc: started from {:?}", source);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_follow_slow_clock() {
        assert_eq!(ms_to_ticks(1000), 32_768);
        assert_eq!(ms_to_ticks(10_000), 327_680);
        // 5 * 32.768 = 163.84
        assert_eq!(ms_to_ticks(5), 163);
    }

    #[test]
    fn interval_bounds() {
        assert_eq!(interval_ticks(MIN_INTERVAL_MS), Ok(163));
        assert_eq!(interval_ticks(MAX_INTERVAL_MS), Ok(9_830_400));
        assert_eq!(
            interval_ticks(4),
            Err(Error::IntervalOutOfRange {
                ms: 4,
                min_ms: MIN_INTERVAL_MS,
                max_ms: MAX_INTERVAL_MS
            })
        );
        assert!(interval_ticks(300_001).is_err());
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<&'static str>,
        reload: u32,
        cleared: WakeupSet,
    }

    impl RtcPort for Recorder {
        fn enable_clock_source(&mut self, _source: RtcClockSource) {
            self.ops.push("source");
        }
        fn stop(&mut self) {
            self.ops.push("stop");
        }
        fn pulse_reset(&mut self) {
            self.ops.push("reset");
        }
        fn write_reload(&mut self, value: u32) {
            self.ops.push("reload");
            self.reload = value;
        }
        fn start(&mut self, _source: RtcClockSource, _alarm: AlarmMode) {
            self.ops.push("start");
        }
        fn set_alarm(&mut self, _alarm: AlarmMode) {
            self.ops.push("alarm");
        }
        fn force_clock(&mut self) {
            self.ops.push("force");
        }
    }

    impl StickyStatus for Recorder {
        fn read_sticky(&self) -> WakeupSet {
            WakeupSet::EMPTY
        }
        fn clear_sticky(&mut self, flags: WakeupSet) {
            self.ops.push("clear");
            self.cleared = self.cleared.union(flags);
        }
    }

    #[test]
    fn init_parks_counter_then_clears_alarm_flag() {
        let mut hw = Recorder::default();
        init(&mut hw, RtcClockSource::RcOscillator);
        assert_eq!(
            hw.ops,
            vec!["source", "stop", "reset", "reload", "start", "clear"]
        );
        assert_eq!(hw.reload, IDLE_PRELOAD);
        assert_eq!(hw.cleared, WakeupSet::of(WakeupSourceKind::RtcAlarm));
    }
}
