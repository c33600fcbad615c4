use montana_hal::rtc::RtcPort;
use montana_hal::sensor::{DetectorState, SensorConfig, SensorPort};
use montana_hal::time::Delay;
use montana_hal::{StickyStatus, WakeupSet, WakeupSourceKind};

use super::SourceCtx;

/// Bring up the sensor front end on the slow clock.
///
/// The sensor timer shares the RTC clock; when the RTC alarm is in use the
/// RTC is already running and is left alone.
fn configure_front_end<P>(hw: &mut P, config: &SensorConfig, ctx: &SourceCtx)
where
    P: RtcPort + SensorPort + ?Sized,
{
    if !ctx.enabled.contains(WakeupSourceKind::RtcAlarm) {
        hw.enable_clock_source(ctx.rtc_clock);
        hw.stop();
        hw.pulse_reset();
    }
    hw.configure_sensor(config);
    hw.reset_fifo();
}

/// Sample FIFO reached its configured depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorFifo {
    config: SensorConfig,
    last_level: Option<u8>,
}

impl SensorFifo {
    /// Attempts at reading two equal consecutive FIFO levels.
    const LEVEL_READS: usize = 10;

    pub const fn new(config: SensorConfig) -> Self {
        Self {
            config,
            last_level: None,
        }
    }

    pub const fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// FIFO level observed by the most recent wake.
    pub const fn last_level(&self) -> Option<u8> {
        self.last_level
    }

    pub(crate) fn init<P>(&self, hw: &mut P, ctx: &SourceCtx)
    where
        P: RtcPort + SensorPort + StickyStatus + ?Sized,
    {
        configure_front_end(hw, &self.config, ctx);
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::SensorFifoFull));
        if !ctx.enabled.contains(WakeupSourceKind::AdcThreshold) {
            hw.set_threshold_enabled(false);
        }
        hw.set_fifo_wakeup(true);
    }

    pub(crate) fn on_wake<P: SensorPort + StickyStatus + ?Sized>(&mut self, hw: &mut P) {
        self.last_level = Some(stable_level(hw, Self::LEVEL_READS));
        hw.reset_fifo();
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::SensorFifoFull));
    }

    pub(crate) fn shutdown<P: SensorPort + ?Sized>(&self, hw: &mut P) {
        hw.set_fifo_wakeup(false);
    }
}

/// The level counter is asynchronous to the CPU clock: read until two
/// consecutive values agree, giving up after `attempts` extra reads.
fn stable_level<P: SensorPort + ?Sized>(hw: &P, attempts: usize) -> u8 {
    let mut level = hw.fifo_level();
    for _ in 0..attempts {
        let previous = level;
        level = hw.fifo_level();
        if level == previous {
            break;
        }
    }
    level
}

/// ADC sample crossed the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcThreshold {
    config: SensorConfig,
}

impl AdcThreshold {
    pub const fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    pub(crate) fn init<P>(&self, hw: &mut P, ctx: &SourceCtx)
    where
        P: RtcPort + SensorPort + StickyStatus + ?Sized,
    {
        configure_front_end(hw, &self.config, ctx);
        hw.set_threshold_enabled(true);
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::AdcThreshold));
    }

    pub(crate) fn on_wake<P: StickyStatus + ?Sized>(&self, hw: &mut P) {
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::AdcThreshold));
    }

    pub(crate) fn shutdown<P: SensorPort + ?Sized>(&self, hw: &mut P) {
        hw.set_threshold_enabled(false);
    }
}

/// Sensor connection detected on the working electrode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorDetect {
    settle_cycles: u32,
}

impl SensorDetect {
    pub const fn new() -> Self {
        Self { settle_cycles: 100 }
    }

    /// CPU cycles the electrode voltage gets to settle before the detector
    /// leaves reset.
    pub const fn settle_cycles(mut self, cycles: u32) -> Self {
        self.settle_cycles = cycles;
        self
    }

    pub(crate) fn init<P: SensorPort + Delay + StickyStatus + ?Sized>(&self, hw: &mut P) {
        hw.set_detector(DetectorState::ResetDisabled);
        hw.set_detector(DetectorState::ResetEnabled);
        hw.delay_cycles(self.settle_cycles);
        hw.set_detector(DetectorState::Running);
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::SensorDetect));
    }

    pub(crate) fn on_wake<P: StickyStatus + ?Sized>(&self, hw: &mut P) {
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::SensorDetect));
    }

    pub(crate) fn shutdown<P: SensorPort + ?Sized>(&self, hw: &mut P) {
        hw.set_detector(DetectorState::Disabled);
    }
}

impl Default for SensorDetect {
    fn default() -> Self {
        Self::new()
    }
}
