//! Power manager configuration.

use montana_hal::power_mode::{SleepConfig, SleepMode};
use montana_hal::pwr::{PowerBlock, PowerBlockId};
use montana_hal::rtc::RtcClockSource;
use montana_hal::time::Hertz;
use montana_hal::{PollBudget, WakeupSet, WakeupSourceKind};

use crate::source::{SourceCtx, WakeupSource};

/// Assembled once at boot; the power manager never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PmConfig {
    pub(crate) sources: [Option<WakeupSource>; 7],
    pub(crate) mode: SleepMode,
    pub(crate) core_clock: Hertz,
    pub(crate) nfc_dwell_secs: u32,
    pub(crate) poll_budget: PollBudget,
    pub(crate) handshake_budget: PollBudget,
    pub(crate) wake_retries: u8,
    pub(crate) power_down: [Option<PowerBlock>; 2],
    pub(crate) sleep: Option<SleepConfig>,
}

impl PmConfig {
    pub const fn new() -> Self {
        Self {
            sources: [None; 7],
            mode: SleepMode::CoreRetention,
            core_clock: Hertz::mhz(8),
            nfc_dwell_secs: 3,
            poll_budget: PollBudget::Unbounded,
            handshake_budget: PollBudget::Unbounded,
            wake_retries: 3,
            power_down: [None; 2],
            sleep: None,
        }
    }

    /// Enable a wake source, replacing any earlier source of the same kind.
    pub const fn source(mut self, source: WakeupSource) -> Self {
        self.sources[source.kind().index()] = Some(source);
        self
    }

    pub const fn sleep_mode(mut self, mode: SleepMode) -> Self {
        self.mode = mode;
        self
    }

    /// CPU clock used to turn slow-clock periods and seconds into cycles.
    pub const fn core_clock(mut self, clock: Hertz) -> Self {
        self.core_clock = clock;
        self
    }

    /// Seconds to stay awake after each wake while NFC is enabled.
    pub const fn nfc_dwell_secs(mut self, secs: u32) -> Self {
        self.nfc_dwell_secs = secs;
        self
    }

    /// Budget for clock-edge and baseband status waits.
    pub const fn poll_budget(mut self, budget: PollBudget) -> Self {
        self.poll_budget = budget;
        self
    }

    /// Budget for power-down handshake answers.
    pub const fn handshake_budget(mut self, budget: PollBudget) -> Self {
        self.handshake_budget = budget;
        self
    }

    /// Attempts a failing wake handler gets before its event is dropped.
    ///
    /// Only bounded budgets make handlers fail, so this only matters together
    /// with [`PmConfig::poll_budget`]. Zero is treated as one.
    pub const fn wake_retries(mut self, attempts: u8) -> Self {
        self.wake_retries = attempts;
        self
    }

    /// Request power-down of `block` during cold boot.
    pub const fn power_down(mut self, block: PowerBlock) -> Self {
        let slot = match block.id() {
            PowerBlockId::Fpu => 0,
            PowerBlockId::Debug => 1,
        };
        self.power_down[slot] = Some(block);
        self
    }

    /// Override the configuration derived by [`SleepConfig::for_sources`].
    pub const fn sleep_config(mut self, config: SleepConfig) -> Self {
        self.sleep = Some(config);
        self
    }

    pub fn enabled(&self) -> WakeupSet {
        self.sources.iter().flatten().map(WakeupSource::kind).collect()
    }

    pub fn sleep(&self) -> SleepConfig {
        self.sleep
            .unwrap_or_else(|| SleepConfig::for_sources(self.enabled()))
    }

    pub(crate) fn source_of(&self, kind: WakeupSourceKind) -> Option<&WakeupSource> {
        self.sources[kind.index()].as_ref()
    }

    pub(crate) fn source_ctx(&self) -> SourceCtx {
        let rtc_clock = match self.source_of(WakeupSourceKind::RtcAlarm) {
            Some(WakeupSource::RtcAlarm(alarm)) => alarm.clock(),
            _ => RtcClockSource::Xtal32k,
        };
        SourceCtx {
            enabled: self.enabled(),
            core_clock: self.core_clock,
            budget: self.poll_budget,
            rtc_clock,
        }
    }
}

impl Default for PmConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{GpioEdge, NfcField, RtcAlarm};

    #[test]
    fn later_source_of_same_kind_wins() {
        let cfg = PmConfig::new()
            .source(RtcAlarm::new(1_000).into())
            .source(GpioEdge::new(1).into())
            .source(RtcAlarm::new(2_000).into());
        assert_eq!(
            cfg.enabled(),
            WakeupSet::from_kinds(&[WakeupSourceKind::RtcAlarm, WakeupSourceKind::GpioEdge])
        );
        assert_eq!(
            cfg.source_of(WakeupSourceKind::RtcAlarm),
            Some(&WakeupSource::RtcAlarm(RtcAlarm::new(2_000)))
        );
    }

    #[test]
    fn sleep_config_derived_unless_overridden() {
        let cfg = PmConfig::new().source(NfcField::new([0; 10]).into());
        assert!(cfg.sleep().wake_enables.contains(WakeupSourceKind::NfcField));

        let fixed = SleepConfig::new().gpio_rising(false);
        assert_eq!(cfg.sleep_config(fixed).sleep(), fixed);
    }

    #[test]
    fn source_ctx_takes_rtc_clock_from_alarm() {
        let cfg = PmConfig::new()
            .source(RtcAlarm::new(1_000).clock_source(RtcClockSource::RcOscillator).into());
        assert_eq!(cfg.source_ctx().rtc_clock, RtcClockSource::RcOscillator);
        assert_eq!(PmConfig::new().source_ctx().rtc_clock, RtcClockSource::Xtal32k);
    }
}
