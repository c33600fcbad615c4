//! Registry of enabled wake sources.

use montana_hal::{InterruptLine, WakeupSet, WakeupSourceKind};

use crate::config::PmConfig;
use crate::error::PmError;
use crate::platform::Platform;
use crate::source::{RtcAlarm, SensorFifo, SourceCtx, WakeupSource};

/// Order in which sources are armed.
pub const INIT_ORDER: [WakeupSourceKind; 7] = [
    WakeupSourceKind::RtcAlarm,
    WakeupSourceKind::BasebandTimer,
    WakeupSourceKind::GpioEdge,
    WakeupSourceKind::NfcField,
    WakeupSourceKind::SensorFifoFull,
    WakeupSourceKind::AdcThreshold,
    WakeupSourceKind::SensorDetect,
];

/// At most one source per kind, plus the mask of enabled kinds.
pub struct Registry {
    slots: [Option<WakeupSource>; 7],
    mask: WakeupSet,
    ctx: SourceCtx,
    wake_retries: u8,
}

impl Registry {
    pub fn new(config: &PmConfig) -> Self {
        let ctx = config.source_ctx();
        Self {
            slots: config.sources,
            mask: ctx.enabled,
            ctx,
            wake_retries: config.wake_retries.max(1),
        }
    }

    /// Enabled sources. Fixed for the registry's lifetime.
    pub fn mask(&self) -> WakeupSet {
        self.mask
    }

    pub fn ctx(&self) -> &SourceCtx {
        &self.ctx
    }

    /// Attempts a failing wake handler gets, at least one.
    pub fn wake_retries(&self) -> u8 {
        self.wake_retries
    }

    pub fn source(&self, kind: WakeupSourceKind) -> Option<&WakeupSource> {
        self.slots[kind.index()].as_ref()
    }

    pub fn rtc_alarm(&self) -> Option<&RtcAlarm> {
        match self.source(WakeupSourceKind::RtcAlarm) {
            Some(WakeupSource::RtcAlarm(alarm)) => Some(alarm),
            _ => None,
        }
    }

    pub fn sensor_fifo(&self) -> Option<&SensorFifo> {
        match self.source(WakeupSourceKind::SensorFifoFull) {
            Some(WakeupSource::SensorFifoFull(fifo)) => Some(fifo),
            _ => None,
        }
    }

    fn slot_mut(&mut self, kind: WakeupSourceKind) -> Result<&mut WakeupSource, PmError> {
        self.slots[kind.index()]
            .as_mut()
            .ok_or(PmError::SourceNotEnabled(kind))
    }

    /// Arm every enabled source, then open the shared wakeup line.
    ///
    /// Flags raised while sources were being configured are discarded before
    /// the line is unmasked, so none of them reaches the dispatcher.
    pub fn init<P: Platform + ?Sized>(&mut self, hw: &mut P) -> Result<(), PmError> {
        hw.disable(InterruptLine::Wakeup);

        let ctx = self.ctx;
        for kind in self.mask.iter_in(&INIT_ORDER) {
            self.slot_mut(kind)?.init(hw, &ctx)?;
        }

        hw.clear_sticky(WakeupSet::ALL);
        hw.clear_pending(InterruptLine::Wakeup);
        hw.enable(InterruptLine::Wakeup);
        debug!("wake sources armed: {:?}", self.mask);
        Ok(())
    }

    /// Re-arm one source, e.g. after the application reconfigured the block
    /// behind it. See [`WakeupSource::rearm`].
    pub fn rearm<P>(&mut self, kind: WakeupSourceKind, hw: &mut P) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        let ctx = self.ctx;
        self.slot_mut(kind)?.rearm(hw, &ctx)
    }

    /// Change the RTC alarm interval and load it immediately.
    ///
    /// An out-of-range interval leaves the alarm and its configuration as
    /// they were.
    pub fn set_rtc_interval<P>(&mut self, hw: &mut P, interval_ms: u32) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        let budget = self.ctx.budget;
        match self.slot_mut(WakeupSourceKind::RtcAlarm)? {
            WakeupSource::RtcAlarm(alarm) => alarm.reconfigure_ms(hw, interval_ms, budget),
            _ => Err(PmError::SourceNotEnabled(WakeupSourceKind::RtcAlarm)),
        }
    }

    pub(crate) fn on_wake<P>(&mut self, kind: WakeupSourceKind, hw: &mut P) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        let ctx = self.ctx;
        self.slot_mut(kind)?.on_wake(hw, &ctx)
    }

    /// Close the wakeup line and stand every source down, newest first.
    pub fn teardown<P: Platform + ?Sized>(&mut self, hw: &mut P) {
        hw.disable(InterruptLine::Wakeup);
        for kind in INIT_ORDER.iter().rev() {
            if let Some(source) = self.slots[kind.index()].as_mut() {
                source.shutdown(hw);
            }
        }
        hw.clear_sticky(WakeupSet::ALL);
        hw.clear_pending(InterruptLine::Wakeup);
    }
}
