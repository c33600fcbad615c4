//! Wakeup sources.
//!
//! One variant per physical wake trigger. Each carries its own configuration
//! and knows how to arm itself (`init`), service a wake (`on_wake`) and stand
//! down (`shutdown`). `on_wake` always clears the sticky flag last, after
//! whatever the flag guards has been consumed.

mod baseband;
mod gpio;
mod nfc;
mod rtc;
mod sensor;

pub use baseband::BasebandTimer;
pub use gpio::GpioEdge;
pub use nfc::NfcField;
pub use rtc::RtcAlarm;
pub use sensor::{AdcThreshold, SensorDetect, SensorFifo};

use montana_hal::rtc::RtcClockSource;
use montana_hal::time::Hertz;
use montana_hal::{PollBudget, WakeupSet, WakeupSourceKind};

use crate::error::PmError;
use crate::platform::Platform;

/// Facts about the whole configuration that individual sources depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SourceCtx {
    /// Every enabled source.
    pub enabled: WakeupSet,
    pub core_clock: Hertz,
    /// Budget for status polls inside source handlers.
    pub budget: PollBudget,
    /// Slow-clock source shared by the RTC and sensor timer.
    pub rtc_clock: RtcClockSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeupSource {
    RtcAlarm(RtcAlarm),
    GpioEdge(GpioEdge),
    BasebandTimer(BasebandTimer),
    SensorFifoFull(SensorFifo),
    AdcThreshold(AdcThreshold),
    NfcField(NfcField),
    SensorDetect(SensorDetect),
}

impl WakeupSource {
    pub const fn kind(&self) -> WakeupSourceKind {
        match self {
            Self::RtcAlarm(_) => WakeupSourceKind::RtcAlarm,
            Self::GpioEdge(_) => WakeupSourceKind::GpioEdge,
            Self::BasebandTimer(_) => WakeupSourceKind::BasebandTimer,
            Self::SensorFifoFull(_) => WakeupSourceKind::SensorFifoFull,
            Self::AdcThreshold(_) => WakeupSourceKind::AdcThreshold,
            Self::NfcField(_) => WakeupSourceKind::NfcField,
            Self::SensorDetect(_) => WakeupSourceKind::SensorDetect,
        }
    }

    /// Needs the full re-arm protocol from the main loop after each wake.
    pub const fn requires_reconfiguration(&self) -> bool {
        self.kind().requires_reconfiguration()
    }

    pub fn init<P>(&mut self, hw: &mut P, ctx: &SourceCtx) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        debug!("init wake source {:?}", self.kind());
        match self {
            Self::RtcAlarm(s) => s.init(hw),
            Self::GpioEdge(s) => {
                s.init(hw);
                Ok(())
            }
            Self::BasebandTimer(s) => s.init(hw, ctx),
            Self::SensorFifoFull(s) => {
                s.init(hw, ctx);
                Ok(())
            }
            Self::AdcThreshold(s) => {
                s.init(hw, ctx);
                Ok(())
            }
            Self::NfcField(s) => {
                s.init(hw);
                Ok(())
            }
            Self::SensorDetect(s) => {
                s.init(hw);
                Ok(())
            }
        }
    }

    /// Re-arm after the application reconfigured the block behind the
    /// source. The RTC alarm reloads its interval through the edge-synchronised
    /// protocol; every other source re-runs its `init`.
    pub fn rearm<P>(&mut self, hw: &mut P, ctx: &SourceCtx) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        match self {
            Self::RtcAlarm(s) => s.reconfigure(hw, ctx.budget),
            _ => self.init(hw, ctx),
        }
    }

    /// Service a wake of this source. Runs in interrupt context.
    pub fn on_wake<P>(&mut self, hw: &mut P, ctx: &SourceCtx) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        match self {
            Self::RtcAlarm(s) => s.on_wake(hw),
            Self::GpioEdge(s) => s.on_wake(hw),
            Self::BasebandTimer(s) => return s.on_wake(hw, ctx),
            Self::SensorFifoFull(s) => s.on_wake(hw),
            Self::AdcThreshold(s) => s.on_wake(hw),
            Self::NfcField(s) => s.on_wake(hw),
            Self::SensorDetect(s) => s.on_wake(hw),
        }
        Ok(())
    }

    pub fn shutdown<P: Platform + ?Sized>(&mut self, hw: &mut P) {
        debug!("shutdown wake source {:?}", self.kind());
        match self {
            Self::RtcAlarm(s) => s.shutdown(hw),
            Self::GpioEdge(_) => {}
            Self::BasebandTimer(s) => s.shutdown(hw),
            Self::SensorFifoFull(s) => s.shutdown(hw),
            Self::AdcThreshold(s) => s.shutdown(hw),
            Self::NfcField(s) => s.shutdown(hw),
            Self::SensorDetect(s) => s.shutdown(hw),
        }
    }
}

impl From<RtcAlarm> for WakeupSource {
    fn from(s: RtcAlarm) -> Self {
        Self::RtcAlarm(s)
    }
}

impl From<GpioEdge> for WakeupSource {
    fn from(s: GpioEdge) -> Self {
        Self::GpioEdge(s)
    }
}

impl From<BasebandTimer> for WakeupSource {
    fn from(s: BasebandTimer) -> Self {
        Self::BasebandTimer(s)
    }
}

impl From<SensorFifo> for WakeupSource {
    fn from(s: SensorFifo) -> Self {
        Self::SensorFifoFull(s)
    }
}

impl From<AdcThreshold> for WakeupSource {
    fn from(s: AdcThreshold) -> Self {
        Self::AdcThreshold(s)
    }
}

impl From<NfcField> for WakeupSource {
    fn from(s: NfcField) -> Self {
        Self::NfcField(s)
    }
}

impl From<SensorDetect> for WakeupSource {
    fn from(s: SensorDetect) -> Self {
        Self::SensorDetect(s)
    }
}
