use montana_hal::baseband::BasebandTiming;
use montana_hal::poll::poll_until;
use montana_hal::rtc::{AlarmMode, RtcClockSource};
use montana_hal::time::low_power_periods_in_cycles;
use montana_hal::{InterruptController, InterruptLine, WaitPoint, WakeupSet, WakeupSourceKind};

use super::SourceCtx;
use crate::error::PmError;
use crate::platform::Platform;

/// Baseband deep-sleep timer expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BasebandTimer {
    timing: BasebandTiming,
}

impl BasebandTimer {
    /// Slow-clock periods to wait after forcing a wake, before polling.
    const SETTLE_PERIODS: u32 = 2;

    pub const fn new(timing: BasebandTiming) -> Self {
        Self { timing }
    }

    pub const fn timing(&self) -> &BasebandTiming {
        &self.timing
    }

    pub(crate) fn init<P>(&self, hw: &mut P, ctx: &SourceCtx) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        hw.enable_clock(false);
        hw.reset_timer();

        // the timer counts on the RTC slow clock; an armed alarm already has it running
        if !ctx.enabled.contains(WakeupSourceKind::RtcAlarm) {
            hw.stop();
            hw.pulse_reset();
            hw.start(RtcClockSource::Xtal32k, AlarmMode::Disabled);
        }

        hw.release_timer_reset();
        // a few slow-clock periods for the reset release to propagate
        hw.delay_cycles(ctx.core_clock.0 / 10_000);

        hw.program_sleep(&self.timing);

        poll_until(ctx.budget, WaitPoint::BasebandOscillatorOff, || {
            !hw.oscillator_enabled()
        })?;
        poll_until(ctx.budget, WaitPoint::BasebandRadioOff, || !hw.radio_enabled())?;
        poll_until(ctx.budget, WaitPoint::BasebandLowPowerClock, || {
            hw.on_low_power_clock()
        })?;

        hw.enable(InterruptLine::BasebandSleep);
        Ok(())
    }

    /// Bring the timer back to the fast clock domain and re-arm it.
    ///
    /// Force-wake is held until the fast clock is observed; the fixed delay
    /// before polling only shortens the poll.
    pub(crate) fn on_wake<P>(&self, hw: &mut P, ctx: &SourceCtx) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        hw.enable(InterruptLine::BasebandSleep);
        hw.enable_clock(true);
        hw.set_force_wake(true);

        hw.delay_cycles(low_power_periods_in_cycles(ctx.core_clock, Self::SETTLE_PERIODS));

        let observed = poll_until(ctx.budget, WaitPoint::BasebandFastClock, || {
            if hw.on_low_power_clock() {
                hw.refresh();
                false
            } else {
                true
            }
        });
        if let Err(e) = observed {
            // flag stays set; the dispatcher re-pends and the wake is retried
            hw.set_force_wake(false);
            return Err(e.into());
        }
        hw.set_force_wake(false);

        self.init(hw, ctx)?;
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::BasebandTimer));
        Ok(())
    }

    pub(crate) fn shutdown<P: InterruptController + ?Sized>(&self, hw: &mut P) {
        hw.disable(InterruptLine::BasebandSleep);
    }
}
