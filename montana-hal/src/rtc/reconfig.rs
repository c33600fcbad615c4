//! Cross-clock-domain reload of the RTC counter.
//!
//! The CPU cannot see slow-clock edges directly. The slow clock is mirrored
//! onto a GPIO whose edge-detect interrupt becomes the only enabled line; a
//! rising edge gives the phase reference, the reload is written in the quiet
//! half-period that follows, and the next falling edge confirms it latched.
//! Any other ISR running in between could push the write across an edge, so
//! the whole sequence holds an [`InterruptSetGuard`].

use super::{AlarmMode, RtcPort, IDLE_PRELOAD};
use crate::error::{Error, WaitPoint};
use crate::gpio::EdgeTrigger;
use crate::interrupt::{InterruptController, InterruptLine, InterruptSetGuard};
use crate::poll::{poll_until, PollBudget};
use crate::wakeup::{StickyStatus, WakeupSet, WakeupSourceKind};

/// Slow clock routed onto a pin plus the edge-detect line watching it.
pub trait ClockMirror {
    /// Drive the mirror pin from the RTC slow clock.
    fn engage_mirror(&mut self);
    /// Select which mirrored edge raises [`InterruptLine::EdgeDetect`].
    fn set_edge_trigger(&mut self, trigger: EdgeTrigger);
    /// Return the mirror pin to its idle configuration.
    fn release_mirror(&mut self);
}

/// Load `count` slow-clock ticks into the RTC and re-arm its alarm.
///
/// On return the interrupt-enable set and global mask are exactly what they
/// were on entry, whatever the outcome. Edge waits use `budget`; with
/// [`PollBudget::Unbounded`] a dead slow clock blocks here forever.
pub fn reconfigure<P>(hw: &mut P, count: u32, budget: PollBudget) -> Result<(), Error>
where
    P: InterruptController + RtcPort + ClockMirror + StickyStatus + ?Sized,
{
    if count == 0 {
        return Err(Error::InvalidCount);
    }

    let mut guard = InterruptSetGuard::exclusive(hw, &[InterruptLine::EdgeDetect]);
    let hw = &mut *guard;

    hw.engage_mirror();
    hw.set_edge_trigger(EdgeTrigger::None);
    // a stale edge would stand in for the phase reference
    hw.clear_pending(InterruptLine::EdgeDetect);
    hw.set_edge_trigger(EdgeTrigger::Rising);

    let outcome = latch_reload(hw, count, budget);
    if outcome.is_ok() {
        hw.clear_sticky(WakeupSet::of(WakeupSourceKind::RtcAlarm));
    }

    hw.write_reload(IDLE_PRELOAD);
    hw.clear_pending(InterruptLine::EdgeDetect);
    hw.set_edge_trigger(EdgeTrigger::None);
    hw.release_mirror();

    match outcome {
        Ok(()) => trace!("rtc: reload {} ticks latched", count),
        Err(e) => error!("rtc: reload abandoned: {:?}", e),
    }
    outcome
}

fn latch_reload<P>(hw: &mut P, count: u32, budget: PollBudget) -> Result<(), Error>
where
    P: InterruptController + RtcPort + ClockMirror + ?Sized,
{
    wait_edge(hw, budget, WaitPoint::RtcRisingEdge)?;
    hw.clear_pending(InterruptLine::EdgeDetect);

    hw.set_edge_trigger(EdgeTrigger::Falling);
    hw.write_reload(count - 1);

    wait_edge(hw, budget, WaitPoint::RtcFallingEdge)?;
    hw.clear_pending(InterruptLine::EdgeDetect);

    hw.set_alarm(AlarmMode::Disabled);
    hw.pulse_reset();
    hw.force_clock();
    hw.set_alarm(AlarmMode::Zero);
    Ok(())
}

fn wait_edge<P>(hw: &mut P, budget: PollBudget, point: WaitPoint) -> Result<(), Error>
where
    P: InterruptController + ?Sized,
{
    // WFI returns immediately if the edge is already pending
    poll_until(budget, point, || {
        hw.wait_for_interrupt();
        hw.is_pending(InterruptLine::EdgeDetect)
    })
    .map(|_| ())
}
