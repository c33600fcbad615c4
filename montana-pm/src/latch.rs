//! ISR to main-loop handoff of serviced wake sources.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use montana_hal::WakeupSet;

/// Accumulates the sources serviced by the dispatcher until the main loop
/// takes them.
///
/// Replaces per-source "woke because of X" globals; safe to share as a
/// `static`.
pub struct WakeLatch {
    inner: Mutex<CriticalSectionRawMutex, Cell<WakeupSet>>,
}

impl WakeLatch {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(WakeupSet::EMPTY)),
        }
    }

    /// Add `sources` to the latched set.
    pub fn record(&self, sources: WakeupSet) {
        self.inner.lock(|cell| cell.set(cell.get().union(sources)));
    }

    /// Return and clear the latched set.
    pub fn take(&self) -> WakeupSet {
        self.inner.lock(|cell| cell.replace(WakeupSet::EMPTY))
    }

    pub fn peek(&self) -> WakeupSet {
        self.inner.lock(|cell| cell.get())
    }
}

impl Default for WakeLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use montana_hal::WakeupSourceKind::*;

    static LATCH: WakeLatch = WakeLatch::new();

    #[test]
    fn records_accumulate_until_taken() {
        LATCH.record(WakeupSet::of(GpioEdge));
        LATCH.record(WakeupSet::of(RtcAlarm));
        assert_eq!(LATCH.peek(), WakeupSet::from_kinds(&[GpioEdge, RtcAlarm]));
        assert_eq!(LATCH.take(), WakeupSet::from_kinds(&[GpioEdge, RtcAlarm]));
        assert!(LATCH.take().is_empty());
    }
}
