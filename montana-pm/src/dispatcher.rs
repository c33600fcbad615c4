//! Shared wakeup interrupt dispatch.
//!
//! Every wake source funnels into one interrupt line. The dispatcher reads the
//! sticky flags once, services each enabled source whose flag is set, and
//! re-pends the line if any flag is still set afterwards. A flag raised while
//! its own handler runs is therefore serviced by the next invocation instead
//! of being lost, and a flag cleared by its handler never triggers a second
//! run for the same event.
//!
//! A handler that keeps failing (only possible with a bounded poll budget) is
//! given [`Registry::wake_retries`] attempts. After that its flag is cleared
//! and the event is reported as abandoned, so the line stops re-pending.

use montana_hal::{InterruptLine, WakeupSet, WakeupSourceKind};

use crate::error::PmError;
use crate::latch::WakeLatch;
use crate::platform::Platform;
use crate::registry::Registry;

/// Order in which pending sources are serviced within one invocation.
pub const DISPATCH_ORDER: [WakeupSourceKind; 7] = [
    WakeupSourceKind::GpioEdge,
    WakeupSourceKind::BasebandTimer,
    WakeupSourceKind::SensorFifoFull,
    WakeupSourceKind::AdcThreshold,
    WakeupSourceKind::RtcAlarm,
    WakeupSourceKind::NfcField,
    WakeupSourceKind::SensorDetect,
];

/// Application callback run after a source's own wake handling.
pub type WakeHook = fn(WakeupSourceKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchState {
    Idle,
    Dispatching,
}

/// What one dispatcher invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchReport {
    /// Enabled sources whose handler ran.
    pub serviced: WakeupSet,
    /// Flags of disabled sources, cleared without running anything.
    pub discarded: WakeupSet,
    /// Handlers that failed; their flags are left set for a retry.
    pub failed: WakeupSet,
    /// Handlers out of retries; their flags were cleared and the event dropped.
    pub abandoned: WakeupSet,
    /// [`PmError::RetriesExhausted`] if anything was abandoned, otherwise the
    /// first handler error.
    pub error: Option<PmError>,
    /// Flags remained set and the wakeup line was pending for another run.
    pub repended: bool,
}

pub struct Dispatcher<'l> {
    registry: Registry,
    latch: &'l WakeLatch,
    hooks: [Option<WakeHook>; 7],
    failures: [u8; 7],
    state: DispatchState,
}

impl<'l> Dispatcher<'l> {
    pub fn new(registry: Registry, latch: &'l WakeLatch) -> Self {
        Self {
            registry,
            latch,
            hooks: [None; 7],
            failures: [0; 7],
            state: DispatchState::Idle,
        }
    }

    /// Run `hook` after every serviced wake of `kind`.
    pub fn set_hook(&mut self, kind: WakeupSourceKind, hook: Option<WakeHook>) {
        self.hooks[kind.index()] = hook;
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Body of the shared wakeup interrupt handler.
    pub fn on_interrupt<P: Platform + ?Sized>(&mut self, hw: &mut P) -> DispatchReport {
        self.state = DispatchState::Dispatching;
        hw.refresh();

        let pending = hw.read_sticky();
        let enabled = self.registry.mask();
        let retries = self.registry.wake_retries();
        let mut report = DispatchReport::default();

        // a disabled source has no handler to consume its event; drop the flag
        // so it cannot keep the line pending forever
        let stray = pending.difference(enabled);
        if !stray.is_empty() {
            warn!("discarding wake flags of disabled sources: {:?}", stray);
            hw.clear_sticky(stray);
            report.discarded = stray;
        }

        for kind in pending.intersection(enabled).iter_in(&DISPATCH_ORDER) {
            match self.registry.on_wake(kind, hw) {
                Ok(()) => {
                    self.failures[kind.index()] = 0;
                    report.serviced = report.serviced.with(kind);
                    if let Some(hook) = self.hooks[kind.index()] {
                        hook(kind);
                    }
                }
                Err(e) => {
                    let attempts = &mut self.failures[kind.index()];
                    *attempts = attempts.saturating_add(1);
                    if *attempts >= retries {
                        *attempts = 0;
                        error!(
                            "wake handler {:?} failed {} times, dropping event: {:?}",
                            kind, retries, e
                        );
                        hw.clear_sticky(WakeupSet::of(kind));
                        report.abandoned = report.abandoned.with(kind);
                        report.error = Some(PmError::RetriesExhausted(kind));
                    } else {
                        error!("wake handler {:?} failed: {:?}", kind, e);
                        report.failed = report.failed.with(kind);
                        if report.error.is_none() {
                            report.error = Some(e);
                        }
                    }
                }
            }
        }
        self.latch.record(report.serviced);

        if !hw.read_sticky().is_empty() {
            if !hw.is_pending(InterruptLine::Wakeup) {
                hw.set_pending(InterruptLine::Wakeup);
            }
            trace!("wake flags still set, wakeup line re-pended");
            report.repended = true;
        }

        self.state = DispatchState::Idle;
        report
    }
}
