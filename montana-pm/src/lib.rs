#![cfg_attr(not(test), no_std)]
#![doc = "Low-power orchestration for Montana: wakeup sources, the shared wakeup"]
#![doc = "dispatcher and the sleep/wake cycle controller."]
#![doc = ""]
#![doc = "The main loop owns a [`CycleController`]; the `WAKEUP` interrupt handler"]
#![doc = "calls [`Dispatcher::on_interrupt`]. The two meet through the hardware"]
#![doc = "sticky flags, a [`WakeLatch`], and the dispatcher's [`Registry`], which"]
#![doc = "the main loop borrows for RTC re-arm and interval changes."]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod cycle;
pub mod dispatcher;
pub mod error;
pub mod latch;
pub mod platform;
pub mod registry;
pub mod source;

#[cfg(test)]
pub(crate) mod sim;

pub use config::PmConfig;
pub use cycle::{CycleController, CycleState, SleepOutcome};
pub use dispatcher::{DispatchReport, DispatchState, Dispatcher, WakeHook};
pub use error::PmError;
pub use latch::WakeLatch;
pub use platform::Platform;
pub use registry::Registry;
pub use source::WakeupSource;
