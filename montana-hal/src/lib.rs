#![cfg_attr(not(test), no_std)]
#![doc = "Hardware abstraction surface for Montana low-power orchestration."]
#![doc = ""]
#![doc = "Exposes the chip as a set of narrow port traits (sticky wake flags, interrupt"]
#![doc = "controller, RTC, baseband timer, sensor front end, NFC, power modes) plus the"]
#![doc = "hardware-level protocols built directly on them: the power-down handshake and"]
#![doc = "the cross-clock-domain RTC reconfiguration."]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod baseband;
pub mod error;
pub mod gpio;
pub mod interrupt;
pub mod nfc;
#[cfg(feature = "cortex-m")]
pub mod nvic;
pub mod poll;
pub mod power_mode;
pub mod pwr;
pub mod reset;
pub mod rtc;
pub mod sensor;
pub mod time;
pub mod wakeup;

pub use error::{Error, WaitPoint};
pub use interrupt::{
    GlobalMaskGuard, InterruptController, InterruptLine, InterruptMaskSnapshot,
    InterruptSetGuard,
};
pub use poll::PollBudget;
pub use wakeup::{StickyStatus, WakeupSet, WakeupSourceKind};
