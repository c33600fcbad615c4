//! Everything the power manager needs from the chip, as one bound.

use montana_hal::baseband::BasebandPort;
use montana_hal::gpio::GpioWakeupPort;
use montana_hal::nfc::NfcPort;
use montana_hal::power_mode::{PowerModes, Watchdog};
use montana_hal::pwr::PowerDomainPort;
use montana_hal::reset::ResetStatus;
use montana_hal::rtc::{ClockMirror, RtcPort};
use montana_hal::sensor::SensorPort;
use montana_hal::time::Delay;
use montana_hal::{InterruptController, StickyStatus};

/// Full hardware surface used by the power manager.
///
/// Blanket-implemented for any type providing every port.
pub trait Platform:
    InterruptController
    + StickyStatus
    + Delay
    + Watchdog
    + RtcPort
    + ClockMirror
    + BasebandPort
    + SensorPort
    + NfcPort
    + GpioWakeupPort
    + PowerModes
    + PowerDomainPort
    + ResetStatus
{
}

impl<T> Platform for T where
    T: InterruptController
        + StickyStatus
        + Delay
        + Watchdog
        + RtcPort
        + ClockMirror
        + BasebandPort
        + SensorPort
        + NfcPort
        + GpioWakeupPort
        + PowerModes
        + PowerDomainPort
        + ResetStatus
        + ?Sized
{
}
