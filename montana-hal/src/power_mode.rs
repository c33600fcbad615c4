//! Vendor power-mode routines and the watchdog.
//!
//! Entering sleep is a black box provided by the platform library; the core
//! only assembles the [`SleepConfig`] it consumes and decides when to call it.

use crate::time::Hertz;
use crate::wakeup::{WakeupSet, WakeupSourceKind};

/// Low-power state entered by each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepMode {
    /// Sleep keeping core state; execution resumes after the sleep call.
    #[default]
    CoreRetention,
    /// Sleep without retention; wake goes through reset.
    NoRetention,
    /// Storage mode; only always-on wake sources remain.
    DeepSleep,
}

/// Retention variant passed to the sleep entry routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Retention {
    Core,
    None,
}

/// Run-mode clock frequencies restored on wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub system: Hertz,
    pub sensor: Hertz,
    pub uart: Hertz,
    pub user: Hertz,
}

impl ClockConfig {
    pub const fn new() -> Self {
        Self {
            system: Hertz::mhz(8),
            sensor: Hertz::hz(32_768),
            uart: Hertz::mhz(8),
            user: Hertz::mhz(1),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Retention regulator trims. 3 is the maximum (most robust) setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetentionTrim {
    pub vddm: u8,
    pub vddc: u8,
    pub vddacs: u8,
    /// Keep the baseband timer supply up.
    pub vddt: bool,
}

impl RetentionTrim {
    pub const MAXIMUM: u8 = 3;

    pub const fn new() -> Self {
        Self {
            vddm: Self::MAXIMUM,
            vddc: Self::MAXIMUM,
            vddacs: Self::MAXIMUM,
            vddt: false,
        }
    }
}

impl Default for RetentionTrim {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration handed to the power-mode routines.
///
/// Built once at boot; the core never modifies it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleepConfig {
    pub clocks: ClockConfig,
    pub retention: RetentionTrim,
    /// Wake sources whose always-on wake enable must be set on entry.
    pub wake_enables: WakeupSet,
    /// GPIO wake on rising edge (falling otherwise).
    pub gpio_rising: bool,
    pub ble_present: bool,
}

impl SleepConfig {
    pub const fn new() -> Self {
        Self {
            clocks: ClockConfig::new(),
            retention: RetentionTrim::new(),
            wake_enables: WakeupSet::of(WakeupSourceKind::GpioEdge),
            gpio_rising: true,
            ble_present: false,
        }
    }

    /// Derive wake enables and baseband retention from the enabled sources.
    pub const fn for_sources(sources: WakeupSet) -> Self {
        let mut cfg = Self::new();
        let always_on = WakeupSet::from_kinds(&[
            WakeupSourceKind::GpioEdge,
            WakeupSourceKind::SensorFifoFull,
            WakeupSourceKind::NfcField,
        ]);
        // GPIO wake stays enabled as the recovery path
        cfg.wake_enables = sources
            .intersection(always_on)
            .with(WakeupSourceKind::GpioEdge);
        cfg.retention.vddt = sources.contains(WakeupSourceKind::BasebandTimer);
        cfg
    }

    pub const fn clocks(mut self, clocks: ClockConfig) -> Self {
        self.clocks = clocks;
        self
    }

    pub const fn retention(mut self, retention: RetentionTrim) -> Self {
        self.retention = retention;
        self
    }

    pub const fn gpio_rising(mut self, rising: bool) -> Self {
        self.gpio_rising = rising;
        self
    }

    pub const fn ble_present(mut self, present: bool) -> Self {
        self.ble_present = present;
        self
    }
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform power-mode library.
pub trait PowerModes {
    fn sleep_init(&mut self, config: &SleepConfig);
    /// Suspends the core. With [`Retention::Core`] returns on wake.
    fn sleep_enter(&mut self, config: &SleepConfig, retention: Retention);
    fn deep_sleep_init(&mut self, config: &SleepConfig);
    fn deep_sleep_enter(&mut self, config: &SleepConfig);
    /// Restore clocks and pads after a wake that went through reset.
    fn wakeup_with_reset(&mut self, config: &SleepConfig);
    /// Disable the clock-loss detector, ignoring its reset first.
    fn disable_clock_detector(&mut self);
}

pub trait Watchdog {
    fn refresh(&mut self);
}
