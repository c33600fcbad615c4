//! Sensor analog front end, sample FIFO and sensor detector.

/// Front-end measurement profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorMode {
    /// Amperometric measurement, single-ended.
    #[default]
    Normal,
    /// Impedance measurement, differential.
    Impedance,
}

/// Front-end, timer and FIFO storage configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    pub mode: SensorMode,
    /// FIFO depth at which the FIFO-full wake fires.
    pub fifo_size: u8,
    /// Samples accumulated per stored value.
    pub samples: u8,
    /// ADC threshold for the threshold wake.
    pub adc_threshold: u32,
    pub calibrate: bool,
    /// Use the wake-up timer (reference electrode disconnected between samples).
    pub wakeup_timer: bool,
}

impl SensorConfig {
    pub const fn new() -> Self {
        Self {
            mode: SensorMode::Normal,
            fifo_size: 1,
            samples: 2,
            adc_threshold: 0x8333,
            calibrate: false,
            wakeup_timer: false,
        }
    }

    pub const fn mode(mut self, mode: SensorMode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn fifo_size(mut self, size: u8) -> Self {
        self.fifo_size = size;
        self
    }

    pub const fn samples(mut self, samples: u8) -> Self {
        self.samples = samples;
        self
    }

    pub const fn adc_threshold(mut self, threshold: u32) -> Self {
        self.adc_threshold = threshold;
        self
    }

    pub const fn calibrate(mut self, enabled: bool) -> Self {
        self.calibrate = enabled;
        self
    }

    pub const fn wakeup_timer(mut self, enabled: bool) -> Self {
        self.wakeup_timer = enabled;
        self
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Sensor detector control states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DetectorState {
    /// Held in reset, disabled.
    ResetDisabled,
    /// Held in reset, enabled (electrode voltage settling).
    ResetEnabled,
    /// Out of reset and watching.
    Running,
    Disabled,
}

pub trait SensorPort {
    /// Program front end, sensor timer and FIFO storage from `config`.
    ///
    /// Analog trims and timer state lengths are board concerns.
    fn configure_sensor(&mut self, config: &SensorConfig);
    /// FIFO fill level. Asynchronous to the CPU clock; may tear.
    fn fifo_level(&self) -> u8;
    /// Empty the FIFO.
    fn reset_fifo(&mut self);
    fn set_threshold_enabled(&mut self, enabled: bool);
    /// Enable or disable the FIFO-full wake request.
    fn set_fifo_wakeup(&mut self, enabled: bool);
    fn set_detector(&mut self, state: DetectorState);
    /// Detector reports a connected sensor.
    fn sensor_detected(&self) -> bool;
}
