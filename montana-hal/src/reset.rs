//! Reset cause inspection.

/// Reset causes relevant to boot classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetFlags {
    /// Any always-on domain reset cause (POR, pad, brown-out, clock detector...).
    pub always_on_reset: bool,
    /// Digital domain reset requested by the always-on controller, as on exit
    /// from sleep without retention.
    pub digital_from_always_on: bool,
}

pub trait ResetStatus {
    fn reset_flags(&self) -> ResetFlags;
    /// Clear all digital and always-on reset flags.
    fn clear_reset_flags(&mut self);
}

/// How execution reached `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootKind {
    Cold,
    WakeFromSleep,
}

impl BootKind {
    pub const fn detect(flags: ResetFlags) -> Self {
        if !flags.always_on_reset && flags.digital_from_always_on {
            Self::WakeFromSleep
        } else {
            Self::Cold
        }
    }
}
