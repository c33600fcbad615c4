//! Power manager errors.

use montana_hal::WakeupSourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PmError {
    /// Hardware-level failure (expired wait, invalid RTC value).
    Hal(montana_hal::Error),
    /// Operation on a source the registry does not hold.
    SourceNotEnabled(WakeupSourceKind),
    /// A wake handler kept failing; its event was dropped.
    RetriesExhausted(WakeupSourceKind),
}

impl From<montana_hal::Error> for PmError {
    fn from(e: montana_hal::Error) -> Self {
        Self::Hal(e)
    }
}
