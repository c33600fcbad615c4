//! HAL error types.

/// Place where a bounded wait expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPoint {
    /// Accept/deny response of a power-down request.
    HandshakeResponse,
    /// Rising edge of the mirrored RTC clock (phase reference).
    RtcRisingEdge,
    /// Falling edge of the mirrored RTC clock (reload latched).
    RtcFallingEdge,
    /// Baseband high-frequency oscillator isolation.
    BasebandOscillatorOff,
    /// Baseband radio isolation.
    BasebandRadioOff,
    /// Baseband timer running from the low-power clock.
    BasebandLowPowerClock,
    /// Baseband fast clock observed after a forced wake.
    BasebandFastClock,
}

/// HAL operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// A bounded wait expired before the awaited condition was observed.
    Timeout(WaitPoint),
    /// RTC counter value of zero; the reload register holds `count - 1`.
    InvalidCount,
    /// RTC alarm interval outside the supported range.
    IntervalOutOfRange {
        /// Requested interval (ms).
        ms: u32,
        /// Minimum supported interval (ms).
        min_ms: u32,
        /// Maximum supported interval (ms).
        max_ms: u32,
    },
}
