//! Wake sources and the sticky wake-flag register.

use core::fmt;

/// Physical event able to end a low-power state.
///
/// The discriminant is the source's bit position in [`WakeupSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WakeupSourceKind {
    RtcAlarm = 0,
    SensorFifoFull = 2,
    BasebandTimer = 3,
    NfcField = 4,
    AdcThreshold = 5,
    GpioEdge = 6,
    SensorDetect = 7,
}

impl WakeupSourceKind {
    /// Every kind, in enumeration order.
    pub const ALL: [Self; 7] = [
        Self::RtcAlarm,
        Self::GpioEdge,
        Self::BasebandTimer,
        Self::SensorFifoFull,
        Self::AdcThreshold,
        Self::NfcField,
        Self::SensorDetect,
    ];

    pub const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Dense index in `0..7`, usable for per-kind tables.
    pub const fn index(self) -> usize {
        match self {
            Self::RtcAlarm => 0,
            Self::GpioEdge => 1,
            Self::BasebandTimer => 2,
            Self::SensorFifoFull => 3,
            Self::AdcThreshold => 4,
            Self::NfcField => 5,
            Self::SensorDetect => 6,
        }
    }

    /// Sources whose wake must be followed by a full re-arm protocol in the
    /// main loop, not only the ISR-side `on_wake`.
    pub const fn requires_reconfiguration(self) -> bool {
        matches!(self, Self::RtcAlarm)
    }
}

/// Immutable set of wake sources.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeupSet(u8);

impl WakeupSet {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self::from_kinds(&WakeupSourceKind::ALL);

    const VALID: u8 = 0b1111_1101;

    /// Bits outside the known sources are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::VALID)
    }

    pub const fn from_kinds(kinds: &[WakeupSourceKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn of(kind: WakeupSourceKind) -> Self {
        Self(kind.bit())
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with(self, kind: WakeupSourceKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub const fn without(self, kind: WakeupSourceKind) -> Self {
        Self(self.0 & !kind.bit())
    }

    pub const fn contains(self, kind: WakeupSourceKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Members in enumeration order ([`WakeupSourceKind::ALL`]).
    pub fn iter(self) -> impl Iterator<Item = WakeupSourceKind> {
        self.iter_in(&WakeupSourceKind::ALL)
    }

    /// Members in the order given by `order`; kinds absent from `order` are skipped.
    pub fn iter_in(
        self,
        order: &[WakeupSourceKind],
    ) -> impl Iterator<Item = WakeupSourceKind> + '_ {
        order.iter().copied().filter(move |&kind| self.contains(kind))
    }
}

impl fmt::Debug for WakeupSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<WakeupSourceKind> for WakeupSet {
    fn from_iter<I: IntoIterator<Item = WakeupSourceKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl From<WakeupSourceKind> for WakeupSet {
    fn from(kind: WakeupSourceKind) -> Self {
        Self::of(kind)
    }
}

/// Hardware register of sticky wake flags.
///
/// A flag is set by its physical event and stays set until software writes
/// a one to it. Reading never clears.
pub trait StickyStatus {
    fn read_sticky(&self) -> WakeupSet;
    /// Write-1-to-clear for every member of `flags`.
    fn clear_sticky(&mut self, flags: WakeupSet);
}
