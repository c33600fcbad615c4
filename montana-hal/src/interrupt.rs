//! Interrupt controller surface and scoped mask guards.
//!
//! Both the main loop and the wakeup ISR mutate the interrupt-enable set, so
//! every mutation here is scoped: a guard saves the state it replaces and puts
//! it back on drop, on every exit path. Guards nest.

use core::ops::{Deref, DerefMut};

/// Interrupt lines driven by the power-management core.
///
/// Backends map these onto real IRQ numbers; every other line is only ever
/// touched through [`InterruptMaskSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptLine {
    /// Shared wakeup interrupt raised by any sticky wake flag.
    Wakeup,
    /// GPIO edge-detect line used to observe the mirrored slow clock.
    EdgeDetect,
    /// Baseband sleep-timer interrupt.
    BasebandSleep,
}

/// Number of 32-line enable words captured by a snapshot.
pub const SNAPSHOT_WORDS: usize = 2;

/// Opaque copy of the full interrupt-enable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptMaskSnapshot {
    words: [u32; SNAPSHOT_WORDS],
}

impl InterruptMaskSnapshot {
    pub const fn from_words(words: [u32; SNAPSHOT_WORDS]) -> Self {
        Self { words }
    }

    pub const fn words(&self) -> [u32; SNAPSHOT_WORDS] {
        self.words
    }

    /// Lines enabled in either snapshot.
    pub const fn union(&self, other: &Self) -> Self {
        let mut words = self.words;
        let mut i = 0;
        while i < SNAPSHOT_WORDS {
            words[i] |= other.words[i];
            i += 1;
        }
        Self { words }
    }
}

/// Interrupt controller plus the core-level global mask and WFI.
pub trait InterruptController {
    /// Snapshot of every enabled line.
    fn enabled_set(&self) -> InterruptMaskSnapshot;
    /// Disable every line.
    fn disable_all(&mut self);
    /// Make the enabled set exactly `snapshot`.
    fn restore_enabled(&mut self, snapshot: &InterruptMaskSnapshot);

    fn enable(&mut self, line: InterruptLine);
    fn disable(&mut self, line: InterruptLine);

    fn is_pending(&self, line: InterruptLine) -> bool;
    fn set_pending(&mut self, line: InterruptLine);
    fn clear_pending(&mut self, line: InterruptLine);

    /// Globally mask interrupts. Returns `true` if they were unmasked before.
    fn mask_global(&mut self) -> bool;
    /// Undo [`mask_global`](Self::mask_global) given its return value.
    fn restore_global(&mut self, was_unmasked: bool);

    /// Suspend until an enabled line is pending.
    ///
    /// Returns even while globally masked; the handler then runs once the
    /// mask is lifted.
    fn wait_for_interrupt(&mut self);
}

/// Restricts the enabled set to a few lines for the guard's lifetime.
///
/// Acquisition masks globally, saves the enabled set, disables every line
/// and enables only `lines`. Drop restores the saved set, then the saved
/// global mask state. The guard derefs to the wrapped hardware so the
/// protected sequence keeps full access to it.
pub struct InterruptSetGuard<'a, C: InterruptController + ?Sized> {
    hw: &'a mut C,
    saved: InterruptMaskSnapshot,
    was_unmasked: bool,
}

impl<'a, C: InterruptController + ?Sized> InterruptSetGuard<'a, C> {
    pub fn exclusive(hw: &'a mut C, lines: &[InterruptLine]) -> Self {
        let was_unmasked = hw.mask_global();
        let saved = hw.enabled_set();
        hw.disable_all();
        for &line in lines {
            hw.enable(line);
        }
        trace!("interrupt set narrowed to {} line(s)", lines.len());
        Self {
            hw,
            saved,
            was_unmasked,
        }
    }

    /// Enabled set that will be restored on drop.
    pub fn saved(&self) -> &InterruptMaskSnapshot {
        &self.saved
    }
}

impl<C: InterruptController + ?Sized> Deref for InterruptSetGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.hw
    }
}

impl<C: InterruptController + ?Sized> DerefMut for InterruptSetGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.hw
    }
}

impl<C: InterruptController + ?Sized> Drop for InterruptSetGuard<'_, C> {
    fn drop(&mut self) {
        self.hw.restore_enabled(&self.saved);
        self.hw.restore_global(self.was_unmasked);
    }
}

/// Global interrupt mask held for the guard's lifetime.
///
/// Drop restores the state found at acquisition, so nested guards leave
/// interrupts masked until the outermost one is released.
pub struct GlobalMaskGuard<'a, C: InterruptController + ?Sized> {
    hw: &'a mut C,
    was_unmasked: bool,
}

impl<'a, C: InterruptController + ?Sized> GlobalMaskGuard<'a, C> {
    pub fn new(hw: &'a mut C) -> Self {
        let was_unmasked = hw.mask_global();
        Self { hw, was_unmasked }
    }
}

impl<C: InterruptController + ?Sized> Deref for GlobalMaskGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.hw
    }
}

impl<C: InterruptController + ?Sized> DerefMut for GlobalMaskGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.hw
    }
}

impl<C: InterruptController + ?Sized> Drop for GlobalMaskGuard<'_, C> {
    fn drop(&mut self) {
        self.hw.restore_global(self.was_unmasked);
    }
}
