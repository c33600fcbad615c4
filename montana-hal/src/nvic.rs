//! Cortex-M backend for [`InterruptController`] and [`Delay`].

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;

use crate::interrupt::{InterruptController, InterruptLine, InterruptMaskSnapshot, SNAPSHOT_WORDS};
use crate::time::Delay;

/// IRQ numbers of the lines the power manager drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqMap {
    pub wakeup: u16,
    pub edge_detect: u16,
    pub baseband_sleep: u16,
}

#[derive(Clone, Copy)]
struct Irq(u16);

// SAFETY: numbers come from the board's `IrqMap`, which names real device IRQs.
unsafe impl InterruptNumber for Irq {
    fn number(self) -> u16 {
        self.0
    }
}

/// NVIC, PRIMASK and WFI of the running core.
pub struct CortexM {
    map: IrqMap,
}

impl CortexM {
    /// # Safety
    ///
    /// Only one instance may exist; it takes over NVIC enable and pending
    /// state for the whole program.
    pub const unsafe fn new(map: IrqMap) -> Self {
        Self { map }
    }

    fn irq(&self, line: InterruptLine) -> Irq {
        Irq(match line {
            InterruptLine::Wakeup => self.map.wakeup,
            InterruptLine::EdgeDetect => self.map.edge_detect,
            InterruptLine::BasebandSleep => self.map.baseband_sleep,
        })
    }

    fn regs() -> &'static cortex_m::peripheral::nvic::RegisterBlock {
        // SAFETY: NVIC registers are always mapped; this driver owns them.
        unsafe { &*NVIC::PTR }
    }
}

impl InterruptController for CortexM {
    fn enabled_set(&self) -> InterruptMaskSnapshot {
        let nvic = Self::regs();
        let mut words = [0u32; SNAPSHOT_WORDS];
        for (i, word) in words.iter_mut().enumerate() {
            *word = nvic.iser[i].read();
        }
        InterruptMaskSnapshot::from_words(words)
    }

    fn disable_all(&mut self) {
        let nvic = Self::regs();
        for i in 0..SNAPSHOT_WORDS {
            unsafe { nvic.icer[i].write(u32::MAX) };
        }
    }

    fn restore_enabled(&mut self, snapshot: &InterruptMaskSnapshot) {
        let nvic = Self::regs();
        for (i, word) in snapshot.words().iter().enumerate() {
            unsafe {
                nvic.icer[i].write(!*word);
                nvic.iser[i].write(*word);
            }
        }
    }

    fn enable(&mut self, line: InterruptLine) {
        unsafe { NVIC::unmask(self.irq(line)) };
    }

    fn disable(&mut self, line: InterruptLine) {
        NVIC::mask(self.irq(line));
    }

    fn is_pending(&self, line: InterruptLine) -> bool {
        NVIC::is_pending(self.irq(line))
    }

    fn set_pending(&mut self, line: InterruptLine) {
        NVIC::pend(self.irq(line));
    }

    fn clear_pending(&mut self, line: InterruptLine) {
        NVIC::unpend(self.irq(line));
    }

    fn mask_global(&mut self) -> bool {
        let was_unmasked = cortex_m::register::primask::read().is_inactive();
        cortex_m::interrupt::disable();
        was_unmasked
    }

    fn restore_global(&mut self, was_unmasked: bool) {
        if was_unmasked {
            unsafe { cortex_m::interrupt::enable() };
        }
    }

    fn wait_for_interrupt(&mut self) {
        cortex_m::asm::wfi();
    }
}

impl Delay for CortexM {
    fn delay_cycles(&mut self, cycles: u32) {
        cortex_m::asm::delay(cycles);
    }
}
