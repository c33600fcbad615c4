//! Sleep/wake cycle controller.
//!
//! ```text
//! Run -> Preparing -> Asleep -> WakeProcessing -> Run
//! ```
//!
//! The wake interrupt itself is handled by the [`Dispatcher`](crate::Dispatcher)
//! as soon as [`CycleController::sleep`] lifts the global mask; the controller
//! then picks up what the dispatcher latched and does the main-loop half of
//! the work (RTC re-arm, NFC dwell) before the next sleep.
//!
//! Source state lives in the dispatcher's [`Registry`]; operations that touch
//! a source take it as a parameter. On hardware the main loop reaches it
//! under a critical section, as the wakeup handler owns it otherwise.

use montana_hal::interrupt::GlobalMaskGuard;
use montana_hal::power_mode::{Retention, SleepConfig, SleepMode};
use montana_hal::pwr::{request_power_down, PowerBlock};
use montana_hal::reset::BootKind;
use montana_hal::sensor::DetectorState;
use montana_hal::time::Hertz;
use montana_hal::{PollBudget, WakeupSet, WakeupSourceKind};

use crate::config::PmConfig;
use crate::error::PmError;
use crate::latch::WakeLatch;
use crate::platform::Platform;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleState {
    Run,
    Preparing,
    Asleep,
    WakeProcessing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepOutcome {
    /// The core was suspended and has woken up.
    Slept,
    /// Deep sleep refused because a sensor is connected.
    Vetoed,
}

pub struct CycleController<'l> {
    latch: &'l WakeLatch,
    mode: SleepMode,
    sleep: SleepConfig,
    enabled: WakeupSet,
    core_clock: Hertz,
    nfc_dwell_secs: u32,
    handshake_budget: PollBudget,
    power_down: [Option<PowerBlock>; 2],
    state: CycleState,
    cycles: u32,
}

impl<'l> CycleController<'l> {
    pub fn new(config: &PmConfig, latch: &'l WakeLatch) -> Self {
        Self {
            latch,
            mode: config.mode,
            sleep: config.sleep(),
            enabled: config.enabled(),
            core_clock: config.core_clock,
            nfc_dwell_secs: config.nfc_dwell_secs,
            handshake_budget: config.handshake_budget,
            power_down: config.power_down,
            state: CycleState::Run,
            cycles: 0,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Completed sleep/wake cycles.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn sleep_config(&self) -> &SleepConfig {
        &self.sleep
    }

    /// Classify the boot and bring the system to [`CycleState::Run`].
    ///
    /// Cold boot powers down the configured blocks and arms every wake
    /// source with interrupts masked. Lines enabled before the call stay
    /// enabled. A wake through reset only restores the power-mode state.
    /// Either way the RTC alarm is then loaded for the first sleep.
    pub fn boot<P>(&mut self, hw: &mut P, registry: &mut Registry) -> Result<BootKind, PmError>
    where
        P: Platform + ?Sized,
    {
        let kind = BootKind::detect(hw.reset_flags());
        info!("boot: {:?}", kind);

        match kind {
            BootKind::Cold => {
                let mut masked = GlobalMaskGuard::new(hw);
                let hw = &mut *masked;
                let before = hw.enabled_set();
                hw.disable_all();
                let armed = self.cold_start(hw, registry);
                let after = hw.enabled_set();
                hw.restore_enabled(&before.union(&after));
                armed?;
            }
            BootKind::WakeFromSleep => {
                hw.wakeup_with_reset(&self.sleep);
                self.dwell(hw);
            }
        }

        self.arm(hw, registry)?;
        self.state = CycleState::Run;
        Ok(kind)
    }

    fn cold_start<P>(&self, hw: &mut P, registry: &mut Registry) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        for block in self.power_down.iter().flatten() {
            // Denied leaves the block powered; only a timeout is an error
            request_power_down(hw, block, self.handshake_budget)?;
        }
        registry.init(hw)?;
        hw.clear_reset_flags();
        Ok(())
    }

    /// Load the RTC alarm interval, if the alarm is enabled.
    pub fn arm<P>(&mut self, hw: &mut P, registry: &mut Registry) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        if !self.enabled.contains(WakeupSourceKind::RtcAlarm) {
            return Ok(());
        }
        registry.rearm(WakeupSourceKind::RtcAlarm, hw)
    }

    /// Change the RTC alarm interval and re-arm it immediately.
    pub fn set_rtc_interval<P>(
        &mut self,
        hw: &mut P,
        registry: &mut Registry,
        interval_ms: u32,
    ) -> Result<(), PmError>
    where
        P: Platform + ?Sized,
    {
        registry.set_rtc_interval(hw, interval_ms)
    }

    /// Enter the configured low-power state and return once awake.
    ///
    /// The decision to sleep and the sleep instruction happen under a global
    /// interrupt mask; a wake interrupt is taken when the mask is lifted on
    /// the way out.
    pub fn sleep<P: Platform + ?Sized>(&mut self, hw: &mut P) -> SleepOutcome {
        self.state = CycleState::Preparing;
        hw.refresh();

        let outcome = {
            let mut masked = GlobalMaskGuard::new(hw);
            self.enter(&mut *masked)
        };

        self.state = CycleState::WakeProcessing;
        outcome
    }

    fn enter<P: Platform + ?Sized>(&mut self, hw: &mut P) -> SleepOutcome {
        match self.mode {
            SleepMode::CoreRetention => {
                hw.sleep_init(&self.sleep);
                self.state = CycleState::Asleep;
                hw.sleep_enter(&self.sleep, Retention::Core);
            }
            SleepMode::NoRetention => {
                hw.sleep_init(&self.sleep);
                hw.disable_clock_detector();
                hw.clear_reset_flags();
                self.state = CycleState::Asleep;
                hw.sleep_enter(&self.sleep, Retention::None);
            }
            SleepMode::DeepSleep => {
                // a connected sensor must not be left with its detector armed in storage mode
                if self.enabled.contains(WakeupSourceKind::SensorDetect) && hw.sensor_detected() {
                    hw.set_detector(DetectorState::Disabled);
                    warn!("sensor connected, deep sleep vetoed");
                    return SleepOutcome::Vetoed;
                }
                hw.deep_sleep_init(&self.sleep);
                hw.disable_clock_detector();
                hw.clear_reset_flags();
                self.state = CycleState::Asleep;
                hw.deep_sleep_enter(&self.sleep);
            }
        }
        SleepOutcome::Slept
    }

    /// Main-loop half of wake handling. Returns the sources serviced since
    /// the previous call.
    pub fn process_wake<P>(
        &mut self,
        hw: &mut P,
        registry: &mut Registry,
    ) -> Result<WakeupSet, PmError>
    where
        P: Platform + ?Sized,
    {
        self.state = CycleState::WakeProcessing;
        let woke = self.latch.take();

        if self.enabled.contains(WakeupSourceKind::NfcField) {
            self.dwell(hw);
        }

        let reconfigure: WakeupSet = woke.iter().filter(|k| k.requires_reconfiguration()).collect();
        if !reconfigure.is_empty() {
            if let Err(e) = self.arm(hw, registry) {
                // keep the request so the next pass retries the re-arm
                self.latch.record(reconfigure);
                self.state = CycleState::Run;
                return Err(e);
            }
        }

        self.state = CycleState::Run;
        self.cycles = self.cycles.wrapping_add(1);
        Ok(woke)
    }

    /// One full cycle: sleep, then post-wake processing.
    pub fn run_cycle<P>(
        &mut self,
        hw: &mut P,
        registry: &mut Registry,
    ) -> Result<WakeupSet, PmError>
    where
        P: Platform + ?Sized,
    {
        if self.sleep(hw) == SleepOutcome::Vetoed {
            debug!("cycle {}: sleep vetoed", self.cycles);
        }
        self.process_wake(hw, registry)
    }

    /// Stay in run mode for the NFC dwell time, keeping the watchdog fed.
    fn dwell<P: Platform + ?Sized>(&self, hw: &mut P) {
        if !self.enabled.contains(WakeupSourceKind::NfcField) {
            return;
        }
        for _ in 0..self.nfc_dwell_secs {
            hw.refresh();
            hw.delay_cycles(self.core_clock.0);
        }
    }
}
