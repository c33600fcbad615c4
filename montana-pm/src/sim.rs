//! Simulated chip for host tests.
//!
//! Records every port call as an [`Op`] and models the few hardware
//! behaviours the power manager depends on: sticky W1C flags feeding the
//! WAKEUP line, a slow clock that advances one half-period per WFI, baseband
//! force-wake settling and per-block handshake responders.

use core::cell::Cell;

use montana_hal::baseband::{BasebandPort, BasebandTiming};
use montana_hal::gpio::{EdgeTrigger, GpioWakeupPort, Pull};
use montana_hal::interrupt::SNAPSHOT_WORDS;
use montana_hal::nfc::{AnticollisionResponse, FieldLevel, NfcPort};
use montana_hal::power_mode::{PowerModes, Retention, SleepConfig, Watchdog};
use montana_hal::pwr::{PowerBlockId, PowerCfg, PowerDomainPort, PowerStatus};
use montana_hal::reset::{ResetFlags, ResetStatus};
use montana_hal::rtc::{AlarmMode, ClockMirror, RtcClockSource, RtcPort, IDLE_PRELOAD};
use montana_hal::sensor::{DetectorState, SensorConfig, SensorPort};
use montana_hal::time::Delay;
use montana_hal::{
    InterruptController, InterruptLine, InterruptMaskSnapshot, StickyStatus, WakeupSet,
    WakeupSourceKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    ClearSticky(WakeupSet),
    Refresh,
    Delay(u32),
    RtcClock(RtcClockSource),
    RtcStop,
    RtcReset,
    RtcReload(u32),
    RtcStart(RtcClockSource, AlarmMode),
    RtcAlarm(AlarmMode),
    RtcForceClock,
    MirrorEngage,
    EdgeTrigger(EdgeTrigger),
    MirrorRelease,
    BbClock(bool),
    BbForceWake(bool),
    BbResetTimer,
    BbReleaseReset,
    BbProgram,
    SensorConfigure,
    FifoReset,
    Threshold(bool),
    FifoWakeup(bool),
    Detector(DetectorState),
    NfcEnable,
    FieldWakeup(bool),
    NfcAnticollision,
    WakePin(u8, Pull),
    SleepInit,
    SleepEnter(Retention),
    DeepSleepInit,
    DeepSleepEnter,
    WakeupWithReset,
    ClockDetectorOff,
    ClearResetFlags,
    PowerWrite(PowerBlockId, PowerCfg),
}

/// How a gated block answers a power-down request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PowerResponse {
    Accept,
    Deny,
    Silent,
}

// lines outside the power manager's control, enabled at reset
const FOREIGN_ENABLED: u32 = 0x0000_0F00;

fn line_bit(line: InterruptLine) -> u32 {
    match line {
        InterruptLine::Wakeup => 1 << 0,
        InterruptLine::EdgeDetect => 1 << 1,
        InterruptLine::BasebandSleep => 1 << 2,
    }
}

fn block_index(block: PowerBlockId) -> usize {
    match block {
        PowerBlockId::Fpu => 0,
        PowerBlockId::Debug => 1,
    }
}

pub(crate) struct SimChip {
    pub ops: Vec<Op>,
    pub sticky: WakeupSet,
    /// Raised (sticky and WAKEUP pending) when the wake pin is configured.
    pub raise_during_init: Option<WakeupSet>,
    /// One-shot: when a clear covers the kind, raise the set without
    /// pending WAKEUP, as an event landing while its handler runs.
    pub raise_on_clear: Option<(WakeupSourceKind, WakeupSet)>,
    /// Sticky flags seen at the moment WAKEUP was last enabled.
    pub sticky_when_wakeup_enabled: Option<WakeupSet>,
    enabled: [u32; SNAPSHOT_WORDS],
    pending: u32,
    pub unmasked: bool,
    pub set_pending_calls: u32,
    pub refreshes: u32,

    pub slow_clock_running: bool,
    clock_high: bool,
    mirror: bool,
    trigger: EdgeTrigger,
    reload: u32,
    shadow: Option<u32>,
    /// Counter period loaded by the last reset pulse.
    pub rtc_effective: Option<u32>,

    pub bb_force_wake: bool,
    /// Polls of the low-power status before the fast clock shows up.
    pub bb_settle_polls: u32,
    pub bb_released_early: bool,
    bb_polls: Cell<u32>,
    bb_fast_seen: Cell<bool>,

    pub fifo_level: u8,
    pub fifo_resets: u32,
    pub detected: bool,

    /// Raised (sticky and WAKEUP pending) on the next sleep entry.
    pub wake_with: Option<WakeupSet>,
    /// Whether interrupts were globally masked at the last sleep entry.
    pub masked_at_sleep: Option<bool>,
    pub reset_flags: ResetFlags,

    pub power_response: [PowerResponse; 2],
    power_cfg: [PowerCfg; 2],
    pub isolated: [bool; 2],
}

impl SimChip {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            sticky: WakeupSet::EMPTY,
            raise_during_init: None,
            raise_on_clear: None,
            sticky_when_wakeup_enabled: None,
            enabled: [FOREIGN_ENABLED, 0],
            pending: 0,
            unmasked: true,
            set_pending_calls: 0,
            refreshes: 0,
            slow_clock_running: true,
            clock_high: false,
            mirror: false,
            trigger: EdgeTrigger::None,
            reload: IDLE_PRELOAD,
            shadow: None,
            rtc_effective: None,
            bb_force_wake: false,
            bb_settle_polls: 0,
            bb_released_early: false,
            bb_polls: Cell::new(0),
            bb_fast_seen: Cell::new(false),
            fifo_level: 0,
            fifo_resets: 0,
            detected: false,
            wake_with: None,
            masked_at_sleep: None,
            reset_flags: ResetFlags::default(),
            power_response: [PowerResponse::Accept; 2],
            power_cfg: [PowerCfg::default(); 2],
            isolated: [false; 2],
        }
    }

    /// Assert sticky flags and pend WAKEUP, as the always-on block does.
    pub fn raise(&mut self, flags: WakeupSet) {
        self.sticky = self.sticky.union(flags);
        self.pending |= line_bit(InterruptLine::Wakeup);
    }

    pub fn is_enabled(&self, line: InterruptLine) -> bool {
        self.enabled[0] & line_bit(line) != 0
    }

    /// Clears that named `kind`, alone or with others.
    pub fn clear_count(&self, kind: WakeupSourceKind) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::ClearSticky(set) if set.contains(kind)))
            .count()
    }

    /// Kinds in the order their flags were cleared one at a time.
    pub fn clear_order(&self) -> Vec<WakeupSourceKind> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::ClearSticky(set) if set.len() == 1 => set.iter().next(),
                _ => None,
            })
            .collect()
    }

    fn tick(&mut self) {
        if !self.slow_clock_running {
            return;
        }
        self.clock_high = !self.clock_high;
        if !self.clock_high {
            self.shadow = Some(self.reload);
        }
        let fired = match self.trigger {
            EdgeTrigger::Rising => self.clock_high,
            EdgeTrigger::Falling => !self.clock_high,
            EdgeTrigger::None => false,
        };
        if self.mirror && fired {
            self.pending |= line_bit(InterruptLine::EdgeDetect);
        }
    }
}

impl InterruptController for SimChip {
    fn enabled_set(&self) -> InterruptMaskSnapshot {
        InterruptMaskSnapshot::from_words(self.enabled)
    }
    fn disable_all(&mut self) {
        self.enabled = [0; SNAPSHOT_WORDS];
    }
    fn restore_enabled(&mut self, snapshot: &InterruptMaskSnapshot) {
        self.enabled = snapshot.words();
    }
    fn enable(&mut self, line: InterruptLine) {
        if line == InterruptLine::Wakeup {
            self.sticky_when_wakeup_enabled = Some(self.sticky);
        }
        self.enabled[0] |= line_bit(line);
    }
    fn disable(&mut self, line: InterruptLine) {
        self.enabled[0] &= !line_bit(line);
    }
    fn is_pending(&self, line: InterruptLine) -> bool {
        self.pending & line_bit(line) != 0
    }
    fn set_pending(&mut self, line: InterruptLine) {
        self.set_pending_calls += 1;
        self.pending |= line_bit(line);
    }
    fn clear_pending(&mut self, line: InterruptLine) {
        self.pending &= !line_bit(line);
    }
    fn mask_global(&mut self) -> bool {
        core::mem::replace(&mut self.unmasked, false)
    }
    fn restore_global(&mut self, was_unmasked: bool) {
        if was_unmasked {
            self.unmasked = true;
        }
    }
    fn wait_for_interrupt(&mut self) {
        if self.pending & self.enabled[0] == 0 {
            self.tick();
        }
    }
}

impl StickyStatus for SimChip {
    fn read_sticky(&self) -> WakeupSet {
        self.sticky
    }
    fn clear_sticky(&mut self, flags: WakeupSet) {
        self.ops.push(Op::ClearSticky(flags));
        self.sticky = self.sticky.difference(flags);
        if let Some((kind, raised)) = self.raise_on_clear {
            if flags.contains(kind) {
                self.raise_on_clear = None;
                self.sticky = self.sticky.union(raised);
            }
        }
    }
}

impl Delay for SimChip {
    fn delay_cycles(&mut self, cycles: u32) {
        self.ops.push(Op::Delay(cycles));
    }
}

impl Watchdog for SimChip {
    fn refresh(&mut self) {
        self.refreshes += 1;
        self.ops.push(Op::Refresh);
    }
}

impl RtcPort for SimChip {
    fn enable_clock_source(&mut self, source: RtcClockSource) {
        self.ops.push(Op::RtcClock(source));
    }
    fn stop(&mut self) {
        self.ops.push(Op::RtcStop);
    }
    fn pulse_reset(&mut self) {
        self.ops.push(Op::RtcReset);
        self.rtc_effective = self.shadow.map(|r| r.wrapping_add(1));
    }
    fn write_reload(&mut self, value: u32) {
        self.ops.push(Op::RtcReload(value));
        self.reload = value;
    }
    fn start(&mut self, source: RtcClockSource, alarm: AlarmMode) {
        self.ops.push(Op::RtcStart(source, alarm));
    }
    fn set_alarm(&mut self, alarm: AlarmMode) {
        self.ops.push(Op::RtcAlarm(alarm));
    }
    fn force_clock(&mut self) {
        self.ops.push(Op::RtcForceClock);
    }
}

impl ClockMirror for SimChip {
    fn engage_mirror(&mut self) {
        self.ops.push(Op::MirrorEngage);
        self.mirror = true;
    }
    fn set_edge_trigger(&mut self, trigger: EdgeTrigger) {
        self.ops.push(Op::EdgeTrigger(trigger));
        self.trigger = trigger;
    }
    fn release_mirror(&mut self) {
        self.ops.push(Op::MirrorRelease);
        self.mirror = false;
    }
}

impl BasebandPort for SimChip {
    fn enable_clock(&mut self, deep_sleep: bool) {
        self.ops.push(Op::BbClock(deep_sleep));
    }
    fn set_force_wake(&mut self, asserted: bool) {
        self.ops.push(Op::BbForceWake(asserted));
        if asserted {
            self.bb_polls.set(0);
            self.bb_fast_seen.set(false);
        } else if self.bb_force_wake && !self.bb_fast_seen.get() {
            self.bb_released_early = true;
        }
        self.bb_force_wake = asserted;
    }
    fn reset_timer(&mut self) {
        self.ops.push(Op::BbResetTimer);
    }
    fn release_timer_reset(&mut self) {
        self.ops.push(Op::BbReleaseReset);
    }
    fn program_sleep(&mut self, _timing: &BasebandTiming) {
        self.ops.push(Op::BbProgram);
    }
    fn oscillator_enabled(&self) -> bool {
        false
    }
    fn radio_enabled(&self) -> bool {
        false
    }
    fn on_low_power_clock(&self) -> bool {
        if !self.bb_force_wake {
            return true;
        }
        let polls = self.bb_polls.get();
        self.bb_polls.set(polls.saturating_add(1));
        if polls >= self.bb_settle_polls {
            self.bb_fast_seen.set(true);
            false
        } else {
            true
        }
    }
}

impl SensorPort for SimChip {
    fn configure_sensor(&mut self, _config: &SensorConfig) {
        self.ops.push(Op::SensorConfigure);
    }
    fn fifo_level(&self) -> u8 {
        self.fifo_level
    }
    fn reset_fifo(&mut self) {
        self.fifo_resets += 1;
        self.ops.push(Op::FifoReset);
    }
    fn set_threshold_enabled(&mut self, enabled: bool) {
        self.ops.push(Op::Threshold(enabled));
    }
    fn set_fifo_wakeup(&mut self, enabled: bool) {
        self.ops.push(Op::FifoWakeup(enabled));
    }
    fn set_detector(&mut self, state: DetectorState) {
        self.ops.push(Op::Detector(state));
    }
    fn sensor_detected(&self) -> bool {
        self.detected
    }
}

impl NfcPort for SimChip {
    fn enable_front_end(&mut self) {
        self.ops.push(Op::NfcEnable);
    }
    fn set_field_wakeup(&mut self, level: Option<FieldLevel>) {
        self.ops.push(Op::FieldWakeup(level.is_some()));
    }
    fn load_anticollision(&mut self, _response: &AnticollisionResponse) {
        self.ops.push(Op::NfcAnticollision);
    }
}

impl GpioWakeupPort for SimChip {
    fn configure_wake_pin(&mut self, pin: u8, pull: Pull) {
        self.ops.push(Op::WakePin(pin, pull));
        if let Some(flags) = self.raise_during_init.take() {
            self.raise(flags);
        }
    }
}

impl PowerModes for SimChip {
    fn sleep_init(&mut self, _config: &SleepConfig) {
        self.ops.push(Op::SleepInit);
    }
    fn sleep_enter(&mut self, _config: &SleepConfig, retention: Retention) {
        self.ops.push(Op::SleepEnter(retention));
        self.masked_at_sleep = Some(!self.unmasked);
        if let Some(flags) = self.wake_with.take() {
            self.raise(flags);
        }
    }
    fn deep_sleep_init(&mut self, _config: &SleepConfig) {
        self.ops.push(Op::DeepSleepInit);
    }
    fn deep_sleep_enter(&mut self, _config: &SleepConfig) {
        self.ops.push(Op::DeepSleepEnter);
        self.masked_at_sleep = Some(!self.unmasked);
        if let Some(flags) = self.wake_with.take() {
            self.raise(flags);
        }
    }
    fn wakeup_with_reset(&mut self, _config: &SleepConfig) {
        self.ops.push(Op::WakeupWithReset);
    }
    fn disable_clock_detector(&mut self) {
        self.ops.push(Op::ClockDetectorOff);
    }
}

impl PowerDomainPort for SimChip {
    fn power_cfg(&self, block: PowerBlockId) -> PowerCfg {
        self.power_cfg[block_index(block)]
    }
    fn power_status(&self, block: PowerBlockId) -> PowerStatus {
        let i = block_index(block);
        if !self.power_cfg[i].request {
            return PowerStatus::default();
        }
        match self.power_response[i] {
            PowerResponse::Accept => PowerStatus {
                accepted: true,
                denied: false,
            },
            PowerResponse::Deny => PowerStatus {
                accepted: false,
                denied: true,
            },
            PowerResponse::Silent => PowerStatus::default(),
        }
    }
    fn write_power_cfg(&mut self, block: PowerBlockId, _key: u32, cfg: PowerCfg) {
        self.ops.push(Op::PowerWrite(block, cfg));
        let i = block_index(block);
        self.power_cfg[i] = cfg;
        self.isolated[i] = cfg.isolate;
    }
}

impl ResetStatus for SimChip {
    fn reset_flags(&self) -> ResetFlags {
        self.reset_flags
    }
    fn clear_reset_flags(&mut self) {
        self.ops.push(Op::ClearResetFlags);
        self.reset_flags = ResetFlags::default();
    }
}
