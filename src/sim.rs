//! Software model of the clock registers for host tests.
//!
//! Every write and every status read is appended to an event log. Status
//! flags settle after a configurable number of reads, or never.

use std::cell::{Cell, RefCell};
use std::vec::Vec;

use crate::pac::{
    CpuDiv, DpllPrescaler, DpllReference, GclkView, GeneratorControl, MclkView, NvmctrlView,
    OscctrlView, ReadWaitStates, ResetCause, RstcView, WdtPeriod, WdtView, XoscGain,
};

/// A hardware status flag the bring-up polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Osc48mDivSync,
    Osc48mReady,
    XoscReady,
    DpllEnableSync,
    DpllLock,
    DpllClockReady,
    WdtEnableSync,
    Gclk0Sync,
}

const STATUS_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ResetCauseRead,
    ReadWaitStates(ReadWaitStates),
    Osc48mDiv(u8),
    CpuDiv(CpuDiv),
    XoscGain(XoscGain),
    XoscAutoGain(bool),
    CfdPrescaler(u8),
    XoscFailureDetection(bool),
    XoscSwitchBack(bool),
    XoscOnDemand(bool),
    XoscCrystalMode(bool),
    XoscEnable(bool),
    DpllOnDemand(bool),
    DpllRunStandby(bool),
    DpllRatio { ldr: u16, ldrfrac: u8 },
    DpllReference(DpllReference, u8),
    DpllPrescaler(DpllPrescaler),
    DpllEnable(bool),
    WdtBusClock(bool),
    WdtPeriod(WdtPeriod),
    WdtWindow(WdtPeriod),
    WdtWindowMode(bool),
    WdtEnable(bool),
    Generator(u8, GeneratorControl),
    /// A status read; `true` once the flag reports the awaited state.
    Read(Status, bool),
}

impl Event {
    pub fn is_xosc(&self) -> bool {
        matches!(
            self,
            Event::XoscGain(_)
                | Event::XoscAutoGain(_)
                | Event::CfdPrescaler(_)
                | Event::XoscFailureDetection(_)
                | Event::XoscSwitchBack(_)
                | Event::XoscOnDemand(_)
                | Event::XoscCrystalMode(_)
                | Event::XoscEnable(_)
                | Event::Read(Status::XoscReady, _)
        )
    }

    pub fn is_dpll(&self) -> bool {
        matches!(
            self,
            Event::DpllOnDemand(_)
                | Event::DpllRunStandby(_)
                | Event::DpllRatio { .. }
                | Event::DpllReference(..)
                | Event::DpllPrescaler(_)
                | Event::DpllEnable(_)
                | Event::Read(Status::DpllEnableSync | Status::DpllLock | Status::DpllClockReady, _)
        )
    }

    /// Any access belonging to the crystal/DPLL stage.
    pub fn is_pll_stage(&self) -> bool {
        self.is_xosc() || self.is_dpll()
    }

    pub fn is_watchdog(&self) -> bool {
        matches!(
            self,
            Event::WdtBusClock(_)
                | Event::WdtPeriod(_)
                | Event::WdtWindow(_)
                | Event::WdtWindowMode(_)
                | Event::WdtEnable(_)
                | Event::Read(Status::WdtEnableSync, _)
        )
    }
}

pub struct SimChip {
    rcause: u8,
    remaining: [Cell<u32>; STATUS_COUNT],
    stuck: Option<Status>,
    events: RefCell<Vec<Event>>,
}

impl SimChip {
    /// Power-on reset, every flag settles on its first read.
    pub fn new() -> Self {
        Self {
            rcause: 0x01,
            remaining: Default::default(),
            stuck: None,
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn with_reset_cause(mut self, rcause: u8) -> Self {
        self.rcause = rcause;
        self
    }

    /// `status` reports unsettled for the first `reads` reads.
    pub fn settle_after(self, status: Status, reads: u32) -> Self {
        self.remaining[status as usize].set(reads);
        self
    }

    /// `status` never settles.
    pub fn stuck(mut self, status: Status) -> Self {
        self.stuck = Some(status);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn first(&self, f: impl Fn(&Event) -> bool) -> Option<usize> {
        self.events.borrow().iter().position(f)
    }

    pub fn last(&self, f: impl Fn(&Event) -> bool) -> Option<usize> {
        self.events.borrow().iter().rposition(f)
    }

    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| f(*e)).count()
    }

    pub fn index_of(&self, event: Event) -> Option<usize> {
        self.first(|e| *e == event)
    }

    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    /// Whether `status` has settled, consuming one read.
    fn settled(&self, status: Status) -> bool {
        let done = if self.stuck == Some(status) {
            false
        } else {
            let left = &self.remaining[status as usize];
            if left.get() > 0 {
                left.set(left.get() - 1);
                false
            } else {
                true
            }
        };
        self.record(Event::Read(status, done));
        done
    }
}

impl RstcView for SimChip {
    fn reset_cause(&self) -> ResetCause {
        self.record(Event::ResetCauseRead);
        ResetCause::from_bits(self.rcause)
    }
}

impl NvmctrlView for SimChip {
    fn set_read_wait_states(&mut self, rws: ReadWaitStates) {
        self.record(Event::ReadWaitStates(rws));
    }
}

impl MclkView for SimChip {
    fn set_cpu_div(&mut self, div: CpuDiv) {
        self.record(Event::CpuDiv(div));
    }

    fn set_wdt_bus_clock(&mut self, enabled: bool) {
        self.record(Event::WdtBusClock(enabled));
    }
}

impl WdtView for SimChip {
    fn set_wdt_period(&mut self, period: WdtPeriod) {
        self.record(Event::WdtPeriod(period));
    }

    fn set_wdt_window(&mut self, window: WdtPeriod) {
        self.record(Event::WdtWindow(window));
    }

    fn set_wdt_window_mode(&mut self, enabled: bool) {
        self.record(Event::WdtWindowMode(enabled));
    }

    fn set_wdt_enable(&mut self, enabled: bool) {
        self.record(Event::WdtEnable(enabled));
    }

    fn wdt_enable_syncing(&self) -> bool {
        !self.settled(Status::WdtEnableSync)
    }
}

impl OscctrlView for SimChip {
    fn set_osc48m_div(&mut self, div: u8) {
        self.record(Event::Osc48mDiv(div));
    }

    fn osc48m_div_syncing(&self) -> bool {
        !self.settled(Status::Osc48mDivSync)
    }

    fn osc48m_ready(&self) -> bool {
        self.settled(Status::Osc48mReady)
    }

    fn set_xosc_gain(&mut self, gain: XoscGain) {
        self.record(Event::XoscGain(gain));
    }

    fn set_xosc_auto_gain(&mut self, enabled: bool) {
        self.record(Event::XoscAutoGain(enabled));
    }

    fn set_cfd_prescaler(&mut self, presc: u8) {
        self.record(Event::CfdPrescaler(presc));
    }

    fn set_xosc_failure_detection(&mut self, enabled: bool) {
        self.record(Event::XoscFailureDetection(enabled));
    }

    fn set_xosc_switch_back(&mut self, enabled: bool) {
        self.record(Event::XoscSwitchBack(enabled));
    }

    fn set_xosc_on_demand(&mut self, enabled: bool) {
        self.record(Event::XoscOnDemand(enabled));
    }

    fn set_xosc_crystal_mode(&mut self, enabled: bool) {
        self.record(Event::XoscCrystalMode(enabled));
    }

    fn set_xosc_enable(&mut self, enabled: bool) {
        self.record(Event::XoscEnable(enabled));
    }

    fn xosc_ready(&self) -> bool {
        self.settled(Status::XoscReady)
    }

    fn set_dpll_on_demand(&mut self, enabled: bool) {
        self.record(Event::DpllOnDemand(enabled));
    }

    fn set_dpll_run_standby(&mut self, enabled: bool) {
        self.record(Event::DpllRunStandby(enabled));
    }

    fn set_dpll_ratio(&mut self, ldr: u16, ldrfrac: u8) {
        self.record(Event::DpllRatio { ldr, ldrfrac });
    }

    fn set_dpll_reference(&mut self, refclk: DpllReference, filter: u8) {
        self.record(Event::DpllReference(refclk, filter));
    }

    fn set_dpll_prescaler(&mut self, presc: DpllPrescaler) {
        self.record(Event::DpllPrescaler(presc));
    }

    fn set_dpll_enable(&mut self, enabled: bool) {
        self.record(Event::DpllEnable(enabled));
    }

    fn dpll_enable_syncing(&self) -> bool {
        !self.settled(Status::DpllEnableSync)
    }

    fn dpll_locked(&self) -> bool {
        self.settled(Status::DpllLock)
    }

    fn dpll_clock_ready(&self) -> bool {
        self.settled(Status::DpllClockReady)
    }
}

impl GclkView for SimChip {
    fn write_generator(&mut self, id: u8, ctrl: GeneratorControl) {
        self.record(Event::Generator(id, ctrl));
    }

    fn generator_syncing(&self, id: u8) -> bool {
        assert_eq!(id, 0, "only generator 0 is modelled");
        !self.settled(Status::Gclk0Sync)
    }
}
