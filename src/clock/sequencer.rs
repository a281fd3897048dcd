//! Ordered clock bring-up.
//!
//! ```text
//! Start -> FlashConfigured -> OscillatorStable -> DividerSet
//!       -> [WatchdogArmed] -> [PllAttempted] -> GeneratorBound
//!       -> [WatchdogDisarmed] -> Done
//! ```
//!
//! In guarded mode a watchdog reset cause skips the bracketed steps and binds
//! generator 0 to OSC48M.

use critical_section::CriticalSection;
use heapless::Vec;

use crate::pac::{ClockRegisters, ResetCause};
use crate::traps::TrapInstaller;

use super::{cpu, flash, gclk, osc48m, reset_cause, watchdog, xosc_dpll};
use super::{Clocks, Config, ConfigBuilder, Error, STATUS_OK};

/// Longest possible path through the state machine.
pub const TRACE_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringupState {
    Start,
    FlashConfigured,
    OscillatorStable,
    DividerSet,
    WatchdogArmed,
    /// Whether the DPLL is now usable.
    PllAttempted(bool),
    GeneratorBound,
    WatchdogDisarmed,
    Done,
}

/// Outcome of a completed bring-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BringupResult {
    /// Generator 0 runs from the DPLL.
    pub succeeded_with_pll: bool,
    /// Always [`STATUS_OK`].
    pub status: i32,
    /// `RCAUSE` as sampled at `Start`.
    pub reset_cause: ResetCause,
    /// `None` when the watchdog was not armed.
    pub watchdog_confirmed: Option<bool>,
    pub clocks: Clocks,
    /// States visited, in order.
    pub trace: Vec<BringupState, TRACE_LEN>,
}

#[cfg(feature = "defmt")]
impl defmt::Format for BringupResult {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "BringupResult {{ pll: {=bool}, status: {=i32}, reset_cause: {}, watchdog_confirmed: {}, clocks: {}, trace: {} }}",
            self.succeeded_with_pll,
            self.status,
            self.reset_cause,
            self.watchdog_confirmed,
            self.clocks,
            self.trace.as_slice()
        )
    }
}

pub struct BringupSequencer<'a, H: ClockRegisters + ?Sized> {
    hw: &'a mut H,
    config: &'a ConfigBuilder,
    state: BringupState,
    trace: Vec<BringupState, TRACE_LEN>,
}

impl<'a, H: ClockRegisters + ?Sized> BringupSequencer<'a, H> {
    pub fn new(hw: &'a mut H, config: &'a Config) -> Self {
        let mut trace = Vec::new();
        let _ = trace.push(BringupState::Start);
        Self {
            hw,
            config: &config.0,
            state: BringupState::Start,
            trace,
        }
    }

    fn advance(&mut self, next: BringupState) {
        trace!("bringup: {:?} -> {:?}", self.state, next);
        self.state = next;
        let pushed = self.trace.push(next);
        debug_assert!(pushed.is_ok());
    }

    /// Run every stage to completion.
    ///
    /// The `CriticalSection` token proves interrupts are masked for the whole
    /// sequence. An `Err` is only possible under a bounded wait policy; if it
    /// happens while the watchdog is armed, the watchdog is left running so
    /// it resets the chip.
    pub fn run<T: TrapInstaller + ?Sized>(
        mut self,
        _cs: CriticalSection<'_>,
        traps: &mut T,
    ) -> Result<BringupResult, Error> {
        let config = self.config;

        let reset_cause = reset_cause::sample(&*self.hw);

        flash::configure_wait_states(&mut *self.hw, config.flash);
        self.advance(BringupState::FlashConfigured);

        osc48m::stabilize_internal_oscillator(&mut *self.hw, config.wait)?;
        self.advance(BringupState::OscillatorStable);

        cpu::set_cpu_divider_unity(&mut *self.hw);
        self.advance(BringupState::DividerSet);

        let skip_pll = config.guarded && reset_cause.was_watchdog_reset();

        let armed = if config.guarded && !skip_pll {
            let armed = watchdog::arm(&mut *self.hw, &config.watchdog);
            self.advance(BringupState::WatchdogArmed);
            Some(armed)
        } else {
            None
        };
        let watchdog_confirmed = armed.as_ref().map(|a| a.confirmed());

        let use_pll = if skip_pll {
            warn!("bringup: previous reset was a watchdog timeout, staying on OSC48M");
            false
        } else {
            let locked = xosc_dpll::try_lock_pll(&mut *self.hw, &config.xosc, &config.dpll, config.wait)?;
            self.advance(BringupState::PllAttempted(locked));
            locked
        };

        let source = gclk::bind_generator0(&mut *self.hw, use_pll, config.gclk0_div, config.wait)?;
        self.advance(BringupState::GeneratorBound);

        if let Some(armed) = armed {
            watchdog::disarm(&mut *self.hw, &config.watchdog, armed);
            self.advance(BringupState::WatchdogDisarmed);
        }

        traps.install();
        self.advance(BringupState::Done);

        let clocks = Clocks::from_config(config, use_pll);
        info!("bringup: done, gclk0 = {:?} from {:?}", clocks.gclk0, source);

        Ok(BringupResult {
            succeeded_with_pll: use_pll,
            status: STATUS_OK,
            reset_cause,
            watchdog_confirmed,
            clocks,
            trace: self.trace,
        })
    }
}
