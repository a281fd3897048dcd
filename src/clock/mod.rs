//! Early clock bring-up.
//!
//! Each stage is a free function over the register views in [`crate::pac`];
//! [`BringupSequencer`] runs them in order inside one critical section.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::poll::Timeout;
use crate::time::Hertz;

mod config;
pub mod cpu;
pub mod flash;
pub mod gclk;
pub mod osc48m;
pub mod reset_cause;
pub mod sequencer;
pub mod watchdog;
pub mod xosc_dpll;


pub use config::{
    cfd_prescaler_for, Config, ConfigBuilder, DpllConfig, FrequencyClass, WatchdogConfig, XoscConfig,
};
pub use sequencer::{BringupResult, BringupSequencer, BringupState};

// =============================================================================
// Global Clock State
// =============================================================================

/// Whether `CLOCK_FREQS` has been initialized by `set_freqs()`.
static CLOCK_FREQS_INIT: AtomicBool = AtomicBool::new(false);

static mut CLOCK_FREQS: Clocks = Clocks::RESET;

/// Sets the clock frequencies.
///
/// Safety: Sets a mutable global.
pub(crate) unsafe fn set_freqs(freqs: Clocks) {
    debug!("clock: {:?}", freqs);
    unsafe { CLOCK_FREQS = freqs };
    CLOCK_FREQS_INIT.store(true, Ordering::Release);
}

/// Safety: Reads a mutable global. Must be called after `set_freqs()`.
pub(crate) unsafe fn get_freqs() -> &'static Clocks {
    unsafe { &*core::ptr::addr_of!(CLOCK_FREQS) }
}

/// Get the clock configuration applied by `init()`.
///
/// # Panics
///
/// Panics if called before `init()`.
pub fn clocks() -> &'static Clocks {
    assert!(
        CLOCK_FREQS_INIT.load(Ordering::Acquire),
        "clock: clocks() called before init()"
    );
    unsafe { get_freqs() }
}

// =============================================================================
// Constants
// =============================================================================

pub const CLK_OSC48M_FREQ: Hertz = Hertz(48_000_000);
pub const CLK_XOSC_FREQ: Hertz = Hertz(16_000_000);
pub const CLK_XOSC32K_FREQ: Hertz = Hertz(32_768);
/// Highest generator 0 frequency the core supports.
pub const MAX_GCLK0_FREQ: Hertz = Hertz(48_000_000);
/// Highest DPLL output frequency.
pub const MAX_DPLL_FREQ: Hertz = Hertz(96_000_000);

/// Status returned by a completed bring-up.
pub const STATUS_OK: i32 = 0;

// =============================================================================
// Types
// =============================================================================

/// Clock source a generator or the DPLL can be driven from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    InternalOscillator48M,
    /// Only ever used as the DPLL reference.
    ExternalCrystal,
    PllOutput,
}

/// Clock frequencies after bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clocks {
    /// Source generator 0 is bound to
    pub source: ClockSource,
    pub gclk0: Hertz,
    pub cpu: Hertz,
    /// `None` when the DPLL was not started.
    pub dpll: Option<Hertz>,
    /// `None` when the crystal was not started.
    pub xosc: Option<Hertz>,
}

impl Clocks {
    /// Post-reset state: OSC48M divided by 12.
    pub const RESET: Self = Self {
        source: ClockSource::InternalOscillator48M,
        gclk0: Hertz(4_000_000),
        cpu: Hertz(4_000_000),
        dpll: None,
        xosc: None,
    };

    /// `config` must have passed `ConfigBuilder::check`, which bounds every
    /// frequency below 96 MHz.
    pub(crate) fn from_config(config: &ConfigBuilder, use_pll: bool) -> Self {
        let gclk0 = Hertz(config.gclk0_freq_hz(use_pll) as u32);
        Self {
            source: if use_pll {
                ClockSource::PllOutput
            } else {
                ClockSource::InternalOscillator48M
            },
            gclk0,
            // CPUDIV is always DIV1.
            cpu: gclk0,
            dpll: use_pll.then(|| Hertz(config.dpll_freq_hz() as u32)),
            xosc: use_pll.then_some(config.xosc.frequency),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Bring-up error. Only produced when a bounded [`crate::poll::WaitPolicy`] is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Timeout(Timeout),
}

impl Error {
    /// Negative status code for `init()`.
    pub const fn status_code(&self) -> i32 {
        match self {
            Error::Timeout(_) => -110,
        }
    }
}

impl From<Timeout> for Error {
    fn from(t: Timeout) -> Self {
        Error::Timeout(t)
    }
}
