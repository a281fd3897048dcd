//! Register blocks touched during clock bring-up.
//!
//! Each peripheral exposes a narrow `*View` trait covering exactly the fields
//! the bring-up sequence drives. [`Peripherals`] implements them over MMIO; a
//! software model can implement them too.

use core::cell::Cell;

use critical_section::Mutex;

pub mod gclk;
pub mod mclk;
pub mod nvmctrl;
pub mod oscctrl;
pub mod rstc;
pub mod wdt;

pub use gclk::{DivSelect, GclkView, GenSource, GeneratorControl};
pub use mclk::{CpuDiv, MclkView};
pub use nvmctrl::{NvmctrlView, ReadWaitStates};
pub use oscctrl::{DpllPrescaler, DpllReference, OscctrlView, XoscGain};
pub use rstc::{ResetCause, RstcView};
pub use wdt::{WdtPeriod, WdtView};

use gclk::{GclkRegisters, GCLK_BASE};
use mclk::{MclkRegisters, MCLK_BASE};
use nvmctrl::{NvmctrlRegisters, NVMCTRL_BASE};
use oscctrl::{OscctrlRegisters, OSCCTRL_BASE};
use rstc::{RstcRegisters, RSTC_BASE};
use wdt::{WdtRegisters, WDT_BASE};

/// Every register the bring-up sequence reads or writes.
pub trait ClockRegisters: NvmctrlView + OscctrlView + MclkView + WdtView + RstcView + GclkView {}

impl<T> ClockRegisters for T where T: NvmctrlView + OscctrlView + MclkView + WdtView + RstcView + GclkView {}

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// Owned handle to the clock-related register blocks.
pub struct Peripherals {
    pub(crate) nvmctrl: &'static NvmctrlRegisters,
    pub(crate) oscctrl: &'static OscctrlRegisters,
    pub(crate) mclk: &'static MclkRegisters,
    pub(crate) wdt: &'static WdtRegisters,
    pub(crate) rstc: &'static RstcRegisters,
    pub(crate) gclk: &'static GclkRegisters,
}

impl Peripherals {
    /// Returns the handle once; `None` on every later call.
    pub fn take() -> Option<Self> {
        critical_section::with(|cs| {
            let taken = TAKEN.borrow(cs);
            if taken.get() {
                None
            } else {
                taken.set(true);
                Some(unsafe { Self::steal() })
            }
        })
    }

    /// # Safety
    ///
    /// Must not alias a handle that is still in use.
    pub unsafe fn steal() -> Self {
        Self {
            nvmctrl: &*(NVMCTRL_BASE as *const NvmctrlRegisters),
            oscctrl: &*(OSCCTRL_BASE as *const OscctrlRegisters),
            mclk: &*(MCLK_BASE as *const MclkRegisters),
            wdt: &*(WDT_BASE as *const WdtRegisters),
            rstc: &*(RSTC_BASE as *const RstcRegisters),
            gclk: &*(GCLK_BASE as *const GclkRegisters),
        }
    }
}
