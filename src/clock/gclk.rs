//! Generic clock generator 0.

use crate::pac::{DivSelect, GclkView, GenSource, GeneratorControl};
use crate::poll::{await_condition, Condition, Timeout, WaitPolicy};

use super::ClockSource;

/// Generator 0 drives the CPU and the AHB/APB buses.
pub const GCLK0: u8 = 0;

/// Bind generator 0 to the DPLL or OSC48M and wait for the write to synchronize.
///
/// Source, divisor and enable go out in one `GENCTRL0` write.
pub fn bind_generator0<H: GclkView + ?Sized>(
    hw: &mut H,
    use_pll: bool,
    div: u16,
    policy: WaitPolicy,
) -> Result<ClockSource, Timeout> {
    let (source, bound) = if use_pll {
        (GenSource::Dpll96m, ClockSource::PllOutput)
    } else {
        (GenSource::Osc48m, ClockSource::InternalOscillator48M)
    };

    let ctrl = GeneratorControl {
        source,
        divsel: DivSelect::Direct,
        div,
        enable: true,
    };
    hw.write_generator(GCLK0, ctrl);
    await_condition(Condition::GeneratorSynced(GCLK0), policy, || !hw.generator_syncing(GCLK0))?;

    debug!("gclk0: {:?} / {}", bound, ctrl.divisor());
    Ok(bound)
}
