//! CPU clock divider.

use crate::pac::{CpuDiv, MclkView};

/// CPU clock = generator 0.
pub fn set_cpu_divider_unity<H: MclkView + ?Sized>(hw: &mut H) {
    hw.set_cpu_div(CpuDiv::Div1);
}
