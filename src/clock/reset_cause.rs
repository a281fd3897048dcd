//! Reset cause snapshot.

use crate::pac::{ResetCause, RstcView};

/// Read `RCAUSE` once. Must run before the watchdog is touched.
pub fn sample<H: RstcView + ?Sized>(hw: &H) -> ResetCause {
    let cause = hw.reset_cause();
    debug!("reset cause: {:?}", cause);
    cause
}
