//! OSC48M: undivided internal oscillator.

use crate::pac::OscctrlView;
use crate::poll::{await_condition, Condition, Timeout, WaitPolicy};

/// Run OSC48M undivided and wait until it is stable.
///
/// Idempotent; safe to call on an already undivided oscillator.
pub fn stabilize_internal_oscillator<H: OscctrlView + ?Sized>(
    hw: &mut H,
    policy: WaitPolicy,
) -> Result<(), Timeout> {
    hw.set_osc48m_div(0);
    await_condition(Condition::Osc48mDivSynced, policy, || !hw.osc48m_div_syncing())?;
    await_condition(Condition::Osc48mReady, policy, || hw.osc48m_ready())?;
    trace!("osc48m: stable at 48 MHz");
    Ok(())
}
