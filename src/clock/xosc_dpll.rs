//! Crystal oscillator and DPLL.

use crate::pac::OscctrlView;
use crate::poll::{await_condition, Condition, Timeout, WaitPolicy};

use super::{DpllConfig, XoscConfig};

/// Start the crystal, then lock the DPLL on it.
///
/// Returns `true` once the DPLL output is ready. With an unbounded policy this
/// only returns once every wait is satisfied.
pub fn try_lock_pll<H: OscctrlView + ?Sized>(
    hw: &mut H,
    xosc: &XoscConfig,
    dpll: &DpllConfig,
    policy: WaitPolicy,
) -> Result<bool, Timeout> {
    start_crystal(hw, xosc, policy)?;
    lock_dpll(hw, dpll, policy)?;
    debug!(
        "dpll: locked, LDR {} LDRFRAC {}, {} Hz",
        dpll.ldr,
        dpll.ldrfrac,
        dpll.freq_hz(xosc.frequency.0)
    );
    Ok(true)
}

fn start_crystal<H: OscctrlView + ?Sized>(
    hw: &mut H,
    xosc: &XoscConfig,
    policy: WaitPolicy,
) -> Result<(), Timeout> {
    hw.set_xosc_gain(xosc.gain);
    hw.set_xosc_auto_gain(xosc.auto_gain);
    hw.set_cfd_prescaler(xosc.cfd_prescaler);
    hw.set_xosc_failure_detection(xosc.failure_detection);
    hw.set_xosc_switch_back(xosc.switch_back);
    hw.set_xosc_on_demand(false);
    hw.set_xosc_crystal_mode(true);
    hw.set_xosc_enable(true);

    let polls = await_condition(Condition::XoscReady, policy, || hw.xosc_ready())?;
    trace!("xosc: ready after {} polls", polls);
    Ok(())
}

fn lock_dpll<H: OscctrlView + ?Sized>(
    hw: &mut H,
    dpll: &DpllConfig,
    policy: WaitPolicy,
) -> Result<(), Timeout> {
    hw.set_dpll_on_demand(false);
    hw.set_dpll_run_standby(false);
    hw.set_dpll_ratio(dpll.ldr, dpll.ldrfrac);
    hw.set_dpll_reference(dpll.reference, dpll.filter);
    hw.set_dpll_prescaler(dpll.prescaler);
    hw.set_dpll_enable(true);

    await_condition(Condition::DpllEnableSynced, policy, || !hw.dpll_enable_syncing())?;
    await_condition(Condition::DpllLocked, policy, || hw.dpll_locked())?;
    await_condition(Condition::DpllClockReady, policy, || hw.dpll_clock_ready())?;
    Ok(())
}
