//! Watchdog bracket around the crystal/DPLL attempt.
//!
//! If the DPLL never locks, the watchdog resets the chip and the next boot
//! sees a watchdog reset cause and skips the DPLL. The time between [`arm`]
//! and [`disarm`] must stay below the watchdog period.

use crate::pac::{MclkView, WdtView};
use crate::poll::{await_condition, Condition, WaitPolicy};

use super::WatchdogConfig;

/// Token for a running watchdog. Consumed by [`disarm`].
#[must_use = "the watchdog keeps running until `disarm` is called"]
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Armed {
    confirmed: bool,
    polls: u32,
}

impl Armed {
    /// Whether `SYNCBUSY.ENABLE` cleared within the retry budget.
    pub fn confirmed(&self) -> bool {
        self.confirmed
    }
}

/// Clock and enable the watchdog.
///
/// The enable synchronization is polled at most `sync_retries` times. Running
/// out is logged and reported through [`Armed::confirmed`], never waited on.
pub fn arm<H: MclkView + WdtView + ?Sized>(hw: &mut H, config: &WatchdogConfig) -> Armed {
    hw.set_wdt_bus_clock(true);
    if let Some(period) = config.period {
        hw.set_wdt_period(period);
    }
    hw.set_wdt_window(config.window);
    if config.window_mode {
        hw.set_wdt_window_mode(true);
    }
    hw.set_wdt_enable(true);

    let policy = WaitPolicy::bounded(config.sync_retries);
    match await_condition(Condition::WdtEnableSynced, policy, || !hw.wdt_enable_syncing()) {
        Ok(polls) => {
            debug!("watchdog: armed, window {:?}, {} sync polls", config.window, polls);
            Armed {
                confirmed: true,
                polls,
            }
        }
        Err(timeout) => {
            warn!("watchdog: enable not confirmed after {} polls", timeout.polls);
            Armed {
                confirmed: false,
                polls: timeout.polls,
            }
        }
    }
}

/// Stop the watchdog, then gate its bus clock.
///
/// Returns whether the disable synchronized before the clock was gated.
pub fn disarm<H: MclkView + WdtView + ?Sized>(hw: &mut H, config: &WatchdogConfig, armed: Armed) -> bool {
    hw.set_wdt_enable(false);
    let policy = WaitPolicy::bounded(config.sync_retries);
    let synced = await_condition(Condition::WdtEnableSynced, policy, || !hw.wdt_enable_syncing()).is_ok();
    if !synced {
        warn!("watchdog: disable not confirmed after {} polls", config.sync_retries);
    }
    hw.set_wdt_bus_clock(false);
    trace!(
        "watchdog: disarmed (armed confirmed: {}, {} sync polls)",
        armed.confirmed,
        armed.polls
    );
    synced
}
