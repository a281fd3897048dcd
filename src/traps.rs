//! Trap handler installation at the end of bring-up.
//!
//! The application owns the exception vector table. Its `NMI` handler calls
//! [`on_nmi`], which does whatever the installed [`NmiAction`] says.

use core::sync::atomic::{AtomicBool, Ordering};

/// Installs fault handlers once clocks are up.
pub trait TrapInstaller {
    fn install(&mut self);
}

/// What an NMI does after bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NmiAction {
    /// Request a system reset.
    Reset,
    /// Return from the handler.
    Ignore,
}

cfg_if::cfg_if! {
    if #[cfg(feature = "nmi-reset")] {
        const DEFAULT_NMI_ACTION: NmiAction = NmiAction::Reset;
    } else {
        const DEFAULT_NMI_ACTION: NmiAction = NmiAction::Ignore;
    }
}

impl Default for NmiAction {
    fn default() -> Self {
        DEFAULT_NMI_ACTION
    }
}

static NMI_RESETS: AtomicBool = AtomicBool::new(false);

/// Routes NMIs according to an [`NmiAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DefaultTraps {
    pub nmi: NmiAction,
}

impl DefaultTraps {
    pub const fn new(nmi: NmiAction) -> Self {
        Self { nmi }
    }
}

impl TrapInstaller for DefaultTraps {
    fn install(&mut self) {
        NMI_RESETS.store(self.nmi == NmiAction::Reset, Ordering::Release);
        debug!("traps: NMI -> {:?}", self.nmi);
    }
}

/// Whether the installed handler resets on NMI.
pub fn nmi_resets() -> bool {
    NMI_RESETS.load(Ordering::Acquire)
}

/// Body of the application's `NMI` exception handler.
pub fn on_nmi() {
    if nmi_resets() {
        cortex_m::peripheral::SCB::sys_reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_selects_nmi_action() {
        DefaultTraps::new(NmiAction::Reset).install();
        assert!(nmi_resets());

        DefaultTraps::new(NmiAction::Ignore).install();
        assert!(!nmi_resets());
        // Returns without touching the SCB.
        on_nmi();
    }

    #[test]
    fn default_action_follows_feature() {
        let expected = if cfg!(feature = "nmi-reset") {
            NmiAction::Reset
        } else {
            NmiAction::Ignore
        };
        assert_eq!(DefaultTraps::default().nmi, expected);
    }
}
