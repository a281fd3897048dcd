//! RSTC: reset controller.

use tock_registers::interfaces::Readable;
use tock_registers::registers::ReadOnly;
use tock_registers::{register_bitfields, register_structs, LocalRegisterCopy};

use super::Peripherals;

pub const RSTC_BASE: usize = 0x4000_0C00;

register_structs! {
    pub RstcRegisters {
        (0x00 => rcause: ReadOnly<u8, RCAUSE::Register>),
        (0x01 => _reserved0),
        (0x04 => @END),
    }
}

register_bitfields![u8,
    RCAUSE [
        /// Power On Reset
        POR OFFSET(0) NUMBITS(1) [],
        /// Brown Out CORE Detector Reset
        BODCORE OFFSET(1) NUMBITS(1) [],
        /// Brown Out VDD Detector Reset
        BODVDD OFFSET(2) NUMBITS(1) [],
        /// External Reset
        EXT OFFSET(4) NUMBITS(1) [],
        /// Watchdog Reset
        WDT OFFSET(5) NUMBITS(1) [],
        /// System Reset Request
        SYST OFFSET(6) NUMBITS(1) []
    ]
];

/// Snapshot of `RCAUSE`, taken once per boot.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ResetCause(u8);

impl ResetCause {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    fn copy(self) -> LocalRegisterCopy<u8, RCAUSE::Register> {
        LocalRegisterCopy::new(self.0)
    }

    pub fn was_watchdog_reset(self) -> bool {
        self.copy().is_set(RCAUSE::WDT)
    }

    pub fn was_power_on(self) -> bool {
        self.copy().is_set(RCAUSE::POR)
    }

    pub fn was_brown_out(self) -> bool {
        let rcause = self.copy();
        rcause.is_set(RCAUSE::BODCORE) || rcause.is_set(RCAUSE::BODVDD)
    }

    pub fn was_external(self) -> bool {
        self.copy().is_set(RCAUSE::EXT)
    }

    pub fn was_system_request(self) -> bool {
        self.copy().is_set(RCAUSE::SYST)
    }
}

impl core::fmt::Debug for ResetCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResetCause")
            .field("bits", &format_args!("{:#04x}", self.bits()))
            .field("watchdog", &self.was_watchdog_reset())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ResetCause {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "ResetCause {{ bits: {=u8:#04x}, watchdog: {=bool} }}",
            self.bits(),
            self.was_watchdog_reset()
        )
    }
}

pub trait RstcView {
    fn reset_cause(&self) -> ResetCause;
}

impl RstcView for Peripherals {
    fn reset_cause(&self) -> ResetCause {
        ResetCause(self.rstc.rcause.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_watchdog_bit() {
        assert!(ResetCause::from_bits(1 << 5).was_watchdog_reset());
        assert!(!ResetCause::from_bits(1 << 6).was_watchdog_reset());
        assert!(ResetCause::from_bits(1 << 6).was_system_request());
        assert!(ResetCause::from_bits(0x01).was_power_on());
        assert!(ResetCause::from_bits(0x10).was_external());
        assert!(ResetCause::from_bits(0x04).was_brown_out());
    }

    #[test]
    fn debug_shows_raw_bits() {
        let shown = std::format!("{:?}", ResetCause::from_bits(0x20));
        assert_eq!(shown, "ResetCause { bits: 0x20, watchdog: true }");
    }
}
