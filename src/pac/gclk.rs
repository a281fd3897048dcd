//! GCLK: generic clock generators.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

use super::Peripherals;

pub const GCLK_BASE: usize = 0x4000_1C00;

pub const GENERATOR_COUNT: usize = 9;

register_structs! {
    pub GclkRegisters {
        (0x00 => _reserved0),
        (0x04 => syncbusy: ReadOnly<u32, SYNCBUSY::Register>),
        (0x08 => _reserved1),
        (0x20 => genctrl: [ReadWrite<u32, GENCTRL::Register>; GENERATOR_COUNT]),
        (0x44 => @END),
    }
}

register_bitfields![u32,
    SYNCBUSY [
        SWRST OFFSET(0) NUMBITS(1) [],
        /// One bit per generator, GENCTRL0 at bit 2.
        GENCTRL OFFSET(2) NUMBITS(9) []
    ],
    GENCTRL [
        SRC OFFSET(0) NUMBITS(3) [],
        /// Generic Clock Generator Enable
        GENEN OFFSET(8) NUMBITS(1) [],
        /// Improve Duty Cycle
        IDC OFFSET(9) NUMBITS(1) [],
        /// Output Off Value
        OOV OFFSET(10) NUMBITS(1) [],
        /// Output Enable
        OE OFFSET(11) NUMBITS(1) [],
        /// Divide Selection
        DIVSEL OFFSET(12) NUMBITS(1) [],
        RUNSTDBY OFFSET(13) NUMBITS(1) [],
        /// Division Factor
        DIV OFFSET(16) NUMBITS(16) []
    ]
];

/// `GENCTRL.SRC` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GenSource {
    Xosc = 0,
    GclkIn = 1,
    GclkGen1 = 2,
    OscUlp32k = 3,
    Osc32k = 4,
    Xosc32k = 5,
    Osc48m = 6,
    Dpll96m = 7,
}

/// `GENCTRL.DIVSEL` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DivSelect {
    /// Divide by `DIV`; 0 and 1 both mean undivided.
    Direct = 0,
    /// Divide by `2^(DIV+1)`.
    Power2 = 1,
}

/// Everything written to one `GENCTRLn` in a single store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeneratorControl {
    pub source: GenSource,
    pub divsel: DivSelect,
    pub div: u16,
    pub enable: bool,
}

impl GeneratorControl {
    /// Effective division factor.
    pub const fn divisor(&self) -> u32 {
        match self.divsel {
            DivSelect::Direct if self.div == 0 => 1,
            DivSelect::Direct => self.div as u32,
            DivSelect::Power2 => 1 << (self.div as u32 + 1),
        }
    }
}

pub trait GclkView {
    fn write_generator(&mut self, id: u8, ctrl: GeneratorControl);
    fn generator_syncing(&self, id: u8) -> bool;
}

impl GclkView for Peripherals {
    fn write_generator(&mut self, id: u8, ctrl: GeneratorControl) {
        self.gclk.genctrl[id as usize].write(
            GENCTRL::SRC.val(ctrl.source as u32)
                + GENCTRL::DIVSEL.val(ctrl.divsel as u32)
                + GENCTRL::DIV.val(ctrl.div as u32)
                + GENCTRL::GENEN.val(ctrl.enable as u32),
        );
    }

    fn generator_syncing(&self, id: u8) -> bool {
        self.gclk.syncbusy.read(SYNCBUSY::GENCTRL) & (1 << id) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(divsel: DivSelect, div: u16) -> GeneratorControl {
        GeneratorControl {
            source: GenSource::Osc48m,
            divsel,
            div,
            enable: true,
        }
    }

    #[test]
    fn division_factor() {
        assert_eq!(ctrl(DivSelect::Direct, 0).divisor(), 1);
        assert_eq!(ctrl(DivSelect::Direct, 1).divisor(), 1);
        assert_eq!(ctrl(DivSelect::Direct, 6).divisor(), 6);
        assert_eq!(ctrl(DivSelect::Power2, 0).divisor(), 2);
        assert_eq!(ctrl(DivSelect::Power2, 3).divisor(), 16);
    }
}
