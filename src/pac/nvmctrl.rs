//! NVMCTRL: flash read timing.

use tock_registers::interfaces::ReadWriteable;
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use super::Peripherals;

pub const NVMCTRL_BASE: usize = 0x4100_4000;

register_structs! {
    pub NvmctrlRegisters {
        (0x00 => _reserved0),
        (0x04 => ctrlb: ReadWrite<u32, CTRLB::Register>),
        (0x08 => @END),
    }
}

register_bitfields![u32,
    CTRLB [
        /// NVM Read Wait States
        RWS OFFSET(1) NUMBITS(4) [],
        /// Manual Write
        MANW OFFSET(7) NUMBITS(1) [],
        /// Power Reduction Mode during Sleep
        SLEEPPRM OFFSET(8) NUMBITS(2) [],
        /// NVMCTRL Read Mode
        READMODE OFFSET(16) NUMBITS(2) [],
        /// Cache Disable
        CACHEDIS OFFSET(18) NUMBITS(1) []
    ]
];

/// `CTRLB.RWS` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReadWaitStates {
    /// No wait state.
    Single = 0,
    /// One wait state.
    Half = 1,
    /// Two wait states.
    Dual = 2,
}

impl ReadWaitStates {
    pub const fn to_bits(self) -> u8 {
        self as u8
    }
}

pub trait NvmctrlView {
    fn set_read_wait_states(&mut self, rws: ReadWaitStates);
}

impl NvmctrlView for Peripherals {
    fn set_read_wait_states(&mut self, rws: ReadWaitStates) {
        self.nvmctrl
            .ctrlb
            .modify(CTRLB::RWS.val(rws.to_bits() as u32));
    }
}
