//! MCLK: CPU clock divider and APB bus clock masks.

use tock_registers::interfaces::{ReadWriteable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use super::Peripherals;

pub const MCLK_BASE: usize = 0x4000_0800;

register_structs! {
    pub MclkRegisters {
        (0x00 => _reserved0),
        (0x04 => cpudiv: ReadWrite<u8, CPUDIV::Register>),
        (0x05 => _reserved1),
        (0x14 => apbamask: ReadWrite<u32, APBAMASK::Register>),
        (0x18 => @END),
    }
}

register_bitfields![u8,
    CPUDIV [
        CPUDIV OFFSET(0) NUMBITS(8) []
    ]
];

register_bitfields![u32,
    APBAMASK [
        PAC OFFSET(0) NUMBITS(1) [],
        PM OFFSET(1) NUMBITS(1) [],
        MCLK OFFSET(2) NUMBITS(1) [],
        RSTC OFFSET(3) NUMBITS(1) [],
        OSCCTRL OFFSET(4) NUMBITS(1) [],
        OSC32KCTRL OFFSET(5) NUMBITS(1) [],
        SUPC OFFSET(6) NUMBITS(1) [],
        GCLK OFFSET(7) NUMBITS(1) [],
        WDT OFFSET(8) NUMBITS(1) [],
        RTC OFFSET(9) NUMBITS(1) [],
        EIC OFFSET(10) NUMBITS(1) [],
        FREQM OFFSET(11) NUMBITS(1) [],
        TSENS OFFSET(12) NUMBITS(1) []
    ]
];

/// `CPUDIV.CPUDIV` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CpuDiv {
    Div1 = 0x01,
    Div2 = 0x02,
    Div4 = 0x04,
    Div8 = 0x08,
    Div16 = 0x10,
    Div32 = 0x20,
    Div64 = 0x40,
    Div128 = 0x80,
}

impl CpuDiv {
    pub const fn to_bits(self) -> u8 {
        self as u8
    }

    /// The divisor, which is also the register encoding.
    pub const fn divisor(self) -> u32 {
        self as u32
    }
}

pub trait MclkView {
    fn set_cpu_div(&mut self, div: CpuDiv);
    /// Gate the WDT APB clock.
    fn set_wdt_bus_clock(&mut self, enabled: bool);
}

impl MclkView for Peripherals {
    fn set_cpu_div(&mut self, div: CpuDiv) {
        self.mclk.cpudiv.write(CPUDIV::CPUDIV.val(div.to_bits()));
    }

    fn set_wdt_bus_clock(&mut self, enabled: bool) {
        self.mclk.apbamask.modify(APBAMASK::WDT.val(enabled as u32));
    }
}
