//! OSCCTRL: 48 MHz internal oscillator, crystal oscillator (XOSC) and DPLL.

use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

use super::Peripherals;

pub const OSCCTRL_BASE: usize = 0x4000_1000;

register_structs! {
    pub OscctrlRegisters {
        (0x00 => _reserved0),
        (0x0C => status: ReadOnly<u32, STATUS::Register>),
        (0x10 => xoscctrl: ReadWrite<u16, XOSCCTRL::Register>),
        (0x12 => cfdpresc: ReadWrite<u8, CFDPRESC::Register>),
        (0x13 => _reserved1),
        (0x15 => osc48mdiv: ReadWrite<u8, OSC48MDIV::Register>),
        (0x16 => _reserved2),
        (0x18 => osc48msyncbusy: ReadOnly<u32, OSC48MSYNCBUSY::Register>),
        (0x1C => dpllctrla: ReadWrite<u8, DPLLCTRLA::Register>),
        (0x1D => _reserved3),
        (0x20 => dpllratio: ReadWrite<u32, DPLLRATIO::Register>),
        (0x24 => dpllctrlb: ReadWrite<u32, DPLLCTRLB::Register>),
        (0x28 => dpllpresc: ReadWrite<u8, DPLLPRESC::Register>),
        (0x29 => _reserved4),
        (0x2C => dpllsyncbusy: ReadOnly<u8, DPLLSYNCBUSY::Register>),
        (0x2D => _reserved5),
        (0x30 => dpllstatus: ReadOnly<u8, DPLLSTATUS::Register>),
        (0x31 => _reserved6),
        (0x34 => @END),
    }
}

register_bitfields![u32,
    STATUS [
        XOSCRDY OFFSET(0) NUMBITS(1) [],
        XOSCFAIL OFFSET(1) NUMBITS(1) [],
        XOSCCKSW OFFSET(2) NUMBITS(1) [],
        OSC48MRDY OFFSET(4) NUMBITS(1) [],
        DPLLLCKR OFFSET(8) NUMBITS(1) [],
        DPLLLCKF OFFSET(9) NUMBITS(1) [],
        DPLLLTO OFFSET(10) NUMBITS(1) [],
        DPLLLDRTO OFFSET(11) NUMBITS(1) []
    ],
    OSC48MSYNCBUSY [
        OSC48MDIV OFFSET(2) NUMBITS(1) []
    ],
    DPLLRATIO [
        /// Loop Divider Ratio
        LDR OFFSET(0) NUMBITS(12) [],
        /// Loop Divider Ratio Fractional Part
        LDRFRAC OFFSET(16) NUMBITS(4) []
    ],
    DPLLCTRLB [
        FILTER OFFSET(0) NUMBITS(2) [],
        LPEN OFFSET(2) NUMBITS(1) [],
        WUF OFFSET(3) NUMBITS(1) [],
        REFCLK OFFSET(4) NUMBITS(2) [],
        LTIME OFFSET(8) NUMBITS(3) [],
        LBYPASS OFFSET(12) NUMBITS(1) [],
        /// XOSC reference division: f = f_xosc / (2 * (DIV + 1))
        DIV OFFSET(16) NUMBITS(11) []
    ]
];

register_bitfields![u16,
    XOSCCTRL [
        ENABLE OFFSET(1) NUMBITS(1) [],
        /// Crystal Oscillator Enable (0: external clock input)
        XTALEN OFFSET(2) NUMBITS(1) [],
        /// Clock Failure Detector Enable
        CFDEN OFFSET(3) NUMBITS(1) [],
        /// Xosc Clock Switch Enable
        SWBEN OFFSET(4) NUMBITS(1) [],
        RUNSTDBY OFFSET(6) NUMBITS(1) [],
        ONDEMAND OFFSET(7) NUMBITS(1) [],
        GAIN OFFSET(8) NUMBITS(3) [],
        /// Automatic Amplitude Gain Control
        AMPGC OFFSET(11) NUMBITS(1) [],
        STARTUP OFFSET(12) NUMBITS(4) []
    ]
];

register_bitfields![u8,
    CFDPRESC [
        CFDPRESC OFFSET(0) NUMBITS(3) []
    ],
    OSC48MDIV [
        DIV OFFSET(0) NUMBITS(4) []
    ],
    DPLLCTRLA [
        ENABLE OFFSET(1) NUMBITS(1) [],
        RUNSTDBY OFFSET(6) NUMBITS(1) [],
        ONDEMAND OFFSET(7) NUMBITS(1) []
    ],
    DPLLPRESC [
        PRESC OFFSET(0) NUMBITS(2) []
    ],
    DPLLSYNCBUSY [
        ENABLE OFFSET(1) NUMBITS(1) [],
        DPLLRATIO OFFSET(2) NUMBITS(1) [],
        DPLLPRESC OFFSET(3) NUMBITS(1) []
    ],
    DPLLSTATUS [
        LOCK OFFSET(0) NUMBITS(1) [],
        CLKRDY OFFSET(1) NUMBITS(1) []
    ]
];

/// `XOSCCTRL.GAIN` encodings, named after the highest crystal frequency each
/// setting is rated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum XoscGain {
    Mhz2 = 0,
    Mhz4 = 1,
    Mhz8 = 2,
    Mhz16 = 3,
    Mhz30 = 4,
}

impl XoscGain {
    pub const fn to_bits(self) -> u8 {
        self as u8
    }

    pub const fn max_frequency_hz(self) -> u32 {
        match self {
            XoscGain::Mhz2 => 2_000_000,
            XoscGain::Mhz4 => 4_000_000,
            XoscGain::Mhz8 => 8_000_000,
            XoscGain::Mhz16 => 16_000_000,
            XoscGain::Mhz30 => 30_000_000,
        }
    }
}

/// `DPLLCTRLB.REFCLK` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DpllReference {
    Xosc32k = 0,
    Xosc = 1,
    Gclk = 2,
}

/// `DPLLPRESC.PRESC` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DpllPrescaler {
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
}

impl DpllPrescaler {
    pub const fn shift(self) -> u32 {
        self as u32
    }
}

pub trait OscctrlView {
    fn set_osc48m_div(&mut self, div: u8);
    fn osc48m_div_syncing(&self) -> bool;
    fn osc48m_ready(&self) -> bool;

    fn set_xosc_gain(&mut self, gain: XoscGain);
    fn set_xosc_auto_gain(&mut self, enabled: bool);
    fn set_cfd_prescaler(&mut self, presc: u8);
    fn set_xosc_failure_detection(&mut self, enabled: bool);
    fn set_xosc_switch_back(&mut self, enabled: bool);
    fn set_xosc_on_demand(&mut self, enabled: bool);
    fn set_xosc_crystal_mode(&mut self, enabled: bool);
    fn set_xosc_enable(&mut self, enabled: bool);
    fn xosc_ready(&self) -> bool;

    fn set_dpll_on_demand(&mut self, enabled: bool);
    fn set_dpll_run_standby(&mut self, enabled: bool);
    fn set_dpll_ratio(&mut self, ldr: u16, ldrfrac: u8);
    fn set_dpll_reference(&mut self, refclk: DpllReference, filter: u8);
    fn set_dpll_prescaler(&mut self, presc: DpllPrescaler);
    fn set_dpll_enable(&mut self, enabled: bool);
    fn dpll_enable_syncing(&self) -> bool;
    fn dpll_locked(&self) -> bool;
    fn dpll_clock_ready(&self) -> bool;
}

impl OscctrlView for Peripherals {
    fn set_osc48m_div(&mut self, div: u8) {
        self.oscctrl.osc48mdiv.write(OSC48MDIV::DIV.val(div));
    }

    fn osc48m_div_syncing(&self) -> bool {
        self.oscctrl.osc48msyncbusy.is_set(OSC48MSYNCBUSY::OSC48MDIV)
    }

    fn osc48m_ready(&self) -> bool {
        self.oscctrl.status.is_set(STATUS::OSC48MRDY)
    }

    fn set_xosc_gain(&mut self, gain: XoscGain) {
        self.oscctrl
            .xoscctrl
            .modify(XOSCCTRL::GAIN.val(gain.to_bits() as u16));
    }

    fn set_xosc_auto_gain(&mut self, enabled: bool) {
        self.oscctrl.xoscctrl.modify(XOSCCTRL::AMPGC.val(enabled as u16));
    }

    fn set_cfd_prescaler(&mut self, presc: u8) {
        self.oscctrl.cfdpresc.write(CFDPRESC::CFDPRESC.val(presc));
    }

    fn set_xosc_failure_detection(&mut self, enabled: bool) {
        self.oscctrl.xoscctrl.modify(XOSCCTRL::CFDEN.val(enabled as u16));
    }

    fn set_xosc_switch_back(&mut self, enabled: bool) {
        self.oscctrl.xoscctrl.modify(XOSCCTRL::SWBEN.val(enabled as u16));
    }

    fn set_xosc_on_demand(&mut self, enabled: bool) {
        self.oscctrl
            .xoscctrl
            .modify(XOSCCTRL::ONDEMAND.val(enabled as u16));
    }

    fn set_xosc_crystal_mode(&mut self, enabled: bool) {
        self.oscctrl
            .xoscctrl
            .modify(XOSCCTRL::XTALEN.val(enabled as u16));
    }

    fn set_xosc_enable(&mut self, enabled: bool) {
        self.oscctrl
            .xoscctrl
            .modify(XOSCCTRL::ENABLE.val(enabled as u16));
    }

    fn xosc_ready(&self) -> bool {
        self.oscctrl.status.is_set(STATUS::XOSCRDY)
    }

    fn set_dpll_on_demand(&mut self, enabled: bool) {
        self.oscctrl
            .dpllctrla
            .modify(DPLLCTRLA::ONDEMAND.val(enabled as u8));
    }

    fn set_dpll_run_standby(&mut self, enabled: bool) {
        self.oscctrl
            .dpllctrla
            .modify(DPLLCTRLA::RUNSTDBY.val(enabled as u8));
    }

    fn set_dpll_ratio(&mut self, ldr: u16, ldrfrac: u8) {
        self.oscctrl
            .dpllratio
            .write(DPLLRATIO::LDR.val(ldr as u32) + DPLLRATIO::LDRFRAC.val(ldrfrac as u32));
    }

    fn set_dpll_reference(&mut self, refclk: DpllReference, filter: u8) {
        self.oscctrl
            .dpllctrlb
            .write(DPLLCTRLB::REFCLK.val(refclk as u32) + DPLLCTRLB::FILTER.val(filter as u32));
    }

    fn set_dpll_prescaler(&mut self, presc: DpllPrescaler) {
        self.oscctrl.dpllpresc.write(DPLLPRESC::PRESC.val(presc as u8));
    }

    fn set_dpll_enable(&mut self, enabled: bool) {
        self.oscctrl
            .dpllctrla
            .modify(DPLLCTRLA::ENABLE.val(enabled as u8));
    }

    fn dpll_enable_syncing(&self) -> bool {
        self.oscctrl.dpllsyncbusy.is_set(DPLLSYNCBUSY::ENABLE)
    }

    fn dpll_locked(&self) -> bool {
        self.oscctrl.dpllstatus.is_set(DPLLSTATUS::LOCK)
    }

    fn dpll_clock_ready(&self) -> bool {
        self.oscctrl.dpllstatus.is_set(DPLLSTATUS::CLKRDY)
    }
}
