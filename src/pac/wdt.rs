//! WDT: watchdog timer.

use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

use super::Peripherals;

pub const WDT_BASE: usize = 0x4000_2000;

register_structs! {
    pub WdtRegisters {
        (0x00 => ctrla: ReadWrite<u8, CTRLA::Register>),
        (0x01 => config: ReadWrite<u8, CONFIG::Register>),
        (0x02 => _reserved0),
        (0x08 => syncbusy: ReadOnly<u32, SYNCBUSY::Register>),
        (0x0C => @END),
    }
}

register_bitfields![u8,
    CTRLA [
        ENABLE OFFSET(1) NUMBITS(1) [],
        /// Watchdog Timer Window Mode Enable
        WEN OFFSET(2) NUMBITS(1) [],
        ALWAYSON OFFSET(7) NUMBITS(1) []
    ],
    CONFIG [
        /// Time-Out Period
        PER OFFSET(0) NUMBITS(4) [],
        /// Window Mode Time-Out Period
        WINDOW OFFSET(4) NUMBITS(4) []
    ]
];

register_bitfields![u32,
    SYNCBUSY [
        ENABLE OFFSET(1) NUMBITS(1) [],
        WEN OFFSET(2) NUMBITS(1) [],
        ALWAYSON OFFSET(3) NUMBITS(1) [],
        CLEAR OFFSET(4) NUMBITS(1) []
    ]
];

/// `CONFIG.PER` / `CONFIG.WINDOW` encodings, in cycles of the 1.024 kHz
/// watchdog clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WdtPeriod {
    Cyc8 = 0x0,
    Cyc16 = 0x1,
    Cyc32 = 0x2,
    Cyc64 = 0x3,
    Cyc128 = 0x4,
    Cyc256 = 0x5,
    Cyc512 = 0x6,
    Cyc1024 = 0x7,
    Cyc2048 = 0x8,
    Cyc4096 = 0x9,
    Cyc8192 = 0xA,
    Cyc16384 = 0xB,
}

impl WdtPeriod {
    pub const fn to_bits(self) -> u8 {
        self as u8
    }

    pub const fn cycles(self) -> u32 {
        8 << (self as u32)
    }
}

pub trait WdtView {
    fn set_wdt_period(&mut self, period: WdtPeriod);
    fn set_wdt_window(&mut self, window: WdtPeriod);
    fn set_wdt_window_mode(&mut self, enabled: bool);
    fn set_wdt_enable(&mut self, enabled: bool);
    fn wdt_enable_syncing(&self) -> bool;
}

impl WdtView for Peripherals {
    fn set_wdt_period(&mut self, period: WdtPeriod) {
        self.wdt.config.modify(CONFIG::PER.val(period.to_bits()));
    }

    fn set_wdt_window(&mut self, window: WdtPeriod) {
        self.wdt.config.modify(CONFIG::WINDOW.val(window.to_bits()));
    }

    fn set_wdt_window_mode(&mut self, enabled: bool) {
        self.wdt.ctrla.modify(CTRLA::WEN.val(enabled as u8));
    }

    fn set_wdt_enable(&mut self, enabled: bool) {
        self.wdt.ctrla.modify(CTRLA::ENABLE.val(enabled as u8));
    }

    fn wdt_enable_syncing(&self) -> bool {
        self.wdt.syncbusy.is_set(SYNCBUSY::ENABLE)
    }
}
