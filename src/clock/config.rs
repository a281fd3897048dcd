//! Bring-up configuration and its compile-time validation.

use crate::pac::{DpllPrescaler, DpllReference, ReadWaitStates, WdtPeriod, XoscGain};
use crate::poll::WaitPolicy;
use crate::time::Hertz;

use super::{CLK_OSC48M_FREQ, CLK_XOSC32K_FREQ, CLK_XOSC_FREQ, MAX_DPLL_FREQ, MAX_GCLK0_FREQ};

/// Highest generator 0 frequency the flash timing has to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrequencyClass {
    /// Zero wait states.
    UpTo24MHz,
    /// One wait state.
    UpTo48MHz,
}

impl FrequencyClass {
    pub const fn wait_states(self) -> ReadWaitStates {
        match self {
            FrequencyClass::UpTo24MHz => ReadWaitStates::Single,
            FrequencyClass::UpTo48MHz => ReadWaitStates::Half,
        }
    }

    pub const fn max_frequency(self) -> Hertz {
        match self {
            FrequencyClass::UpTo24MHz => Hertz::mhz(24),
            FrequencyClass::UpTo48MHz => Hertz::mhz(48),
        }
    }
}

/// Crystal oscillator setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XoscConfig {
    /// Crystal frequency
    pub frequency: Hertz,
    pub gain: XoscGain,
    /// Automatic amplitude gain control
    pub auto_gain: bool,
    /// Clock failure detector prescaler applied to OSC48M
    pub cfd_prescaler: u8,
    /// Clock failure detection
    pub failure_detection: bool,
    /// Switch back to the crystal once it recovers from a failure
    pub switch_back: bool,
}

impl XoscConfig {
    /// 16 MHz crystal, failure detection falling back to OSC48M/4.
    pub const CRYSTAL_16MHZ: Self = Self {
        frequency: CLK_XOSC_FREQ,
        gain: XoscGain::Mhz16,
        auto_gain: true,
        cfd_prescaler: cfd_prescaler_for(CLK_XOSC_FREQ),
        failure_detection: true,
        switch_back: true,
    };
}

/// DPLL setup. The XOSC reference is divided by 2 before the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DpllConfig {
    pub reference: DpllReference,
    /// Loop divider ratio, integer part
    pub ldr: u16,
    /// Loop divider ratio, fractional part in sixteenths
    pub ldrfrac: u8,
    pub prescaler: DpllPrescaler,
    /// Loop filter selection
    pub filter: u8,
}

impl DpllConfig {
    pub const fn new(ldr: u16) -> Self {
        Self {
            reference: DpllReference::Xosc,
            ldr,
            ldrfrac: 0,
            prescaler: DpllPrescaler::Div1,
            filter: 0,
        }
    }

    pub const fn with_ldrfrac(mut self, ldrfrac: u8) -> Self {
        self.ldrfrac = ldrfrac;
        self
    }

    pub const fn with_prescaler(mut self, prescaler: DpllPrescaler) -> Self {
        self.prescaler = prescaler;
        self
    }

    pub const fn with_reference(mut self, reference: DpllReference) -> Self {
        self.reference = reference;
        self
    }

    /// Loop input frequency for the given crystal.
    pub const fn reference_freq_hz(&self, xosc_hz: u32) -> u32 {
        match self.reference {
            DpllReference::Xosc => xosc_hz / 2,
            DpllReference::Xosc32k => CLK_XOSC32K_FREQ.0,
            // Rejected by `ConfigBuilder::check`
            DpllReference::Gclk => 0,
        }
    }

    /// Output frequency: `f_ref * (LDR + 1 + LDRFRAC / 16)`, then the prescaler.
    ///
    /// Wide enough for any 12-bit LDR; `ConfigBuilder::check` bounds it.
    pub const fn freq_hz(&self, xosc_hz: u32) -> u64 {
        let f_ref = self.reference_freq_hz(xosc_hz) as u64;
        let sixteenths = (self.ldr as u64 + 1) * 16 + self.ldrfrac as u64;
        (f_ref * sixteenths / 16) >> self.prescaler.shift()
    }
}

/// Watchdog bracket around the crystal/DPLL attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogConfig {
    /// Time-out period. `None` keeps the value loaded from the user row.
    pub period: Option<WdtPeriod>,
    /// Window mode closed period
    pub window: WdtPeriod,
    pub window_mode: bool,
    /// Enable-synchronization polls before giving up on confirmation.
    pub sync_retries: u32,
}

impl WatchdogConfig {
    pub const fn new() -> Self {
        Self {
            period: None,
            window: WdtPeriod::Cyc1024,
            window_mode: false,
            sync_retries: 1000,
        }
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock bring-up configuration
///
/// Both presets target a 16 MHz crystal and run generator 0 undivided:
/// - guarded: DPLL at 8 MHz * 6 = 48 MHz, watchdog around the attempt
/// - unguarded: DPLL at 8 MHz * 4 = 32 MHz, no watchdog
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigBuilder {
    /// Skip the DPLL after a watchdog reset and arm the watchdog around it otherwise.
    pub guarded: bool,
    pub flash: FrequencyClass,
    pub xosc: XoscConfig,
    pub dpll: DpllConfig,
    pub watchdog: WatchdogConfig,
    /// Generator 0 division factor
    pub gclk0_div: u16,
    /// Applied to every wait except the watchdog enable synchronization.
    pub wait: WaitPolicy,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::guarded()
    }
}

impl ConfigBuilder {
    pub const fn guarded() -> Self {
        Self {
            guarded: true,
            flash: FrequencyClass::UpTo48MHz,
            xosc: XoscConfig::CRYSTAL_16MHZ,
            dpll: DpllConfig::new(5),
            watchdog: WatchdogConfig::new(),
            gclk0_div: 1,
            wait: WaitPolicy::UNBOUNDED,
        }
    }

    pub const fn unguarded() -> Self {
        Self {
            guarded: false,
            dpll: DpllConfig::new(3),
            ..Self::guarded()
        }
    }

    pub const fn with_guarded(mut self, guarded: bool) -> Self {
        self.guarded = guarded;
        self
    }

    pub const fn with_flash(mut self, flash: FrequencyClass) -> Self {
        self.flash = flash;
        self
    }

    pub const fn with_xosc(mut self, xosc: XoscConfig) -> Self {
        self.xosc = xosc;
        self
    }

    pub const fn with_dpll(mut self, dpll: DpllConfig) -> Self {
        self.dpll = dpll;
        self
    }

    pub const fn with_watchdog(mut self, watchdog: WatchdogConfig) -> Self {
        self.watchdog = watchdog;
        self
    }

    pub const fn with_gclk0_div(mut self, div: u16) -> Self {
        self.gclk0_div = div;
        self
    }

    pub const fn with_wait_policy(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Validate configuration consistency.
    ///
    /// Panics with a descriptive message if the configuration is invalid.
    /// Use inside `const { }` blocks to get compile-time errors.
    ///
    /// Note: Uses `::core::panic!` to bypass defmt's panic override,
    /// which is not const-compatible.
    pub const fn check(&self) {
        if self.dpll.ldr > 0xFFF {
            ::core::panic!("DPLL LDR exceeds 12 bits");
        }
        if self.dpll.ldrfrac > 15 {
            ::core::panic!("DPLL LDRFRAC exceeds 15");
        }
        if self.dpll.filter > 3 {
            ::core::panic!("DPLL filter selection exceeds 3");
        }
        if let DpllReference::Gclk = self.dpll.reference {
            ::core::panic!("DPLL must be referenced from XOSC or XOSC32K");
        }

        if self.gclk0_div == 0 {
            ::core::panic!("generator 0 divisor must be at least 1");
        }

        if self.dpll_freq_hz() > MAX_DPLL_FREQ.0 as u64 {
            ::core::panic!("DPLL output exceeds 96 MHz");
        }
        let max = self.max_gclk0_freq_hz();
        if max > MAX_GCLK0_FREQ.0 as u64 {
            ::core::panic!("generator 0 frequency exceeds 48 MHz");
        }
        if max > self.flash.max_frequency().0 as u64 {
            ::core::panic!("generator 0 frequency exceeds the flash wait-state class");
        }

        if self.xosc.frequency.0 > self.xosc.gain.max_frequency_hz() {
            ::core::panic!("XOSC gain is too low for the crystal frequency");
        }
        if self.xosc.cfd_prescaler > 7 {
            ::core::panic!("clock failure detector prescaler exceeds 7");
        }
        if self.xosc.failure_detection
            && self.xosc.cfd_prescaler != cfd_prescaler_for(self.xosc.frequency)
        {
            ::core::panic!("clock failure detector prescaler does not match the crystal frequency");
        }

        if self.guarded {
            if self.watchdog.sync_retries == 0 {
                ::core::panic!("watchdog enable sync needs at least one poll");
            }
            if self.watchdog.window_mode {
                if let Some(period) = self.watchdog.period {
                    if self.watchdog.window as u8 >= period as u8 {
                        ::core::panic!("watchdog window must be shorter than its period");
                    }
                }
            }
        }
    }

    /// Validate and return a [`Config`]. Use in `const { }` blocks for compile-time checking.
    ///
    /// ```rust,ignore
    /// const { clock::ConfigBuilder::guarded().checked() }
    /// ```
    pub const fn checked(self) -> Config {
        self.check();
        Config(self)
    }

    pub(crate) const fn dpll_freq_hz(&self) -> u64 {
        self.dpll.freq_hz(self.xosc.frequency.0)
    }

    pub(crate) const fn gclk0_freq_hz(&self, use_pll: bool) -> u64 {
        let src = if use_pll {
            self.dpll_freq_hz()
        } else {
            CLK_OSC48M_FREQ.0 as u64
        };
        src / self.gclk0_div as u64
    }

    /// Worst case over both paths; the DPLL can be skipped at run time.
    pub(crate) const fn max_gclk0_freq_hz(&self) -> u64 {
        let pll = self.gclk0_freq_hz(true);
        let osc = self.gclk0_freq_hz(false);
        if pll > osc {
            pll
        } else {
            osc
        }
    }
}

/// A validated clock configuration.
///
/// Can only be constructed via [`ConfigBuilder::checked()`], which validates at
/// compile time when used inside a `const { }` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config(pub(crate) ConfigBuilder);

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::guarded().checked()
    }
}

/// Smallest failure-detector prescaler that brings OSC48M down to the
/// crystal frequency or below.
pub const fn cfd_prescaler_for(crystal: Hertz) -> u8 {
    let mut presc = 0u8;
    while presc < 7 && (CLK_OSC48M_FREQ.0 >> presc) > crystal.0 {
        presc += 1;
    }
    presc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_pass_checks() {
        ConfigBuilder::guarded().check();
        ConfigBuilder::unguarded().check();
        let _ = const { ConfigBuilder::guarded().checked() };
    }

    #[test]
    fn preset_ratios() {
        assert_eq!(ConfigBuilder::guarded().dpll.ldr, 5);
        assert_eq!(ConfigBuilder::unguarded().dpll.ldr, 3);
        assert_eq!(ConfigBuilder::guarded().dpll.ldrfrac, 0);
        assert_eq!(ConfigBuilder::unguarded().dpll.ldrfrac, 0);
    }

    #[test]
    fn dpll_output_frequency() {
        assert_eq!(ConfigBuilder::guarded().dpll_freq_hz(), 48_000_000);
        assert_eq!(ConfigBuilder::unguarded().dpll_freq_hz(), 32_000_000);
        let frac = DpllConfig::new(3).with_ldrfrac(8);
        assert_eq!(frac.freq_hz(16_000_000), 36_000_000);
        let halved = DpllConfig::new(5).with_prescaler(DpllPrescaler::Div2);
        assert_eq!(halved.freq_hz(16_000_000), 24_000_000);
    }

    #[test]
    fn cfd_prescaler_tracks_crystal() {
        assert_eq!(cfd_prescaler_for(Hertz::mhz(16)), 2);
        assert_eq!(cfd_prescaler_for(Hertz::mhz(8)), 3);
        assert_eq!(cfd_prescaler_for(Hertz::mhz(30)), 1);
        assert_eq!(cfd_prescaler_for(Hertz::mhz(48)), 0);
        assert_eq!(XoscConfig::CRYSTAL_16MHZ.cfd_prescaler, 2);
    }

    #[test]
    fn flash_class_wait_states() {
        assert_eq!(FrequencyClass::UpTo48MHz.wait_states(), ReadWaitStates::Half);
        assert_eq!(FrequencyClass::UpTo24MHz.wait_states(), ReadWaitStates::Single);
    }

    #[test]
    fn halved_generator_fits_low_flash_class() {
        ConfigBuilder::unguarded()
            .with_flash(FrequencyClass::UpTo24MHz)
            .with_gclk0_div(2)
            .check();
    }

    #[test]
    #[should_panic(expected = "flash wait-state class")]
    fn undivided_osc48m_needs_a_wait_state() {
        ConfigBuilder::unguarded()
            .with_flash(FrequencyClass::UpTo24MHz)
            .check();
    }

    #[test]
    #[should_panic(expected = "exceeds 48 MHz")]
    fn rejects_overclocked_generator() {
        ConfigBuilder::guarded().with_dpll(DpllConfig::new(7)).check();
    }

    #[test]
    #[should_panic(expected = "exceeds 96 MHz")]
    fn rejects_ratio_past_u32_range() {
        // 8 MHz * 538 = 4.304 GHz, which is 9.03 MHz once truncated to 32 bits.
        ConfigBuilder::guarded().with_dpll(DpllConfig::new(537)).check();
    }

    #[test]
    fn wide_ratio_is_not_truncated() {
        assert_eq!(DpllConfig::new(537).freq_hz(16_000_000), 4_304_000_000);
        assert_eq!(DpllConfig::new(0xFFF).freq_hz(16_000_000), 32_768_000_000);
    }

    #[test]
    #[should_panic(expected = "exceeds 96 MHz")]
    fn rejects_dpll_hidden_behind_generator_divisor() {
        // 8 MHz * 4096 / 0xFFFF stays under 48 MHz at generator 0.
        ConfigBuilder::guarded()
            .with_dpll(DpllConfig::new(0xFFF))
            .with_gclk0_div(0xFFFF)
            .check();
    }

    #[test]
    #[should_panic(expected = "at least 1")]
    fn rejects_zero_divisor() {
        ConfigBuilder::guarded().with_gclk0_div(0).check();
    }

    #[test]
    #[should_panic(expected = "XOSC gain")]
    fn rejects_low_gain() {
        let xosc = XoscConfig {
            gain: XoscGain::Mhz8,
            ..XoscConfig::CRYSTAL_16MHZ
        };
        ConfigBuilder::guarded().with_xosc(xosc).check();
    }

    #[test]
    #[should_panic(expected = "XOSC or XOSC32K")]
    fn rejects_gclk_reference() {
        let dpll = DpllConfig::new(5).with_reference(DpllReference::Gclk);
        ConfigBuilder::guarded().with_dpll(dpll).check();
    }

    #[test]
    #[should_panic(expected = "window must be shorter")]
    fn rejects_window_not_shorter_than_period() {
        let watchdog = WatchdogConfig {
            period: Some(WdtPeriod::Cyc512),
            window_mode: true,
            ..WatchdogConfig::new()
        };
        ConfigBuilder::guarded().with_watchdog(watchdog).check();
    }

    #[test]
    fn unguarded_ignores_watchdog_settings() {
        let watchdog = WatchdogConfig {
            sync_retries: 0,
            ..WatchdogConfig::new()
        };
        ConfigBuilder::unguarded().with_watchdog(watchdog).check();
    }
}
