#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]
#![allow(unsafe_op_in_unsafe_fn)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod clock;
pub mod diag;
pub mod pac;
pub mod poll;
pub mod time;
pub mod traps;

#[cfg(test)]
mod sim;

/// HAL configuration for SAM C2x
pub mod config {
    use crate::clock;
    use crate::traps::NmiAction;

    /// HAL configuration passed when initializing.
    #[non_exhaustive]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Config {
        pub clock: clock::Config,
        /// Installed once clocks are up.
        pub nmi: NmiAction,
    }

    impl Config {
        pub const fn new(clock: clock::Config, nmi: NmiAction) -> Self {
            Self { clock, nmi }
        }
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                clock: clock::Config::default(),
                nmi: NmiAction::default(),
            }
        }
    }
}
pub use config::Config;

/// Bring the clocks up with the provided configuration.
///
/// Call first thing in `main`, before anything depends on the core clock.
/// Returns 0 on success, or a negative status if a bounded wait in
/// `config.clock` ran out.
///
/// This should only be called once at startup, otherwise it panics.
pub fn init(config: Config) -> i32 {
    // Do this first, so that it panics if user is calling `init` a second time
    // before doing anything important.
    let mut p = unwrap!(pac::Peripherals::take());
    let mut traps = traps::DefaultTraps::new(config.nmi);

    let result = critical_section::with(|cs| {
        clock::BringupSequencer::new(&mut p, &config.clock).run(cs, &mut traps)
    });

    match result {
        Ok(result) => {
            unsafe { clock::set_freqs(result.clocks) };
            result.status
        }
        Err(e) => {
            error!("clock bring-up failed: {:?}", e);
            e.status_code()
        }
    }
}
