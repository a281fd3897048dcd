//! Busy-polling on hardware status flags.
//!
//! Every wait during bring-up goes through [`await_condition`]. The default
//! [`WaitPolicy`] never gives up, which is what the hardware sequence needs: a
//! flag that never asserts is a hang, and only the watchdog can end it. A
//! bounded policy turns the hang into a [`Timeout`] so the sequence can be
//! driven against a software register model.

/// Hardware condition a wait is blocked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Condition {
    /// `OSC48MSYNCBUSY.OSC48MDIV` cleared.
    Osc48mDivSynced,
    /// `STATUS.OSC48MRDY` set.
    Osc48mReady,
    /// `STATUS.XOSCRDY` set.
    XoscReady,
    /// `DPLLSYNCBUSY.ENABLE` cleared.
    DpllEnableSynced,
    /// `DPLLSTATUS.LOCK` set.
    DpllLocked,
    /// `DPLLSTATUS.CLKRDY` set.
    DpllClockReady,
    /// `WDT.SYNCBUSY.ENABLE` cleared.
    WdtEnableSynced,
    /// `GCLK.SYNCBUSY.GENCTRLn` cleared.
    GeneratorSynced(u8),
}

/// A bounded wait ran out of polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout {
    pub condition: Condition,
    pub polls: u32,
}

/// How long a wait may poll before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaitPolicy {
    /// `None` polls forever.
    pub max_polls: Option<u32>,
}

impl WaitPolicy {
    pub const UNBOUNDED: Self = Self { max_polls: None };

    /// Give up after `polls` reads of the flag. At least one read is always made.
    pub const fn bounded(polls: u32) -> Self {
        Self {
            max_polls: Some(polls),
        }
    }
}

/// Poll `ready` until it returns `true`.
///
/// Returns the number of polls it took, including the successful one.
pub fn await_condition<F>(condition: Condition, policy: WaitPolicy, mut ready: F) -> Result<u32, Timeout>
where
    F: FnMut() -> bool,
{
    let mut polls: u32 = 0;
    loop {
        polls = polls.saturating_add(1);
        if ready() {
            return Ok(polls);
        }
        if let Some(max) = policy.max_polls {
            if polls >= max {
                return Err(Timeout { condition, polls });
            }
        }
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_poll_count_once_ready() {
        let mut left = 3;
        let polls = await_condition(Condition::XoscReady, WaitPolicy::UNBOUNDED, || {
            left -= 1;
            left == 0
        });
        assert_eq!(polls, Ok(3));
    }

    #[test]
    fn bounded_wait_times_out() {
        let mut reads = 0;
        let result = await_condition(Condition::DpllLocked, WaitPolicy::bounded(5), || {
            reads += 1;
            false
        });
        assert_eq!(
            result,
            Err(Timeout {
                condition: Condition::DpllLocked,
                polls: 5
            })
        );
        assert_eq!(reads, 5);
    }

    #[test]
    fn zero_bound_still_reads_once() {
        let mut reads = 0;
        let result = await_condition(Condition::Osc48mReady, WaitPolicy::bounded(0), || {
            reads += 1;
            true
        });
        assert_eq!(result, Ok(1));
        assert_eq!(reads, 1);
    }
}
