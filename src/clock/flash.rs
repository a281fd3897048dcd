//! Flash read timing.

use crate::pac::NvmctrlView;

use super::FrequencyClass;

/// Set the NVM read wait states for `class`. Must precede any frequency increase.
pub fn configure_wait_states<H: NvmctrlView + ?Sized>(hw: &mut H, class: FrequencyClass) {
    let rws = class.wait_states();
    trace!("flash: RWS = {:?}", rws);
    hw.set_read_wait_states(rws);
}
