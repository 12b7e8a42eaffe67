//! Blocking delay on the embassy time driver

use embassy_time::{block_for, Duration};
use rampart_hal::DelayUs;

/// Busy-wait delay backed by `embassy_time::block_for`
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingDelay;

impl DelayUs for BlockingDelay {
    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(u64::from(us)));
    }
}
