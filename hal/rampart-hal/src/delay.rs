//! Blocking delay abstraction
//!
//! Used for chip-select setup/hold timing around a transfer.

/// Busy-wait delay in microseconds
pub trait DelayUs {
    /// Block for at least `us` microseconds
    fn delay_us(&mut self, us: u32);
}

/// Delay that returns immediately
///
/// Suitable when the bus clock is slow enough that the chip's select-to-clock
/// setup time is met by the HAL's own call overhead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayUs for NoDelay {
    fn delay_us(&mut self, _us: u32) {}
}
