//! Stepper driver implementations

pub mod bus;
pub mod device;
pub mod tmc5130;

#[cfg(test)]
pub(crate) mod testing;

pub use bus::{RegisterBus, Tmc5130Error, Tmc5130Result};
pub use device::SpiDeviceTransport;
pub use tmc5130::Tmc5130;
