//! RP2040-specific HAL for the Rampart TMC5130 driver
//!
//! This crate provides RP2040 implementations of the shared
//! `rampart-hal` traits:
//!
//! - [`spi::Rp2040SpiBus`] - blocking SPI peripheral (implements `rampart_hal::SpiBus`)
//! - [`gpio::ChipSelectPin`] - GPIO output (implements `rampart_hal::OutputPin`)
//! - [`delay::BlockingDelay`] - busy-wait on the embassy time driver
//!
//! [`Rp2040Transport`] ties them together into the `SpiTransport` the
//! driver consumes.

#![no_std]

pub mod delay;
pub mod gpio;
pub mod spi;

// Re-export shared traits from rampart-hal for convenience
pub use rampart_hal::{ChipSelectTransport, SpiConfig, SpiTransport};

/// Chip-select scoped transport on RP2040 peripherals
pub type Rp2040Transport<'d, T> =
    ChipSelectTransport<spi::Rp2040SpiBus<'d, T>, gpio::ChipSelectPin<'d>, delay::BlockingDelay>;
