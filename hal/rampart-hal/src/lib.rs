//! Rampart Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the TMC5130 driver is
//! written against. Chip-specific HALs (RP2040, ...) implement the bus and
//! pin traits; the driver only ever sees a [`spi::SpiTransport`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  rampart-drivers (register transactions)│
//! └─────────────────────────────────────────┘
//!                     │  SpiTransport
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rampart-hal (this crate - traits)      │
//! │  ChipSelectTransport = SpiBus + CS pin  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ rampart-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (chip-select)
//! - [`delay::DelayUs`] - Blocking microsecond delay
//! - [`spi::SpiBus`] - Raw SPI bus operations
//! - [`spi::SpiTransport`] - Chip-select scoped transfers

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use delay::{DelayUs, NoDelay};
pub use gpio::{ChipSelectPolarity, OutputPin};
pub use spi::{ChipSelectTransport, SpiBus, SpiConfig, SpiTransport};
