//! Hardware driver implementations
//!
//! This crate talks to the TMC5130 over any `rampart_hal::SpiTransport`:
//!
//! - [`stepper::RegisterBus`] - 40-bit datagram writes and pipelined reads
//! - [`stepper::Tmc5130`] - motion commands, configuration bits and
//!   current limits on top of the register bus
//! - [`stepper::SpiDeviceTransport`] - transport for any
//!   `embedded_hal::spi::SpiDevice`

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod stepper;
