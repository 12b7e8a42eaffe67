//! Board-agnostic core logic for the TMC5130 driver
//!
//! This crate contains everything that can be computed without touching
//! the bus:
//!
//! - Motion profile shadow and ramp modes
//! - Physical-unit current limit conversion
//! - Single-bit read-modify-write arithmetic
//! - Driver configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bits;
pub mod config;
pub mod current;
pub mod motion;
