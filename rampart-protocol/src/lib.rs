//! TMC5130 SPI Protocol
//!
//! This crate defines the wire format spoken by the TMC5130 over SPI. Every
//! exchange is a fixed 40-bit datagram, MSB first:
//! ```text
//! ┌──────────────────┬─────────────────────────────┐
//! │ RW | ADDRESS     │ DATA (big-endian)           │
//! │ 1b   7b          │ 32b                         │
//! └──────────────────┴─────────────────────────────┘
//! ```
//!
//! The chip answers every datagram with one of its own: a status byte
//! followed by 32 data bits. The answer always belongs to the *previous*
//! datagram on the same chip-select line, so a register read takes two
//! exchanges. That sequencing lives in `rampart-drivers`; this crate is
//! only the encoding.

#![no_std]
#![deny(unsafe_code)]

pub mod datagram;
pub mod reg;
pub mod status;

pub use datagram::{
    decode_reply, encode_read, encode_write, Datagram, DatagramError, Reply, ADDRESS_MASK,
    DATAGRAM_LEN, WRITE_BIT,
};
pub use status::SpiStatus;
