//! Datagram encoding and decoding
//!
//! Datagram format:
//! - Byte 0: register address (7 bits) with the write flag in bit 7
//! - Bytes 1-4: 32-bit register value, big-endian
//!
//! Reply format:
//! - Byte 0: SPI_STATUS flags
//! - Bytes 1-4: 32-bit register value, big-endian

use crate::status::SpiStatus;

/// Length of every datagram and reply in bytes
pub const DATAGRAM_LEN: usize = 5;

/// Address byte flag marking a write access
pub const WRITE_BIT: u8 = 0x80;

/// Valid bits of a register address
pub const ADDRESS_MASK: u8 = 0x7F;

/// One 40-bit SPI datagram
pub type Datagram = [u8; DATAGRAM_LEN];

/// Errors that can occur while encoding a datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DatagramError {
    /// Register address does not fit in 7 bits
    InvalidAddress(u8),
}

/// Decoded reply datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reply {
    /// Status flags sent ahead of the data
    pub status: SpiStatus,
    /// Register contents as a raw two's-complement word
    pub value: i32,
}

fn check_address(addr: u8) -> Result<u8, DatagramError> {
    if addr & !ADDRESS_MASK != 0 {
        return Err(DatagramError::InvalidAddress(addr));
    }
    Ok(addr)
}

/// Build a write datagram
///
/// `value` is sent as its raw 32-bit pattern; unsigned register fields are
/// passed through `as i32` without changing any bit.
pub fn encode_write(addr: u8, value: i32) -> Result<Datagram, DatagramError> {
    let addr = check_address(addr)?;
    let data = value.to_be_bytes();
    Ok([addr | WRITE_BIT, data[0], data[1], data[2], data[3]])
}

/// Build a read request datagram
///
/// The data bytes of a read request are ignored by the chip and sent as zero.
pub fn encode_read(addr: u8) -> Result<Datagram, DatagramError> {
    let addr = check_address(addr)?;
    Ok([addr, 0, 0, 0, 0])
}

/// Split a received datagram into status and value
pub fn decode_reply(reply: &Datagram) -> Reply {
    Reply {
        status: SpiStatus::from_byte(reply[0]),
        value: i32::from_be_bytes([reply[1], reply[2], reply[3], reply[4]]),
    }
}
