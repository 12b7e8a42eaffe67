//! TMC5130 register transactions
//!
//! # Pipelined reads
//!
//! The TMC5130 answers every datagram with the result of the datagram sent
//! *before* it on the same chip-select line. A register read therefore costs
//! two complete transfers of the same read request:
//!
//! 1. arm: the request is latched; whatever comes back belongs to an earlier,
//!    unrelated exchange and is discarded
//! 2. fetch: the request is repeated; the reply carries SPI_STATUS and the
//!    register contents as of the arm transfer
//!
//! Both transfers are separate chip-select scopes. Nothing else may reach the
//! chip between them, which `&mut self` guarantees for a single bus owner.
//! Callers sharing one chip across tasks must hold their own lock over whole
//! operations.

use rampart_core::bits;
use rampart_hal::SpiTransport;
use rampart_protocol::{decode_reply, encode_read, encode_write, DatagramError, SpiStatus};

/// TMC5130 communication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tmc5130Error<E> {
    /// Bus fault reported by the transport
    Transport(E),
    /// Request could not be encoded
    Datagram(DatagramError),
}

impl<E> From<DatagramError> for Tmc5130Error<E> {
    fn from(err: DatagramError) -> Self {
        Self::Datagram(err)
    }
}

/// Result of a register transaction over transport `T`
pub type Tmc5130Result<R, T> =
    core::result::Result<R, Tmc5130Error<<T as SpiTransport>::Error>>;

/// Register-level access to one TMC5130
pub struct RegisterBus<T> {
    transport: T,
    last_status: Option<SpiStatus>,
}

impl<T: SpiTransport> RegisterBus<T> {
    /// Wrap a transport; no bus traffic happens until [`RegisterBus::setup`]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_status: None,
        }
    }

    /// Run the transport's one-time bring-up
    pub fn setup(&mut self) -> Tmc5130Result<(), T> {
        self.transport.setup().map_err(Tmc5130Error::Transport)
    }

    /// Write a raw 32-bit word to a register
    ///
    /// # Errors
    ///
    /// Returns an error if the address is outside 0x00-0x7F or the transport
    /// fails.
    pub fn write_register(&mut self, addr: u8, value: i32) -> Tmc5130Result<(), T> {
        let mut datagram = encode_write(addr, value)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("tmc5130 write {=u8:#x} <- {=i32:#x}", addr, value);
        self.transport
            .scoped_transfer(&mut datagram)
            .map_err(Tmc5130Error::Transport)
    }

    /// Read a register, returning SPI_STATUS and the raw 32-bit word
    ///
    /// Performs the arm/fetch transfer pair. If either transfer fails the
    /// whole read fails and no value is produced.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is outside 0x00-0x7F or the transport
    /// fails during either phase.
    pub fn read_register(&mut self, addr: u8) -> Tmc5130Result<(SpiStatus, i32), T> {
        let request = encode_read(addr)?;

        let mut arm = request;
        self.transport
            .scoped_transfer(&mut arm)
            .map_err(Tmc5130Error::Transport)?;

        let mut fetch = request;
        self.transport
            .scoped_transfer(&mut fetch)
            .map_err(Tmc5130Error::Transport)?;

        let reply = decode_reply(&fetch);
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "tmc5130 read {=u8:#x} -> {=i32:#x} (status {=u8:#x})",
            addr,
            reply.value,
            reply.status.raw
        );
        self.last_status = Some(reply.status);
        Ok((reply.status, reply.value))
    }

    /// Force one bit of a register, preserving all others
    ///
    /// Read-modify-write over two separate transactions: a concurrent writer
    /// to the same register between the read and the write is overwritten.
    /// Returns the word written.
    pub fn modify_bit(&mut self, addr: u8, offset: u8, flag: bool) -> Tmc5130Result<i32, T> {
        let (_, current) = self.read_register(addr)?;
        let updated = bits::with_bit(current, offset, flag);
        self.write_register(addr, updated)?;
        Ok(updated)
    }

    /// Status byte of the most recent successful read
    pub fn last_status(&self) -> Option<SpiStatus> {
        self.last_status
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.transport
    }
}
