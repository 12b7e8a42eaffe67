//! Test transports
//!
//! [`ScriptedTransport`] replays canned replies and records what was sent.
//! [`SimulatedChip`] models the TMC5130 register file including the
//! one-datagram reply delay.

use heapless::Vec;
use rampart_hal::SpiTransport;
use rampart_protocol::{Datagram, ADDRESS_MASK, DATAGRAM_LEN, WRITE_BIT};

/// Bus fault injected by the test transports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// Transport answering with a fixed list of replies
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    pub replies: Vec<Datagram, 8>,
    pub sent: Vec<Datagram, 8>,
    pub fail_at: Option<usize>,
    pub setup_calls: usize,
}

impl ScriptedTransport {
    pub fn new(replies: &[Datagram]) -> Self {
        let mut transport = Self::default();
        transport.replies.extend_from_slice(replies).unwrap();
        transport
    }

    pub fn failing_at(mut self, transfer: usize) -> Self {
        self.fail_at = Some(transfer);
        self
    }
}

impl SpiTransport for ScriptedTransport {
    type Error = BusFault;

    fn setup(&mut self) -> Result<(), BusFault> {
        self.setup_calls += 1;
        Ok(())
    }

    fn scoped_transfer(&mut self, buf: &mut [u8]) -> Result<(), BusFault> {
        let index = self.sent.len();
        let mut frame = [0u8; DATAGRAM_LEN];
        frame.copy_from_slice(buf);
        self.sent.push(frame).unwrap();

        if self.fail_at == Some(index) {
            return Err(BusFault);
        }
        let reply = self.replies.get(index).copied().unwrap_or_default();
        buf.copy_from_slice(&reply);
        Ok(())
    }
}

/// Register file with TMC5130 reply pipelining
///
/// Each transfer returns the reply prepared by the previous one, then
/// processes the incoming datagram and prepares the next reply.
#[derive(Debug)]
pub struct SimulatedChip {
    pub registers: [i32; 128],
    pub status: u8,
    pub writes: Vec<(u8, i32), 32>,
    pub transfers: usize,
    pub fail_at: Option<usize>,
    pub setup_calls: usize,
    pending: Datagram,
}

impl Default for SimulatedChip {
    fn default() -> Self {
        Self {
            registers: [0; 128],
            status: 0,
            writes: Vec::new(),
            transfers: 0,
            fail_at: None,
            setup_calls: 0,
            pending: [0; DATAGRAM_LEN],
        }
    }
}

impl SimulatedChip {
    pub fn register(&self, addr: u8) -> i32 {
        self.registers[usize::from(addr)]
    }

    pub fn set_register(&mut self, addr: u8, value: i32) {
        self.registers[usize::from(addr)] = value;
    }
}

impl SpiTransport for SimulatedChip {
    type Error = BusFault;

    fn setup(&mut self) -> Result<(), BusFault> {
        self.setup_calls += 1;
        Ok(())
    }

    fn scoped_transfer(&mut self, buf: &mut [u8]) -> Result<(), BusFault> {
        let index = self.transfers;
        self.transfers += 1;
        if self.fail_at == Some(index) {
            return Err(BusFault);
        }

        let addr = buf[0] & ADDRESS_MASK;
        if buf[0] & WRITE_BIT != 0 {
            let value = i32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]);
            self.registers[usize::from(addr)] = value;
            self.writes.push((addr, value)).unwrap();
        }

        let data = self.registers[usize::from(addr)].to_be_bytes();
        let next = [self.status, data[0], data[1], data[2], data[3]];
        buf.copy_from_slice(&self.pending);
        self.pending = next;
        Ok(())
    }
}
