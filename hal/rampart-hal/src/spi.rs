//! SPI bus abstractions
//!
//! Two levels are defined here:
//!
//! - [`SpiBus`]: a raw full-duplex bus, implemented by chip-specific HALs.
//! - [`SpiTransport`]: one exchange with chip-select held for its whole
//!   duration. This is the only interface the TMC5130 driver consumes.
//!
//! [`ChipSelectTransport`] builds the second from the first plus a GPIO.

use crate::delay::{DelayUs, NoDelay};
use crate::gpio::{ChipSelectPolarity, OutputPin};

/// SPI bus master
///
/// Provides basic SPI transfer operations for communicating with
/// peripheral devices. Chip-select is not handled at this level.
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Apply clock frequency, polarity and phase
    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error>;

    /// Transfer data in place
    ///
    /// Writes data from buffer while reading into the same buffer.
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error>;
}

/// Chip-select scoped SPI transport
///
/// Every call to [`SpiTransport::scoped_transfer`] is one complete, exclusive
/// bus transaction: chip-select is asserted before the first byte and
/// released after the last, even when the transfer fails.
pub trait SpiTransport {
    /// Error type for bus faults
    type Error;

    /// One-time bring-up (pin levels, bus speed/mode)
    ///
    /// Must be called once before the first transfer.
    fn setup(&mut self) -> Result<(), Self::Error>;

    /// Exchange `buf` with the peripheral
    ///
    /// The received bytes replace the buffer contents.
    fn scoped_transfer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: SpiTransport + ?Sized> SpiTransport for &mut T {
    type Error = T::Error;

    fn setup(&mut self) -> Result<(), Self::Error> {
        (**self).setup()
    }

    fn scoped_transfer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).scoped_transfer(buf)
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
    /// Chip-select active level
    pub cs_polarity: ChipSelectPolarity,
    /// Delay after asserting and before releasing chip-select, in microseconds
    pub cs_setup_us: u32,
}

impl Default for SpiConfig {
    /// TMC5130 settings: 4 MHz, mode 3, active-low CSN
    fn default() -> Self {
        Self::new(4_000_000, Mode::Mode3)
    }
}

impl SpiConfig {
    /// Create a configuration from a frequency and SPI mode
    pub fn new(frequency: u32, mode: Mode) -> Self {
        let (polarity, phase) = mode.into();
        Self {
            frequency,
            polarity,
            phase,
            cs_polarity: ChipSelectPolarity::ActiveLow,
            cs_setup_us: 0,
        }
    }

    /// Set the chip-select setup/hold delay
    pub fn with_cs_setup_us(mut self, us: u32) -> Self {
        self.cs_setup_us = us;
        self
    }

    /// The SPI mode matching polarity and phase
    pub fn mode(&self) -> Mode {
        match (self.polarity, self.phase) {
            (Polarity::IdleLow, Phase::CaptureOnFirstTransition) => Mode::Mode0,
            (Polarity::IdleLow, Phase::CaptureOnSecondTransition) => Mode::Mode1,
            (Polarity::IdleHigh, Phase::CaptureOnFirstTransition) => Mode::Mode2,
            (Polarity::IdleHigh, Phase::CaptureOnSecondTransition) => Mode::Mode3,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl Mode {
    /// Look up a mode by its conventional number (0-3)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(Mode::Mode0),
            1 => Some(Mode::Mode1),
            2 => Some(Mode::Mode2),
            3 => Some(Mode::Mode3),
            _ => None,
        }
    }
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

/// [`SpiTransport`] built from a raw bus and a chip-select GPIO
///
/// Owns both halves, so no other peripheral can be addressed on this bus
/// while a transfer is in flight.
pub struct ChipSelectTransport<B, P, D = NoDelay> {
    bus: B,
    cs: P,
    delay: D,
    config: SpiConfig,
}

impl<B, P> ChipSelectTransport<B, P, NoDelay>
where
    B: SpiBus,
    P: OutputPin,
{
    /// Create a transport without chip-select delays
    pub fn new(bus: B, cs: P, config: SpiConfig) -> Self {
        Self::with_delay(bus, cs, NoDelay, config)
    }
}

impl<B, P, D> ChipSelectTransport<B, P, D>
where
    B: SpiBus,
    P: OutputPin,
    D: DelayUs,
{
    /// Create a transport that waits `config.cs_setup_us` around each transfer
    pub fn with_delay(bus: B, cs: P, delay: D, config: SpiConfig) -> Self {
        Self {
            bus,
            cs,
            delay,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    /// Give back the bus, pin and delay
    pub fn release(self) -> (B, P, D) {
        (self.bus, self.cs, self.delay)
    }
}

impl<B, P, D> SpiTransport for ChipSelectTransport<B, P, D>
where
    B: SpiBus,
    P: OutputPin,
    D: DelayUs,
{
    type Error = B::Error;

    fn setup(&mut self) -> Result<(), Self::Error> {
        self.config.cs_polarity.release(&mut self.cs);
        self.bus.configure(&self.config)
    }

    fn scoped_transfer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        let cs = self.config.cs_polarity;

        cs.assert(&mut self.cs);
        if self.config.cs_setup_us > 0 {
            self.delay.delay_us(self.config.cs_setup_us);
        }

        let result = self.bus.transfer_in_place(buf);

        if self.config.cs_setup_us > 0 {
            self.delay.delay_us(self.config.cs_setup_us);
        }
        cs.release(&mut self.cs);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        CsHigh,
        CsLow,
        Configure(Mode),
        Transfer(usize),
        Delay(u32),
    }

    type Log = RefCell<Vec<Event, 16>>;

    struct FakeBus<'a> {
        log: &'a Log,
        fail: bool,
    }

    impl SpiBus for FakeBus<'_> {
        type Error = ();

        fn configure(&mut self, config: &SpiConfig) -> Result<(), ()> {
            self.log
                .borrow_mut()
                .push(Event::Configure(config.mode()))
                .unwrap();
            Ok(())
        }

        fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), ()> {
            self.log
                .borrow_mut()
                .push(Event::Transfer(data.len()))
                .unwrap();
            if self.fail {
                return Err(());
            }
            // Loopback with every byte inverted
            for byte in data.iter_mut() {
                *byte = !*byte;
            }
            Ok(())
        }
    }

    struct FakePin<'a> {
        log: &'a Log,
        high: bool,
    }

    impl OutputPin for FakePin<'_> {
        fn set_high(&mut self) {
            self.high = true;
            self.log.borrow_mut().push(Event::CsHigh).unwrap();
        }

        fn set_low(&mut self) {
            self.high = false;
            self.log.borrow_mut().push(Event::CsLow).unwrap();
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct FakeDelay<'a> {
        log: &'a Log,
    }

    impl DelayUs for FakeDelay<'_> {
        fn delay_us(&mut self, us: u32) {
            self.log.borrow_mut().push(Event::Delay(us)).unwrap();
        }
    }

    #[test]
    fn test_default_config_is_tmc_mode3() {
        let config = SpiConfig::default();
        assert_eq!(config.frequency, 4_000_000);
        assert_eq!(config.mode(), Mode::Mode3);
        assert_eq!(config.polarity, Polarity::IdleHigh);
        assert_eq!(config.phase, Phase::CaptureOnSecondTransition);
        assert_eq!(config.cs_polarity, ChipSelectPolarity::ActiveLow);
    }

    #[test]
    fn test_mode_from_number() {
        assert_eq!(Mode::from_number(0), Some(Mode::Mode0));
        assert_eq!(Mode::from_number(3), Some(Mode::Mode3));
        assert_eq!(Mode::from_number(4), None);
    }

    #[test]
    fn test_setup_releases_cs_then_configures() {
        let log = Log::default();
        let bus = FakeBus { log: &log, fail: false };
        let pin = FakePin { log: &log, high: false };
        let mut transport = ChipSelectTransport::new(bus, pin, SpiConfig::default());

        transport.setup().unwrap();

        assert_eq!(
            log.borrow().as_slice(),
            &[Event::CsHigh, Event::Configure(Mode::Mode3)]
        );
    }

    #[test]
    fn test_transfer_is_scoped_by_cs() {
        let log = Log::default();
        let bus = FakeBus { log: &log, fail: false };
        let pin = FakePin { log: &log, high: true };
        let mut transport = ChipSelectTransport::new(bus, pin, SpiConfig::default());

        let mut buf = [0x00, 0xFF, 0x0F, 0xF0, 0xAA];
        transport.scoped_transfer(&mut buf).unwrap();

        assert_eq!(buf, [0xFF, 0x00, 0xF0, 0x0F, 0x55]);
        assert_eq!(
            log.borrow().as_slice(),
            &[Event::CsLow, Event::Transfer(5), Event::CsHigh]
        );
    }

    #[test]
    fn test_cs_released_on_bus_error() {
        let log = Log::default();
        let bus = FakeBus { log: &log, fail: true };
        let pin = FakePin { log: &log, high: true };
        let mut transport = ChipSelectTransport::new(bus, pin, SpiConfig::default());

        let mut buf = [0u8; 5];
        assert_eq!(transport.scoped_transfer(&mut buf), Err(()));

        let (_, pin, _) = transport.release();
        assert!(pin.is_set_high());
        assert_eq!(log.borrow().last(), Some(&Event::CsHigh));
    }

    #[test]
    fn test_cs_setup_delay_wraps_transfer() {
        let log = Log::default();
        let bus = FakeBus { log: &log, fail: false };
        let pin = FakePin { log: &log, high: true };
        let delay = FakeDelay { log: &log };
        let config = SpiConfig::default().with_cs_setup_us(2);
        let mut transport = ChipSelectTransport::with_delay(bus, pin, delay, config);

        let mut buf = [0u8; 5];
        transport.scoped_transfer(&mut buf).unwrap();

        assert_eq!(
            log.borrow().as_slice(),
            &[
                Event::CsLow,
                Event::Delay(2),
                Event::Transfer(5),
                Event::Delay(2),
                Event::CsHigh
            ]
        );
    }
}
