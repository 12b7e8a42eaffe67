//! Blocking SPI bus
//!
//! Wraps an `embassy_rp::spi::Spi` in blocking mode. Transfers are short
//! (5 bytes per TMC5130 datagram) so DMA is not worth the setup cost.

use embassy_rp::spi::{self, Blocking, Instance, Spi};
use rampart_hal::spi::{Phase, Polarity};
use rampart_hal::{SpiBus, SpiConfig};

/// RP2040 SPI peripheral in blocking mode
pub struct Rp2040SpiBus<'d, T: Instance> {
    spi: Spi<'d, T, Blocking>,
}

impl<'d, T: Instance> Rp2040SpiBus<'d, T> {
    /// Wrap an already constructed blocking SPI peripheral
    pub fn new(spi: Spi<'d, T, Blocking>) -> Self {
        Self { spi }
    }

    /// Build the embassy configuration matching `config`
    pub fn embassy_config(config: &SpiConfig) -> spi::Config {
        let mut cfg = spi::Config::default();
        cfg.frequency = config.frequency;
        cfg.polarity = match config.polarity {
            Polarity::IdleLow => spi::Polarity::IdleLow,
            Polarity::IdleHigh => spi::Polarity::IdleHigh,
        };
        cfg.phase = match config.phase {
            Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
            Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
        };
        cfg
    }
}

impl<T: Instance> SpiBus for Rp2040SpiBus<'_, T> {
    type Error = spi::Error;

    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        self.spi.set_config(&Self::embassy_config(config));
        Ok(())
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.blocking_transfer_in_place(data)
    }
}
