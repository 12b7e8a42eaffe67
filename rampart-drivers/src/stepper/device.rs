//! `embedded-hal` SPI device adapter
//!
//! Lets the driver run on any HAL that already implements
//! [`embedded_hal::spi::SpiDevice`], which manages chip select itself. One
//! `transfer_in_place` call is one transaction, so a datagram stays inside a
//! single chip-select window.

use embedded_hal::spi::SpiDevice;
use rampart_hal::SpiTransport;

/// [`SpiTransport`] over an [`SpiDevice`]
pub struct SpiDeviceTransport<D> {
    device: D,
}

impl<D: SpiDevice> SpiDeviceTransport<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Give back the device
    pub fn release(self) -> D {
        self.device
    }
}

impl<D: SpiDevice> SpiTransport for SpiDeviceTransport<D> {
    type Error = D::Error;

    /// The device is configured by its HAL, nothing to do here
    fn setup(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn scoped_transfer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.device.transfer_in_place(buf)
    }
}
