//! Chip-select output pin

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;
use rampart_hal::gpio::ChipSelectPolarity;
use rampart_hal::OutputPin;

/// GPIO driving a TMC5130 CSN input
pub struct ChipSelectPin<'d> {
    pin: Output<'d>,
}

impl<'d> ChipSelectPin<'d> {
    /// Create a chip-select output, starting at the idle level
    pub fn new<P: Pin>(pin: Peri<'d, P>, polarity: ChipSelectPolarity) -> Self {
        let idle = match polarity {
            ChipSelectPolarity::ActiveLow => Level::High,
            ChipSelectPolarity::ActiveHigh => Level::Low,
        };
        Self {
            pin: Output::new(pin, idle),
        }
    }
}

impl OutputPin for ChipSelectPin<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
