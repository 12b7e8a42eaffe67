//! GPIO pin abstractions
//!
//! The driver only needs digital outputs: one chip-select line per TMC5130.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn set_high(&mut self) {
        (**self).set_high();
    }

    fn set_low(&mut self) {
        (**self).set_low();
    }

    fn is_set_high(&self) -> bool {
        (**self).is_set_high()
    }
}

/// Electrical level that selects the peripheral
///
/// The TMC5130 CSN input is active-low; the other polarity exists for boards
/// that route chip-select through an inverting level shifter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelectPolarity {
    /// Pulling the line low selects the chip
    #[default]
    ActiveLow,
    /// Driving the line high selects the chip
    ActiveHigh,
}

impl ChipSelectPolarity {
    /// Drive `pin` to the selecting level
    pub fn assert<P: OutputPin + ?Sized>(self, pin: &mut P) {
        pin.set_state(self == ChipSelectPolarity::ActiveHigh);
    }

    /// Drive `pin` to the idle level
    pub fn release<P: OutputPin + ?Sized>(self, pin: &mut P) {
        pin.set_state(self == ChipSelectPolarity::ActiveLow);
    }

    /// Whether `pin` currently selects the chip
    pub fn is_asserted<P: OutputPin + ?Sized>(self, pin: &P) -> bool {
        pin.is_set_high() == (self == ChipSelectPolarity::ActiveHigh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pin(bool);

    impl OutputPin for Pin {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }

        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_active_low_select() {
        let mut pin = Pin(true);
        let cs = ChipSelectPolarity::ActiveLow;

        cs.assert(&mut pin);
        assert!(pin.is_set_low());
        assert!(cs.is_asserted(&pin));

        cs.release(&mut pin);
        assert!(pin.is_set_high());
        assert!(!cs.is_asserted(&pin));
    }

    #[test]
    fn test_active_high_select() {
        let mut pin = Pin(false);
        let cs = ChipSelectPolarity::ActiveHigh;

        cs.assert(&mut pin);
        assert!(pin.is_set_high());
        assert!(cs.is_asserted(&pin));

        cs.release(&mut pin);
        assert!(pin.is_set_low());
    }
}
