//! Configuration type definitions

use crate::current::CurrentLimitSpec;
use crate::motion::MotionProfile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest SPI clock the TMC5130 accepts with its internal oscillator
pub const MAX_SPI_FREQUENCY_HZ: u32 = 4_000_000;

/// SPI link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SpiSettings {
    /// Clock frequency in Hz
    pub frequency_hz: u32,
    /// SPI mode number (0-3); the TMC5130 uses mode 3
    pub mode: u8,
    /// Chip-select setup/hold delay in microseconds
    pub cs_setup_us: u32,
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self {
            frequency_hz: MAX_SPI_FREQUENCY_HZ,
            mode: 3,
            cs_setup_us: 1,
        }
    }
}

/// Complete driver bring-up configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// SPI link
    pub spi: SpiSettings,
    /// Initial motion profile shadow
    pub motion: MotionProfile,
    /// Current limits; `None` leaves IHOLD_IRUN at its reset value
    pub current: Option<CurrentLimitSpec>,
    /// Enable stealthChop (GCONF.en_pwm_mode)
    pub stealth_chop: bool,
    /// Invert motor direction (GCONF.shaft)
    pub reverse_direction: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            spi: SpiSettings::default(),
            motion: MotionProfile::default(),
            current: None,
            stealth_chop: true,
            reverse_direction: false,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SPI mode is not 0-3
    InvalidSpiMode,
    /// SPI clock is zero or above the chip's limit
    InvalidSpiFrequency,
    /// Hold delay does not fit in 4 bits
    InvalidHoldDelay,
    /// Current is negative or not a number
    InvalidCurrent,
    /// VSTOP of zero never lets a position move finish
    ZeroStopVelocity,
    /// Jog cycle with no distance or no speed
    InvalidJogCycle,
}

impl DriverConfig {
    /// Check the configuration for values the chip cannot represent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spi.mode > 3 {
            return Err(ConfigError::InvalidSpiMode);
        }
        if self.spi.frequency_hz == 0 || self.spi.frequency_hz > MAX_SPI_FREQUENCY_HZ {
            return Err(ConfigError::InvalidSpiFrequency);
        }
        if let Some(current) = &self.current {
            if current.hold_delay > 15 {
                return Err(ConfigError::InvalidHoldDelay);
            }
            // `!(x >= 0.0)` also rejects NaN
            if !(current.hold_current_a >= 0.0) || !(current.run_current_a >= 0.0) {
                return Err(ConfigError::InvalidCurrent);
            }
        }
        if self.motion.vstop == 0 {
            return Err(ConfigError::ZeroStopVelocity);
        }
        Ok(())
    }
}

/// Back-and-forth jog run by the firmware after bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct JogCycle {
    /// Microsteps per jog, the sign picks the first direction
    pub steps: i32,
    /// VMAX used for the jogs
    pub velocity: u32,
    /// Pause at each end in milliseconds
    pub dwell_ms: u32,
    /// Number of out-and-back runs, 0 repeats forever
    pub repeat: u16,
}

impl Default for JogCycle {
    fn default() -> Self {
        Self {
            steps: 51_200,
            velocity: 100_000,
            dwell_ms: 500,
            repeat: 0,
        }
    }
}

/// Everything the firmware reads from `machine.toml`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineConfig {
    pub driver: DriverConfig,
    pub cycle: JogCycle,
}

impl MachineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.driver.validate()?;
        if self.cycle.steps == 0 || self.cycle.velocity == 0 {
            return Err(ConfigError::InvalidJogCycle);
        }
        Ok(())
    }
}
