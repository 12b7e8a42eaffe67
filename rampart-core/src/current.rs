//! Motor current limit conversion
//!
//! The only place where physical units enter the register protocol. A
//! holding/running current in amps is turned into the 5-bit IHOLD/IRUN
//! scale codes and the matching sense-voltage range, following the
//! current-scaling equation of the TMC5130 datasheet (section 10):
//!
//! ```text
//! CS = 32 * sqrt(2) * I_rms * (R_sense + 0.02 Ohm) / V_fs - 1
//! ```

use core::f32::consts::SQRT_2;

use micromath::F32Ext;
use rampart_protocol::reg::ihold_irun::{
    CURRENT_MASK, DELAY_MASK, IHOLDDELAY_SHIFT, IHOLD_SHIFT, IRUN_SHIFT,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sense resistor fitted on the board
pub const RSENSE_OHMS: f32 = 0.15;

/// Internal resistance the datasheet adds to R_sense
const RSENSE_INTERNAL_OHMS: f32 = 0.02;

/// Currents above this use the 0.32 V range
pub const LOW_RANGE_LIMIT_A: f32 = 0.75;

/// Largest IHOLD/IRUN code
pub const MAX_CURRENT_SCALE: u8 = 31;

/// Default IHOLDDELAY
pub const DEFAULT_HOLD_DELAY: u8 = 7;

/// Full-scale sense voltage range (CHOPCONF.vsense)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SenseRange {
    /// 0.18 V full scale, finer resolution for small motors (vsense = 1)
    Low,
    /// 0.32 V full scale (vsense = 0)
    High,
}

impl SenseRange {
    /// Pick the range for a pair of currents
    ///
    /// The boundary is exclusive: exactly 0.75 A still fits the low range.
    pub fn for_currents(hold_a: f32, run_a: f32) -> Self {
        if hold_a > LOW_RANGE_LIMIT_A || run_a > LOW_RANGE_LIMIT_A {
            SenseRange::High
        } else {
            SenseRange::Low
        }
    }

    /// Full-scale voltage in volts
    pub fn full_scale_voltage(self) -> f32 {
        match self {
            SenseRange::Low => 0.18,
            SenseRange::High => 0.32,
        }
    }

    /// Value of the CHOPCONF.vsense bit selecting this range
    pub fn vsense(self) -> bool {
        self == SenseRange::Low
    }
}

/// Convert one current to its 5-bit scale code
pub fn current_scale(current_a: f32, range: SenseRange) -> u8 {
    let cs = 32.0 * SQRT_2 * current_a * (RSENSE_OHMS + RSENSE_INTERNAL_OHMS)
        / range.full_scale_voltage()
        - 1.0;
    let code = cs.abs().round();
    if code >= f32::from(MAX_CURRENT_SCALE) {
        MAX_CURRENT_SCALE
    } else {
        // NaN also lands here and saturates to 0
        code as u8
    }
}

/// Requested motor current limits
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct CurrentLimitSpec {
    /// Standstill current in amps
    pub hold_current_a: f32,
    /// Running current in amps
    pub run_current_a: f32,
    /// Delay before dropping to the hold current (0-15)
    pub hold_delay: u8,
}

impl Default for CurrentLimitSpec {
    fn default() -> Self {
        Self {
            hold_current_a: 0.4,
            run_current_a: 0.8,
            hold_delay: DEFAULT_HOLD_DELAY,
        }
    }
}

impl CurrentLimitSpec {
    /// Create a spec with the default hold delay
    pub fn new(hold_current_a: f32, run_current_a: f32) -> Self {
        Self {
            hold_current_a,
            run_current_a,
            hold_delay: DEFAULT_HOLD_DELAY,
        }
    }

    /// Compute the register settings for this spec
    pub fn settings(&self) -> CurrentSettings {
        let sense_range = SenseRange::for_currents(self.hold_current_a, self.run_current_a);
        CurrentSettings {
            sense_range,
            ihold: current_scale(self.hold_current_a, sense_range),
            irun: current_scale(self.run_current_a, sense_range),
            hold_delay: self.hold_delay & DELAY_MASK as u8,
        }
    }
}

/// Register-level current settings derived from a [`CurrentLimitSpec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentSettings {
    /// Selected full-scale range
    pub sense_range: SenseRange,
    /// IHOLD code (0-31)
    pub ihold: u8,
    /// IRUN code (0-31)
    pub irun: u8,
    /// IHOLDDELAY (0-15)
    pub hold_delay: u8,
}

impl CurrentSettings {
    /// Packed IHOLD_IRUN register word
    pub fn ihold_irun(&self) -> i32 {
        let word = ((u32::from(self.hold_delay) & DELAY_MASK) << IHOLDDELAY_SHIFT)
            | ((u32::from(self.irun) & CURRENT_MASK) << IRUN_SHIFT)
            | ((u32::from(self.ihold) & CURRENT_MASK) << IHOLD_SHIFT);
        word as i32
    }
}
