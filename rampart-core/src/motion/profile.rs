//! Motion profile shadow and ramp modes

use rampart_protocol::reg;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ramp generator mode (RAMPMODE register)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RampMode {
    /// Move to XTARGET using the full motion profile
    #[default]
    Position,
    /// Run towards +VMAX using AMAX
    VelocityPositive,
    /// Run towards -VMAX using AMAX
    VelocityNegative,
    /// Keep the current velocity
    Hold,
}

impl RampMode {
    /// Value written verbatim to RAMPMODE
    pub fn register_value(self) -> i32 {
        match self {
            RampMode::Position => 0,
            RampMode::VelocityPositive => 1,
            RampMode::VelocityNegative => 2,
            RampMode::Hold => 3,
        }
    }
}

/// Host-side copy of the ramp generator profile
///
/// All values are in microsteps and the chip's internal time units. Changing
/// a field does not touch the chip; the copy and the chip are allowed to
/// differ until the profile is pushed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MotionProfile {
    /// First acceleration between VSTART and V1
    pub a1: u32,
    /// Threshold velocity between the A1/D1 and AMAX/DMAX phases
    pub v1: u32,
    /// Second acceleration between V1 and VMAX
    pub amax: u32,
    /// Target velocity (position mode: speed cap)
    pub vmax: u32,
    /// Deceleration between VMAX and V1
    pub dmax: u32,
    /// Deceleration between V1 and VSTOP
    pub d1: u32,
    /// Stop velocity, must be non-zero in position mode
    pub vstop: u32,
}

impl Default for MotionProfile {
    /// Values that get most stepper setups moving
    fn default() -> Self {
        Self {
            a1: 35_000,
            v1: 20_000,
            amax: 10_000,
            vmax: 200_000,
            dmax: 15_000,
            d1: 50_000,
            vstop: 10,
        }
    }
}

impl MotionProfile {
    /// Number of registers written by [`MotionProfile::register_writes`]
    pub const REGISTER_COUNT: usize = 7;

    /// Register writes that load this profile, in transmission order
    ///
    /// Unsigned fields are passed as their raw 32-bit pattern.
    pub fn register_writes(&self) -> [(u8, i32); Self::REGISTER_COUNT] {
        [
            (reg::A1, self.a1 as i32),
            (reg::V1, self.v1 as i32),
            (reg::AMAX, self.amax as i32),
            (reg::VMAX, self.vmax as i32),
            (reg::DMAX, self.dmax as i32),
            (reg::D1, self.d1 as i32),
            (reg::VSTOP, self.vstop as i32),
        ]
    }
}
