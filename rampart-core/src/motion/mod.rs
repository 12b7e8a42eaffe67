//! Ramp generator motion types
//!
//! The TMC5130 plans and executes every move itself; the host only selects
//! a ramp mode and loads the six-point motion profile.

pub mod profile;

pub use profile::{MotionProfile, RampMode};
