//! Inter-task communication channels
//!
//! The motion task owns the driver; everything else talks to it through
//! these statics.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use rampart_core::motion::RampMode;

/// Channel capacity for motion commands
const MOTION_CHANNEL_SIZE: usize = 4;

/// Command for the motion task
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum MotionCommand {
    /// Switch the ramp generator mode
    SetRampMode(RampMode),
    /// Change VMAX
    SetVelocity(u32),
    /// Move to an absolute position and wait for standstill
    MoveTo(i32),
    /// Move relative to the actual position and wait for standstill
    Jog(i32),
}

/// Motion commands, executed in order
pub static MOTION_CMD: Channel<CriticalSectionRawMutex, MotionCommand, MOTION_CHANNEL_SIZE> =
    Channel::new();

/// Completion of the last motion command
/// Value is the position after the command, or None for a bus fault
pub static MOTION_DONE: Signal<CriticalSectionRawMutex, Option<i32>> = Signal::new();
