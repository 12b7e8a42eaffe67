//! Jog cycle task
//!
//! Drives the motion task through out-and-back jogs as configured in the
//! `[cycle]` section of machine.toml.

use defmt::*;
use embassy_time::{Duration, Timer};

use rampart_core::config::JogCycle;
use rampart_core::motion::RampMode;

use crate::channels::{MotionCommand, MOTION_CMD, MOTION_DONE};

/// Jog cycle task
///
/// Stops at the first bus fault reported by the motion task.
#[embassy_executor::task]
pub async fn jog_cycle_task(cycle: JogCycle) {
    info!(
        "Jog cycle: {} steps at {}, dwell {} ms, repeat {}",
        cycle.steps, cycle.velocity, cycle.dwell_ms, cycle.repeat
    );

    if run(MotionCommand::SetRampMode(RampMode::Position)).await.is_none()
        || run(MotionCommand::SetVelocity(cycle.velocity)).await.is_none()
    {
        error!("Jog cycle setup failed");
        return;
    }

    let dwell = Duration::from_millis(u64::from(cycle.dwell_ms));
    let mut runs: u32 = 0;
    loop {
        for steps in [cycle.steps, cycle.steps.wrapping_neg()] {
            if run(MotionCommand::Jog(steps)).await.is_none() {
                error!("Jog cycle aborted after {} runs", runs);
                return;
            }
            Timer::after(dwell).await;
        }

        runs += 1;
        debug!("Jog run {} complete", runs);
        if cycle.repeat != 0 && runs >= u32::from(cycle.repeat) {
            info!("Jog cycle finished after {} runs", runs);
            return;
        }
    }
}

/// Send a command and wait for the motion task to finish it
async fn run(cmd: MotionCommand) -> Option<i32> {
    MOTION_DONE.reset();
    MOTION_CMD.send(cmd).await;
    MOTION_DONE.wait().await
}
