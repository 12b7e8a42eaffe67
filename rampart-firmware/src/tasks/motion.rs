//! Motion task
//!
//! Owns the TMC5130 driver and executes [`MotionCommand`]s. Moves are
//! followed until the ramp generator reports standstill, logging the
//! position along the way.

use defmt::*;
use embassy_rp::peripherals::SPI0;
use embassy_time::{Duration, Ticker};

use rampart_drivers::stepper::{Tmc5130, Tmc5130Result};
use rampart_hal_rp2040::Rp2040Transport;

use crate::channels::{MotionCommand, MOTION_CMD, MOTION_DONE};

/// Position poll interval while a move is running
const POLL_INTERVAL_MS: u64 = 50;

pub type Transport = Rp2040Transport<'static, SPI0>;

/// Driver type owned by the motion task
pub type Driver = Tmc5130<Transport>;

/// Motion task
///
/// Waits for commands and signals [`MOTION_DONE`] after each one.
#[embassy_executor::task]
pub async fn motion_task(mut driver: Driver) {
    info!("Motion task started");

    loop {
        let cmd = MOTION_CMD.receive().await;
        debug!("Motion command: {}", cmd);

        let result = match cmd {
            MotionCommand::SetRampMode(mode) => driver.set_ramp_mode(mode),
            MotionCommand::SetVelocity(velocity) => driver.set_velocity(velocity),
            MotionCommand::MoveTo(position) => driver.move_to(position),
            MotionCommand::Jog(steps) => driver.jog(steps).map(|target| {
                debug!("Jog {} -> target {}", steps, target);
            }),
        };
        if let Err(e) = result {
            error!("Motion command {} failed: {}", cmd, e);
            MOTION_DONE.signal(None);
            continue;
        }

        let position = match cmd {
            MotionCommand::MoveTo(_) | MotionCommand::Jog(_) => {
                wait_for_standstill(&mut driver).await
            }
            _ => driver.position(),
        };
        match position {
            Ok(position) => MOTION_DONE.signal(Some(position)),
            Err(e) => {
                error!("Position read failed: {}", e);
                MOTION_DONE.signal(None);
            }
        }
    }
}

/// Poll until VACTUAL reaches zero, returning the final position
async fn wait_for_standstill(driver: &mut Driver) -> Tmc5130Result<i32, Transport> {
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        ticker.next().await;

        let position = driver.position()?;
        if let Some(status) = driver.last_status() {
            if status.has_fault() {
                warn!("Driver reports a fault: {}", status);
            }
        }
        if driver.is_stopped()? {
            info!("Standstill at {}", position);
            return driver.position();
        }
        trace!("Position: {}", position);
    }
}
