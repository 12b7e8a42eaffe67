//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod jog_cycle;
pub mod motion;

pub use jog_cycle::jog_cycle_task;
pub use motion::motion_task;
