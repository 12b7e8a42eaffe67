//! Configuration types
//!
//! Board-agnostic driver configuration. The firmware fills this from its
//! embedded `machine.toml`; host tools can deserialize it with the `serde`
//! feature.

pub mod toml;
pub mod types;

pub use toml::{parse_machine_config, ParseError};
pub use types::*;
