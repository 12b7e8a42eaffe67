//! Build script for rampart-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rampart_core::config::{
    parse_machine_config, DriverConfig, JogCycle, MachineConfig, SpiSettings,
};
use rampart_core::current::CurrentLimitSpec;
use rampart_core::motion::MotionProfile;
use serde::Deserialize;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// `[driver]` section of machine.toml
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DriverSection {
    stealth_chop: bool,
    reverse_direction: bool,
}

impl Default for DriverSection {
    fn default() -> Self {
        let defaults = DriverConfig::default();
        Self {
            stealth_chop: defaults.stealth_chop,
            reverse_direction: defaults.reverse_direction,
        }
    }
}

/// Layout of machine.toml as a whole
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MachineFile {
    spi: SpiSettings,
    motion: MotionProfile,
    current: Option<CurrentLimitSpec>,
    driver: DriverSection,
    cycle: JogCycle,
}

impl MachineFile {
    fn into_config(self) -> MachineConfig {
        MachineConfig {
            driver: DriverConfig {
                spi: self.spi,
                motion: self.motion,
                current: self.current,
                stealth_chop: self.driver.stealth_chop,
                reverse_direction: self.driver.reverse_direction,
            },
            cycle: self.cycle,
        }
    }
}

/// Validate machine.toml configuration at compile time
///
/// The file is checked twice: by the `toml` crate for syntax and schema, and
/// by the firmware's own line parser, which must arrive at the same result.
fn validate_config() {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");
    if !config_path.exists() {
        fail("machine.toml not found", &["Create one in the rampart-firmware directory."]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read machine.toml", &[&e.to_string()]),
    };

    let file: MachineFile = match toml::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid machine.toml", &lines)
        }
    };
    let config = file.into_config();

    if let Err(e) = config.validate() {
        fail("Invalid value in machine.toml", &[&format!("{:?}", e)]);
    }

    match parse_machine_config(&content) {
        Ok(parsed) if parsed == config => {}
        Ok(_) => fail(
            "machine.toml is read differently on the device",
            &["Avoid TOML features beyond key = value pairs in [section] tables."],
        ),
        Err(e) => fail(
            "machine.toml is rejected by the firmware parser",
            &[&format!("{:?}", e)],
        ),
    }

    println!("cargo:warning=machine.toml validated successfully");
}

/// Abort the build with a boxed diagnostic
fn fail(title: &str, lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<58} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
