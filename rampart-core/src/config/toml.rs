//! Minimal `machine.toml` reader
//!
//! Handles only the subset the firmware configuration uses. It does NOT
//! support the full TOML spec.
//!
//! Supported:
//! - `[section]` headers: `spi`, `motion`, `current`, `driver`, `cycle`
//! - `key = value` with integers (`_` separators allowed), floats, booleans
//! - Comments (`# ...`), including trailing ones
//!
//! Keys missing from the file keep their defaults. A `[current]` header
//! enables current limits, starting from [`CurrentLimitSpec::default`].

use core::str::FromStr;

use super::types::{ConfigError, MachineConfig};
use crate::current::CurrentLimitSpec;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section (or outside any section)
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Parsed fine but failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(err: ConfigError) -> Self {
        ParseError::Invalid(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Spi,
    Motion,
    Current,
    Driver,
    Cycle,
}

/// Parse and validate a machine configuration
pub fn parse_machine_config(input: &str) -> Result<MachineConfig, ParseError> {
    let mut config = MachineConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = strip_comment(header)
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            if section == Section::Current && config.driver.current.is_none() {
                config.driver.current = Some(CurrentLimitSpec::default());
            }
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(&mut config, section, key, value)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "spi" => Ok(Section::Spi),
        "motion" => Ok(Section::Motion),
        "current" => Ok(Section::Current),
        "driver" => Ok(Section::Driver),
        "cycle" => Ok(Section::Cycle),
        _ => Err(ParseError::InvalidSection),
    }
}

fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(pos) => text[..pos].trim(),
        None => text.trim(),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value);
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_value(
    config: &mut MachineConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    let driver = &mut config.driver;
    match (section, key) {
        (Section::Spi, "frequency_hz") => driver.spi.frequency_hz = parse_int(value)?,
        (Section::Spi, "mode") => driver.spi.mode = parse_int(value)?,
        (Section::Spi, "cs_setup_us") => driver.spi.cs_setup_us = parse_int(value)?,

        (Section::Motion, "a1") => driver.motion.a1 = parse_int(value)?,
        (Section::Motion, "v1") => driver.motion.v1 = parse_int(value)?,
        (Section::Motion, "amax") => driver.motion.amax = parse_int(value)?,
        (Section::Motion, "vmax") => driver.motion.vmax = parse_int(value)?,
        (Section::Motion, "dmax") => driver.motion.dmax = parse_int(value)?,
        (Section::Motion, "d1") => driver.motion.d1 = parse_int(value)?,
        (Section::Motion, "vstop") => driver.motion.vstop = parse_int(value)?,

        (Section::Current, _) => {
            let current = driver.current.get_or_insert_with(CurrentLimitSpec::default);
            match key {
                "hold_current_a" => current.hold_current_a = parse_float(value)?,
                "run_current_a" => current.run_current_a = parse_float(value)?,
                "hold_delay" => current.hold_delay = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }

        (Section::Driver, "stealth_chop") => driver.stealth_chop = parse_bool(value)?,
        (Section::Driver, "reverse_direction") => driver.reverse_direction = parse_bool(value)?,

        (Section::Cycle, "steps") => config.cycle.steps = parse_int(value)?,
        (Section::Cycle, "velocity") => config.cycle.velocity = parse_int(value)?,
        (Section::Cycle, "dwell_ms") => config.cycle.dwell_ms = parse_int(value)?,
        (Section::Cycle, "repeat") => config.cycle.repeat = parse_int(value)?,

        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

/// Parse an integer, accepting TOML `_` digit separators
fn parse_int<T: TryFrom<i64>>(value: &str) -> Result<T, ParseError> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(ParseError::InvalidValue);
    }

    let mut acc: i64 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(10).ok_or(ParseError::InvalidValue)?;
        acc = acc
            .checked_mul(10)
            .and_then(|acc| acc.checked_add(i64::from(digit)))
            .ok_or(ParseError::InvalidValue)?;
    }
    let acc = if negative { -acc } else { acc };
    T::try_from(acc).map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    f32::from_str(value).map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
