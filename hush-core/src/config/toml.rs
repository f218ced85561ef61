//! Simple TOML parser for node configuration
//!
//! This is a minimal parser that handles only the subset used by
//! `node.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs with integer or boolean values
//! - `_` digit separators in integers
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown keys are ignored so older firmware accepts newer files.
//! Unknown sections are rejected.

use super::types::NodeConfig;

/// What went wrong while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Malformed section header
    InvalidSection,
    /// Section name not recognised
    UnknownSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

/// Parse error with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Link,
    Schedule,
    Controller,
}

/// Parse TOML configuration into a `NodeConfig`
pub fn parse_config(input: &str) -> Result<NodeConfig, ParseError> {
    let mut config = NodeConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let at = |kind| ParseError {
            line: index + 1,
            kind,
        };
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(at(ParseErrorKind::InvalidSection));
            }
            section = parse_section_header(&line[1..line.len() - 1]).map_err(at)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(at(ParseErrorKind::InvalidLine))?;
        apply_value(section, key, value, &mut config).map_err(at)?;
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section_header(header: &str) -> Result<Section, ParseErrorKind> {
    match header.trim() {
        "" => Err(ParseErrorKind::InvalidSection),
        "bus" => Ok(Section::Bus),
        "link" => Ok(Section::Link),
        "schedule" => Ok(Section::Schedule),
        "controller" => Ok(Section::Controller),
        _ => Err(ParseErrorKind::UnknownSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an unsigned integer, allowing `_` separators
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ParseErrorKind> {
    let mut acc: u64 = 0;
    let mut digits = 0;

    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10).ok_or(ParseErrorKind::InvalidValue)?;
        acc = acc
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(ParseErrorKind::InvalidValue)?;
        digits += 1;
    }

    if digits == 0 {
        return Err(ParseErrorKind::InvalidValue);
    }
    T::try_from(acc).map_err(|_| ParseErrorKind::InvalidValue)
}

/// Parse an integer that must not be zero
fn parse_nonzero<T: TryFrom<u64> + PartialEq + Default>(value: &str) -> Result<T, ParseErrorKind> {
    let parsed: T = parse_int(value)?;
    if parsed == T::default() {
        return Err(ParseErrorKind::InvalidValue);
    }
    Ok(parsed)
}

fn parse_bool(value: &str) -> Result<bool, ParseErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut NodeConfig,
) -> Result<(), ParseErrorKind> {
    match section {
        Section::Root => {}
        Section::Bus => {
            if key == "baudrate" {
                config.bus.baudrate = parse_nonzero(value)?;
            }
        }
        Section::Link => {
            let link = &mut config.link;
            match key {
                "byte_timeout_ms" => link.byte_timeout_ms = parse_nonzero(value)?,
                "ping_total_ms" => link.ping_total_ms = parse_nonzero(value)?,
                "ping_retry_ms" => link.ping_retry_ms = parse_nonzero(value)?,
                "heartbeat_window_ms" => link.heartbeat_window_ms = parse_nonzero(value)?,
                "crying_window_ms" => link.crying_window_ms = parse_nonzero(value)?,
                _ => {}
            }
        }
        Section::Schedule => {
            let schedule = &mut config.schedule;
            match key {
                "poll_interval_ms" => schedule.poll_interval_ms = parse_nonzero(value)?,
                "heartbeat_delay_ms" => schedule.heartbeat_delay_ms = parse_nonzero(value)?,
                "crying_delay_ms" => schedule.crying_delay_ms = parse_nonzero(value)?,
                "convergence_delay_ms" => schedule.convergence_delay_ms = parse_nonzero(value)?,
                "warmup_polls" => schedule.warmup_polls = parse_int(value)?,
                "warmup_interval_ms" => schedule.warmup_interval_ms = parse_int(value)?,
                "crying_feedback" => schedule.crying_feedback = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Controller => {
            let tuning = &mut config.controller;
            match key {
                "panic_jump_bpm" => tuning.panic_jump_bpm = parse_nonzero(value)?,
                "improve_bpm" => tuning.improve_bpm = parse_nonzero(value)?,
                "improve_cry" => tuning.improve_cry = parse_int(value)?,
                "stable_bpm" => tuning.stable_bpm = parse_int(value)?,
                "crying_bpm_ceiling" => tuning.crying_bpm_ceiling = parse_int(value)?,
                "crying_band_low" => tuning.crying_band_low = parse_int(value)?,
                "crying_band_high" => tuning.crying_band_high = parse_int(value)?,
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(NodeConfig::default()));
    }

    #[test]
    fn test_parse_all_sections() {
        let input = r#"
# Decision node
[bus]
baudrate = 57_600

[link]
byte_timeout_ms = 25   # slower bus
heartbeat_window_ms = 250

[schedule]
heartbeat_delay_ms = 10_000
crying_feedback = true
warmup_polls = 0

[controller]
panic_jump_bpm = 40
stable_bpm = 2
"#;
        let config = parse_config(input).unwrap();

        assert_eq!(config.bus.baudrate, 57_600);
        assert_eq!(config.link.byte_timeout_ms, 25);
        assert_eq!(config.link.heartbeat_window_ms, 250);
        assert_eq!(config.link.ping_total_ms, 1500);
        assert_eq!(config.schedule.heartbeat_delay_ms, 10_000);
        assert!(config.schedule.crying_feedback);
        assert_eq!(config.schedule.warmup_polls, 0);
        assert_eq!(config.controller.panic_jump_bpm, 40);
        assert_eq!(config.controller.stable_bpm, 2);
        assert_eq!(config.controller.improve_bpm, 10);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_config("[link]\nretries = 3\n").unwrap();
        assert_eq!(config, NodeConfig::default());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = parse_config("[bus]\nbaudrate = 9600\n[display]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 3,
                kind: ParseErrorKind::UnknownSection
            }
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse_config("[link]\nbyte_timeout_ms = 0\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_non_integer_rejected() {
        let err = parse_config("[schedule]\npoll_interval_ms = \"fast\"\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = parse_config("[controller]\nimprove_bpm = 300\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            parse_config("[bus\n").unwrap_err().kind,
            ParseErrorKind::InvalidSection
        );
        assert_eq!(
            parse_config("[bus]\nbaudrate\n").unwrap_err().kind,
            ParseErrorKind::InvalidLine
        );
    }
}
