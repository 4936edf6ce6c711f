/// Decoder configuration and skip-condition shorthand
///
/// The decode core only ever sees resolved `SkipCondition` values. User-facing
/// shorthand is turned into conditions here, through `FromStr`:
///
///   trade        reveal bit 7 set (record carries a trade)
///   no-trade     exclude records carrying a trade
///   trade-only   reveal bit 0 set
///   trial        status bit 7 set (trial disclosure)
///   no-trial     exclude trial disclosure records
///
/// or the raw form `MODE:POSITION:VALUE:MASK`, e.g. `include:22:0x80:0x80`.
/// Numbers accept decimal, `0x` hex and `0b` binary.

use crate::filter::{FilterMode, SkipCondition};
use crate::protocol::{REVEAL_FLAGS, STATUS_FLAGS};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown skip preset '{0}'")]
    UnknownPreset(String),

    #[error("malformed skip condition '{input}': expected MODE:POSITION:VALUE:MASK")]
    Malformed { input: String },

    #[error("unknown filter mode '{0}' (expected include or exclude)")]
    InvalidMode(String),

    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct DecoderConfig {
    pub skip_conditions: Vec<SkipCondition>,
    pub chunk_size: usize,
    pub max_buffer_size: Option<usize>,
    pub strict_bcd: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderConfig {
    pub const DEFAULT_CHUNK_SIZE: usize = 1024;

    pub fn new() -> Self {
        Self {
            skip_conditions: Vec::new(),
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            max_buffer_size: None,
            strict_bcd: false,
        }
    }

    pub fn with_skip_condition(mut self, condition: SkipCondition) -> Self {
        self.skip_conditions.push(condition);
        self
    }

    pub fn with_skip_conditions<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = SkipCondition>,
    {
        self.skip_conditions.extend(conditions);
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn with_max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = Some(size);
        self
    }

    /// Reject records holding nibbles 10-15 in packed BCD fields
    pub fn with_strict_bcd(mut self, strict: bool) -> Self {
        self.strict_bcd = strict;
        self
    }
}

impl FromStr for FilterMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "include" | "inc" | "+" => Ok(FilterMode::Include),
            "exclude" | "exc" | "-" => Ok(FilterMode::Exclude),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl FromStr for SkipCondition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.contains(':') {
            return preset(s);
        }

        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let [mode, position, value, mask] = parts.as_slice() else {
            return Err(ConfigError::Malformed {
                input: s.to_string(),
            });
        };

        let position = parse_number(position, "position")?;
        let value = parse_number(value, "value")?;
        let mask = parse_number(mask, "mask")?;

        Ok(SkipCondition {
            position: position as usize,
            value: to_byte(value, "value")?,
            mask: to_byte(mask, "mask")?,
            mode: mode.parse()?,
        })
    }
}

fn preset(name: &str) -> Result<SkipCondition, ConfigError> {
    let cond = match name.to_ascii_lowercase().as_str() {
        "trade" => SkipCondition::include(REVEAL_FLAGS, 0x80, 0x80),
        "no-trade" => SkipCondition::exclude(REVEAL_FLAGS, 0x80, 0x80),
        "trade-only" => SkipCondition::include(REVEAL_FLAGS, 0x01, 0x01),
        "trial" => SkipCondition::include(STATUS_FLAGS, 0x80, 0x80),
        "no-trial" => SkipCondition::exclude(STATUS_FLAGS, 0x80, 0x80),
        _ => return Err(ConfigError::UnknownPreset(name.to_string())),
    };
    Ok(cond)
}

fn parse_number(s: &str, field: &'static str) -> Result<u64, ConfigError> {
    let s = s.replace('_', "");
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    parsed.map_err(|_| ConfigError::InvalidNumber {
        field,
        value: s.clone(),
    })
}

fn to_byte(n: u64, field: &'static str) -> Result<u8, ConfigError> {
    u8::try_from(n).map_err(|_| ConfigError::InvalidNumber {
        field,
        value: n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert!(config.skip_conditions.is_empty());
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.max_buffer_size, None);
        assert!(!config.strict_bcd);
    }

    #[test]
    fn test_builder() {
        let config = DecoderConfig::new()
            .with_chunk_size(0)
            .with_max_buffer_size(4096)
            .with_strict_bcd(true)
            .with_skip_condition(SkipCondition::include(22, 0x80, 0x80));
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.max_buffer_size, Some(4096));
        assert!(config.strict_bcd);
        assert_eq!(config.skip_conditions.len(), 1);
    }

    #[test]
    fn test_presets() {
        let cond: SkipCondition = "trade".parse().unwrap();
        assert_eq!(cond, SkipCondition::include(22, 0x80, 0x80));
        let cond: SkipCondition = "No-Trial".parse().unwrap();
        assert_eq!(cond, SkipCondition::exclude(24, 0x80, 0x80));
        assert_eq!(
            "bogus".parse::<SkipCondition>(),
            Err(ConfigError::UnknownPreset("bogus".into()))
        );
    }

    #[test]
    fn test_raw_form() {
        let cond: SkipCondition = "include:22:0x80:0b1000_0000".parse().unwrap();
        assert_eq!(cond, SkipCondition::include(22, 0x80, 0x80));
        let cond: SkipCondition = "exclude:24:128:255".parse().unwrap();
        assert_eq!(cond, SkipCondition::exclude(24, 0x80, 0xFF));
    }

    #[test]
    fn test_raw_form_errors() {
        assert!(matches!(
            "include:22:0x80".parse::<SkipCondition>(),
            Err(ConfigError::Malformed { .. })
        ));
        assert!(matches!(
            "maybe:22:0x80:0x80".parse::<SkipCondition>(),
            Err(ConfigError::InvalidMode(_))
        ));
        assert!(matches!(
            "include:22:0x100:0xFF".parse::<SkipCondition>(),
            Err(ConfigError::InvalidNumber { field: "value", .. })
        ));
        assert!(matches!(
            "include:x:1:1".parse::<SkipCondition>(),
            Err(ConfigError::InvalidNumber { field: "position", .. })
        ));
    }
}
