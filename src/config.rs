//! UCI-configurable engine options: hash size, strength limiting, and the
//! tunable search/eval parameters exposed for SPSA-style tuning.

use crate::error::ConfigError;
use crate::eval::DEFAULT_TEMPO_BONUS;

const MIN_HASH_MB: u32 = 1;
const MAX_HASH_MB: u32 = 65536;
const MIN_ELO: u32 = 1320;
const MAX_ELO: u32 = 3190;

/// Engine configuration mutated by `setoption`; defaults match the values
/// baked into `search.rs`/`eval/` constants.
#[derive(Debug, Clone)]
pub struct Config {
    pub hash_size_mb: u32,
    pub limit_strength: bool,
    pub uci_elo: u32,
    pub rfp_margin: i32,
    pub null_move_base_reduction: i32,
    pub tempo_bonus: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hash_size_mb: 16,
            limit_strength: false,
            uci_elo: MAX_ELO,
            rfp_margin: 90,
            null_move_base_reduction: 3,
            tempo_bonus: DEFAULT_TEMPO_BONUS,
        }
    }
}

fn parse_spin(name: &str, value: &str, min: i64, max: i64) -> Result<i64, ConfigError> {
    let parsed: i64 = value.parse().map_err(|_| ConfigError::InvalidValue { name: name.to_string(), value: value.to_string() })?;
    if parsed < min || parsed > max {
        return Err(ConfigError::OutOfRange { name: name.to_string(), value: value.to_string() });
    }
    Ok(parsed)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue { name: name.to_string(), value: value.to_string() }),
    }
}

impl Config {
    /// Applies one `setoption name <name> value <value>` pair. `Clear Hash`
    /// takes no value and is handled by the caller (it resets the
    /// transposition table, which this struct doesn't own).
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "hashsizemb" | "hash" => {
                let value = value.ok_or_else(|| ConfigError::InvalidValue { name: name.to_string(), value: String::new() })?;
                self.hash_size_mb = parse_spin(name, value, i64::from(MIN_HASH_MB), i64::from(MAX_HASH_MB))? as u32;
            }
            "clear hash" => {}
            "limitstrength" => {
                let value = value.ok_or_else(|| ConfigError::InvalidValue { name: name.to_string(), value: String::new() })?;
                self.limit_strength = parse_bool(name, value)?;
            }
            "uci_elo" => {
                let value = value.ok_or_else(|| ConfigError::InvalidValue { name: name.to_string(), value: String::new() })?;
                self.uci_elo = parse_spin(name, value, i64::from(MIN_ELO), i64::from(MAX_ELO))? as u32;
            }
            "rfpmargin" => {
                let value = value.ok_or_else(|| ConfigError::InvalidValue { name: name.to_string(), value: String::new() })?;
                self.rfp_margin = parse_spin(name, value, 20, 400)? as i32;
            }
            "nullmovereduction" => {
                let value = value.ok_or_else(|| ConfigError::InvalidValue { name: name.to_string(), value: String::new() })?;
                self.null_move_base_reduction = parse_spin(name, value, 1, 5)? as i32;
            }
            "tempobonus" => {
                let value = value.ok_or_else(|| ConfigError::InvalidValue { name: name.to_string(), value: String::new() })?;
                self.tempo_bonus = parse_spin(name, value, 0, 60)? as i32;
            }
            _ => return Err(ConfigError::UnknownOption { name: name.to_string() }),
        }
        Ok(())
    }

    /// UCI `option` lines advertised in response to the `uci` command.
    #[must_use]
    pub fn uci_option_lines(&self) -> Vec<String> {
        vec![
            format!("option name HashSizeMB type spin default {} min {} max {}", self.hash_size_mb, MIN_HASH_MB, MAX_HASH_MB),
            "option name Clear Hash type button".to_string(),
            format!("option name LimitStrength type check default {}", self.limit_strength),
            format!("option name UCI_Elo type spin default {} min {} max {}", self.uci_elo, MIN_ELO, MAX_ELO),
            format!("option name RFPMargin type spin default {} min 20 max 400", self.rfp_margin),
            format!("option name NullMoveReduction type spin default {} min 1 max 5", self.null_move_base_reduction),
            format!("option name TempoBonus type spin default {} min 0 max 60", self.tempo_bonus),
        ]
    }
}

/// Splits a `setoption name <...> value <...>` command's already-tokenized
/// arguments (everything after the leading `setoption` token) into the
/// option name and optional value, grounded on the teacher's
/// whitespace-reassembly parser.
#[must_use]
pub fn parse_setoption_args(parts: &[&str]) -> Option<(String, Option<String>)> {
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for &part in parts {
        match part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() { None } else { Some(value_parts.join(" ")) };
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_value() {
        let (name, value) = parse_setoption_args(&["name", "HashSizeMB", "value", "64"]).unwrap();
        assert_eq!(name, "HashSizeMB");
        assert_eq!(value.as_deref(), Some("64"));
    }

    #[test]
    fn clear_hash_has_no_value() {
        let (name, value) = parse_setoption_args(&["name", "Clear", "Hash"]).unwrap();
        assert_eq!(name, "Clear Hash");
        assert_eq!(value, None);
    }

    #[test]
    fn sets_hash_size_within_range() {
        let mut config = Config::default();
        config.set_option("HashSizeMB", Some("64")).unwrap();
        assert_eq!(config.hash_size_mb, 64);
    }

    #[test]
    fn rejects_out_of_range_hash_size() {
        let mut config = Config::default();
        let err = config.set_option("HashSizeMB", Some("0")).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn rejects_unknown_option() {
        let mut config = Config::default();
        let err = config.set_option("NotAnOption", Some("1")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption { .. }));
    }

    #[test]
    fn rejects_non_numeric_elo() {
        let mut config = Config::default();
        let err = config.set_option("UCI_Elo", Some("strong")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
