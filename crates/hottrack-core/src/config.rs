//! Configuration for the hot-tracking engine.
//!
//! `HotTrackConfig` is cloned into the root at `enable()` time and re-read
//! by value on each aging tick so that threshold/interval changes take
//! effect without restarting the engine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Power-of-two shift constants used by the temperature calculus.
///
/// Defaults match the GLOSSARY table: multiplier/divisor powers of 20/30/40
/// for the read side and write side respectively, coefficient powers of
/// 0/1/0 weighting raw frequency, recency, and burstiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureCoefficients {
    pub nr_read_mult_power: u32,
    pub nr_write_mult_power: u32,
    pub last_read_div_power: u32,
    pub last_write_div_power: u32,
    pub avg_read_div_power: u32,
    pub avg_write_div_power: u32,
    pub nr_read_coeff_power: u32,
    pub nr_write_coeff_power: u32,
    pub last_read_coeff_power: u32,
    pub last_write_coeff_power: u32,
    pub avg_read_coeff_power: u32,
    pub avg_write_coeff_power: u32,
}

impl Default for TemperatureCoefficients {
    fn default() -> Self {
        Self {
            nr_read_mult_power: 20,
            nr_write_mult_power: 20,
            last_read_div_power: 30,
            last_write_div_power: 30,
            avg_read_div_power: 40,
            avg_write_div_power: 40,
            nr_read_coeff_power: 0,
            nr_write_coeff_power: 0,
            last_read_coeff_power: 1,
            last_write_coeff_power: 1,
            avg_read_coeff_power: 0,
            avg_write_coeff_power: 0,
        }
    }
}

/// Top-level configuration for the hot-tracking engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotTrackConfig {
    /// High-watermark in MiB for the tracked size account; 0 disables
    /// memory-pressure eviction entirely.
    pub hot_mem_high_thresh_mb: u32,
    /// Interval between aging-worker sweeps, in seconds.
    pub hot_update_interval_secs: u64,
    /// `log2` of the fixed range width used to bucket sub-file accesses.
    pub range_bits: u32,
    /// `log2` of the number of heat-map buckets per kind.
    pub map_bits: u32,
    /// `log2` of the EMA decay factor applied on every access.
    pub freq_power: u32,
    pub temperature: TemperatureCoefficients,
}

impl Default for HotTrackConfig {
    fn default() -> Self {
        Self {
            hot_mem_high_thresh_mb: 0,
            hot_update_interval_secs: 150,
            range_bits: 20,
            map_bits: 8,
            freq_power: 4,
            temperature: TemperatureCoefficients::default(),
        }
    }
}

impl HotTrackConfig {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HotTrackConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`HotTrackConfig::default`] on
    /// any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    pub fn hot_update_interval(&self) -> Duration {
        Duration::from_secs(self.hot_update_interval_secs)
    }

    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.range_bits == 0 || self.range_bits > 40 {
            errors.push(ValidationError {
                field: "range_bits".into(),
                message: "must be in range 1..=40".into(),
            });
        }
        if self.map_bits == 0 || self.map_bits > 24 {
            errors.push(ValidationError {
                field: "map_bits".into(),
                message: "must be in range 1..=24".into(),
            });
        }
        if self.hot_update_interval_secs == 0 {
            errors.push(ValidationError {
                field: "hot_update_interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.freq_power > 32 {
            errors.push(ValidationError {
                field: "freq_power".into(),
                message: "must be in range 0..=32".into(),
            });
        }

        errors
    }
}

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"range_bits"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_has_glossary_values() {
        let cfg = HotTrackConfig::default();
        assert_eq!(cfg.hot_mem_high_thresh_mb, 0);
        assert_eq!(cfg.hot_update_interval_secs, 150);
        assert_eq!(cfg.range_bits, 20);
        assert_eq!(cfg.map_bits, 8);
        assert_eq!(cfg.freq_power, 4);
        assert_eq!(cfg.temperature.last_read_coeff_power, 1);
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(HotTrackConfig::default().validate().is_empty());
    }

    #[test]
    fn validate_catches_zero_range_bits() {
        let mut cfg = HotTrackConfig::default();
        cfg.range_bits = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "range_bits"));
    }

    #[test]
    fn validate_catches_oversized_map_bits() {
        let mut cfg = HotTrackConfig::default();
        cfg.map_bits = 25;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "map_bits"));
    }

    #[test]
    fn validate_catches_zero_interval() {
        let mut cfg = HotTrackConfig::default();
        cfg.hot_update_interval_secs = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "hot_update_interval_secs"));
    }

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
hot_mem_high_thresh_mb: 512
hot_update_interval_secs: 60
range_bits: 16
map_bits: 6
freq_power: 3
temperature:
  nr_read_mult_power: 20
  nr_write_mult_power: 20
  last_read_div_power: 30
  last_write_div_power: 30
  avg_read_div_power: 40
  avg_write_div_power: 40
  nr_read_coeff_power: 0
  nr_write_coeff_power: 0
  last_read_coeff_power: 1
  last_write_coeff_power: 1
  avg_read_coeff_power: 0
  avg_write_coeff_power: 0
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = HotTrackConfig::load(tmp.path()).expect("load config");
        assert_eq!(cfg.hot_mem_high_thresh_mb, 512);
        assert_eq!(cfg.range_bits, 16);
        assert_eq!(cfg.map_bits, 6);
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = HotTrackConfig::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg, HotTrackConfig::default());
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();
        assert!(HotTrackConfig::load(tmp.path()).is_err());
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "range_bits".into(),
            message: "must be in range 1..=40".into(),
        };
        assert_eq!(err.to_string(), "range_bits: must be in range 1..=40");
    }
}
