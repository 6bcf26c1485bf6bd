//! Configuration loading and typed config structures for the Acequia simulation.
//!
//! The canonical configuration lives in `acequia-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//!
//! Decimal fields are written as quoted strings (`"0.05"`) so that no value
//! passes through a binary float on its way in.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Environment variable overriding `simulation.max_hours`.
pub const MAX_HOURS_ENV: &str = "ACEQUIA_MAX_HOURS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `acequia-config.yaml`. Every field has a
/// default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Allocation heuristic parameters.
    #[serde(default)]
    pub allocator: AllocatorConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Host hydrology parameters.
    #[serde(default)]
    pub hydrology: HydrologyConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load the run configuration: the file at `path` if it exists,
    /// defaults otherwise, then environment overrides on top.
    ///
    /// `ACEQUIA_MAX_HOURS` overrides `simulation.max_hours` when set to a
    /// valid integer, whether or not the file exists.
    ///
    /// # Errors
    ///
    /// Returns any error from [`SimulationConfig::from_file`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Same as [`SimulationConfig::load`], reading overrides through `env`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`SimulationConfig::from_file`].
    pub fn load_with_env<F>(path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.simulation.apply_env_overrides(env);
        Ok(config)
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects an empty document, an empty file means defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.allocator.validate()?;
        self.hydrology.validate()
    }
}

/// Parameters of the greedy allocation heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AllocatorConfig {
    /// Fraction of a donor's capacity that is never given away.
    #[serde(default = "default_safety_margin")]
    pub safety_margin: Decimal,

    /// Maximum quantity moved through one canal in one tick.
    #[serde(default = "default_per_tick_cap")]
    pub per_tick_cap: Decimal,

    /// Fixed urgency bonus for recipients in drought.
    #[serde(default = "default_drought_bonus")]
    pub drought_bonus: Decimal,

    /// Weight applied to a recipient's free headroom (`capacity - level`).
    #[serde(default = "default_headroom_weight")]
    pub headroom_weight: Decimal,
}

impl AllocatorConfig {
    /// Check that every parameter is within range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `safety_margin` is outside
    /// `[0, 1]`, `per_tick_cap` is not positive, or a weight is negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.safety_margin < Decimal::ZERO || self.safety_margin > Decimal::ONE {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "allocator.safety_margin must be within [0, 1], got {}",
                    self.safety_margin
                ),
            });
        }
        if self.per_tick_cap <= Decimal::ZERO {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "allocator.per_tick_cap must be positive, got {}",
                    self.per_tick_cap
                ),
            });
        }
        if self.drought_bonus < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                reason: "allocator.drought_bonus must not be negative".to_owned(),
            });
        }
        if self.headroom_weight < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                reason: "allocator.headroom_weight must not be negative".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            safety_margin: default_safety_margin(),
            per_tick_cap: default_per_tick_cap(),
            drought_bonus: default_drought_bonus(),
            headroom_weight: default_headroom_weight(),
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Step budget: the loop stops once the hour counter reaches this value.
    #[serde(default = "default_max_hours")]
    pub max_hours: u64,
}

impl SimulationBoundsConfig {
    /// Apply the `ACEQUIA_MAX_HOURS` override, ignoring unparsable values.
    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hours) = env(MAX_HOURS_ENV).and_then(|raw| raw.trim().parse::<u64>().ok()) {
            self.max_hours = hours;
        }
    }
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_hours: default_max_hours(),
        }
    }
}

/// Host hydrology parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HydrologyConfig {
    /// A region is in drought while `level < drought_ratio * need`.
    #[serde(default = "default_drought_ratio")]
    pub drought_ratio: Decimal,
}

impl HydrologyConfig {
    /// Check that the drought ratio is within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the ratio is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drought_ratio < Decimal::ZERO || self.drought_ratio > Decimal::ONE {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "hydrology.drought_ratio must be within [0, 1], got {}",
                    self.drought_ratio
                ),
            });
        }
        Ok(())
    }
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self {
            drought_ratio: default_drought_ratio(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_safety_margin() -> Decimal {
    Decimal::new(5, 2) // 0.05
}

const fn default_per_tick_cap() -> Decimal {
    Decimal::ONE
}

fn default_drought_bonus() -> Decimal {
    Decimal::new(20, 0)
}

fn default_headroom_weight() -> Decimal {
    Decimal::new(1, 1) // 0.1
}

const fn default_max_hours() -> u64 {
    100
}

fn default_drought_ratio() -> Decimal {
    Decimal::new(5, 1) // 0.5
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_matches_reference_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.allocator.safety_margin, dec!(0.05));
        assert_eq!(config.allocator.per_tick_cap, dec!(1.0));
        assert_eq!(config.allocator.drought_bonus, dec!(20));
        assert_eq!(config.allocator.headroom_weight, dec!(0.1));
        assert_eq!(config.simulation.max_hours, 100);
        assert_eq!(config.hydrology.drought_ratio, dec!(0.5));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
allocator:
  safety_margin: "0.10"
  per_tick_cap: "2.5"
  drought_bonus: "15"
  headroom_weight: "0.2"

simulation:
  max_hours: 48

hydrology:
  drought_ratio: "0.25"

logging:
  level: "debug"
"#;

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "parse failed: {config:?}");
        let config = config.unwrap();

        assert_eq!(config.allocator.safety_margin, dec!(0.10));
        assert_eq!(config.allocator.per_tick_cap, dec!(2.5));
        assert_eq!(config.allocator.drought_bonus, dec!(15));
        assert_eq!(config.allocator.headroom_weight, dec!(0.2));
        assert_eq!(config.simulation.max_hours, 48);
        assert_eq!(config.hydrology.drought_ratio, dec!(0.25));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "simulation:\n  max_hours: 7\n";
        let config = SimulationConfig::parse(yaml).unwrap();

        assert_eq!(config.simulation.max_hours, 7);
        // Everything else uses defaults
        assert_eq!(config.allocator, AllocatorConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse("");
        assert_eq!(config.ok(), Some(SimulationConfig::default()));
    }

    #[test]
    fn rejects_safety_margin_above_one() {
        let yaml = "allocator:\n  safety_margin: \"1.5\"\n";
        let config = SimulationConfig::parse(yaml);
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_zero_per_tick_cap() {
        let yaml = "allocator:\n  per_tick_cap: \"0\"\n";
        let config = SimulationConfig::parse(yaml);
        assert!(matches!(config, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let config = SimulationConfig::parse("allocator: [unclosed");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    fn project_config_path() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("acequia-config.yaml")
    }

    fn env_with(hours: &'static str) -> impl Fn(&str) -> Option<String> {
        move |name: &str| (name == MAX_HOURS_ENV).then(|| hours.to_owned())
    }

    #[test]
    fn missing_file_still_honours_max_hours_override() {
        let path = Path::new("no-such-dir/acequia-config.yaml");
        let config = SimulationConfig::load_with_env(path, env_with("7")).unwrap();
        assert_eq!(config.simulation.max_hours, 7);
        assert_eq!(config.allocator, AllocatorConfig::default());
    }

    #[test]
    fn missing_file_without_override_is_default() {
        let path = Path::new("no-such-dir/acequia-config.yaml");
        let config = SimulationConfig::load_with_env(path, |_| None).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn override_wins_over_file_value() {
        let config = SimulationConfig::load_with_env(&project_config_path(), env_with("12"));
        assert_eq!(config.unwrap().simulation.max_hours, 12);
    }

    #[test]
    fn unparsable_override_is_ignored() {
        let path = Path::new("no-such-dir/acequia-config.yaml");
        let config = SimulationConfig::load_with_env(path, env_with("soon")).unwrap();
        assert_eq!(config.simulation.max_hours, 100);
    }

    #[test]
    fn load_project_config_file() {
        let path = project_config_path();
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
