//! TOML-based application configuration.
//!
//! Stores replan policy, week-view fetch limits, and the model backend
//! selection. Configuration is stored at `~/.config/weekplan/config.toml`;
//! a missing or unreadable file yields defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Replan policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplanConfig {
    /// Minimum seconds between replan runs (unconditional).
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Days of lookahead for capacity analysis.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
    /// Whether the periodic re-optimization loop runs at all.
    #[serde(default = "default_true")]
    pub auto_replan: bool,
    /// Whether event edits may trigger a replan on refresh.
    #[serde(default = "default_true")]
    pub replan_on_event_change: bool,
    /// Seconds between periodic ticks.
    #[serde(default = "default_periodic_interval_secs")]
    pub periodic_interval_secs: u64,
}

impl Default for ReplanConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            lookahead_days: default_lookahead_days(),
            auto_replan: true,
            replan_on_event_change: true,
            periodic_interval_secs: default_periodic_interval_secs(),
        }
    }
}

/// Week-view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekConfig {
    /// Maximum events fetched per week window.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for WeekConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

/// Model backend selection for the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// "rule" for the built-in heuristics, "local" for a local model.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Model name when `backend = "local"`.
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Fall back to a smaller model if the named one fails to load.
    #[serde(default = "default_true")]
    pub auto_fallback: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            name: default_model_name(),
            auto_fallback: true,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/weekplan/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub replan: ReplanConfig,
    #[serde(default)]
    pub week: WeekConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl Config {
    /// Default on-disk location.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weekplan")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load() -> Self {
        Self::load_from(&Self::path()).unwrap_or_default()
    }

    /// Load from a specific path.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save to the default location, creating parent directories.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    /// Save to a specific path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Look up a config value by dotted key, e.g. `replan.cooldown_secs`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "replan.cooldown_secs" => Some(self.replan.cooldown_secs.to_string()),
            "replan.lookahead_days" => Some(self.replan.lookahead_days.to_string()),
            "replan.auto_replan" => Some(self.replan.auto_replan.to_string()),
            "replan.replan_on_event_change" => Some(self.replan.replan_on_event_change.to_string()),
            "replan.periodic_interval_secs" => Some(self.replan.periodic_interval_secs.to_string()),
            "week.max_results" => Some(self.week.max_results.to_string()),
            "model.backend" => Some(self.model.backend.clone()),
            "model.name" => Some(self.model.name.clone()),
            "model.auto_fallback" => Some(self.model.auto_fallback.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dotted key and persist it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "replan.cooldown_secs" => {
                self.replan.cooldown_secs = value.parse().map_err(|_| invalid("expected a non-negative integer".into()))?;
            }
            "replan.lookahead_days" => {
                self.replan.lookahead_days = value.parse().map_err(|_| invalid("expected a non-negative integer".into()))?;
            }
            "replan.auto_replan" => {
                self.replan.auto_replan = value.parse().map_err(|_| invalid("expected true or false".into()))?;
            }
            "replan.replan_on_event_change" => {
                self.replan.replan_on_event_change = value.parse().map_err(|_| invalid("expected true or false".into()))?;
            }
            "replan.periodic_interval_secs" => {
                self.replan.periodic_interval_secs = value.parse().map_err(|_| invalid("expected a non-negative integer".into()))?;
            }
            "week.max_results" => {
                self.week.max_results = value.parse().map_err(|_| invalid("expected a non-negative integer".into()))?;
            }
            "model.backend" => match value {
                "rule" | "local" => self.model.backend = value.to_string(),
                _ => return Err(invalid("expected 'rule' or 'local'".into())),
            },
            "model.name" => self.model.name = value.to_string(),
            "model.auto_fallback" => {
                self.model.auto_fallback = value.parse().map_err(|_| invalid("expected true or false".into()))?;
            }
            _ => {
                return Err(invalid("unknown key".into()));
            }
        }
        self.save()
    }

    /// Cooldown as a chrono duration for the coordinator.
    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.replan.cooldown_secs as i64)
    }

    /// Periodic tick interval for the auto-optimize loop.
    pub fn periodic_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.replan.periodic_interval_secs)
    }
}

// Default functions
fn default_cooldown_secs() -> u64 {
    5
}
fn default_lookahead_days() -> u32 {
    3
}
fn default_periodic_interval_secs() -> u64 {
    300
}
fn default_max_results() -> u32 {
    250
}
fn default_backend() -> String {
    "rule".into()
}
fn default_model_name() -> String {
    "TinyLlama/TinyLlama-1.1B-Chat-v1.0".into()
}
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.replan.cooldown_secs, 5);
        assert_eq!(config.replan.lookahead_days, 3);
        assert!(config.replan.auto_replan);
        assert_eq!(config.week.max_results, 250);
        assert_eq!(config.model.backend, "rule");
    }

    #[test]
    fn round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.replan.cooldown_secs = 12;
        config.model.backend = "local".into();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.replan.cooldown_secs, 12);
        assert_eq!(loaded.model.backend, "local");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[replan]\ncooldown_secs = 9\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.replan.cooldown_secs, 9);
        assert_eq!(loaded.replan.lookahead_days, 3);
        assert_eq!(loaded.week.max_results, 250);
    }

    #[test]
    fn get_by_dotted_key() {
        let config = Config::default();
        assert_eq!(config.get("replan.cooldown_secs").as_deref(), Some("5"));
        assert_eq!(config.get("model.backend").as_deref(), Some("rule"));
        assert!(config.get("nope.nothing").is_none());
    }

    #[test]
    fn set_rejects_bad_values_before_saving() {
        let mut config = Config::default();
        assert!(config.set("replan.cooldown_secs", "abc").is_err());
        assert!(config.set("model.backend", "cloud").is_err());
        assert!(config.set("unknown.key", "1").is_err());
        // Nothing changed.
        assert_eq!(config.replan.cooldown_secs, 5);
        assert_eq!(config.model.backend, "rule");
    }

    #[test]
    fn missing_file_is_an_error_from_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_failures_report_as_save_errors() {
        let dir = tempfile::tempdir().unwrap();
        // Parent "blocker" is a file, so the directory cannot be created.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = Config::default()
            .save_to(&blocker.join("config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::SaveFailed { .. }));
        assert!(err.to_string().contains("Failed to save"));
    }
}
