use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".upliftxp";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid max_write_attempts: {0}. Must be at least 1")]
    InvalidMaxWriteAttempts(u32),

    #[error("Invalid leaderboard_limit: {0}. Must be at least 1")]
    InvalidLeaderboardLimit(u32),

    #[error("Invalid temperature: {0}. Must be between 0 and 2")]
    InvalidTemperature(f32),

    #[error("Invalid poll_interval_ms: {0}. Must be positive")]
    InvalidPollInterval(u64),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the project in the current directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .upliftxp/config.yaml (created by init)
    /// 3. .upliftxp/local.yaml (optional overrides)
    /// 4. Environment variables (UPLIFTXP_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Same as [`ConfigLoader::load`] rooted at `root`.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let dir = root.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed("UPLIFTXP_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Write the default configuration to `<root>/.upliftxp/config.yaml`.
    pub fn write_default(root: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = root.as_ref().join(CONFIG_DIR);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join("config.yaml");
        let yaml = serde_yaml::to_string(&Config::default())
            .context("Failed to serialize default configuration")?;
        std::fs::write(&path, yaml)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(0));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        if config.progression.max_write_attempts == 0 {
            return Err(ConfigError::InvalidMaxWriteAttempts(0));
        }
        if config.progression.leaderboard_limit == 0 {
            return Err(ConfigError::InvalidLeaderboardLimit(0));
        }

        if !(0.0..=2.0).contains(&config.llm.temperature) {
            return Err(ConfigError::InvalidTemperature(config.llm.temperature));
        }
        if config.llm.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "llm.base_url cannot be empty".to_string(),
            ));
        }

        if config.steps.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval(0));
        }
        if !config.steps.distance_goal_m.is_finite() || config.steps.distance_goal_m < 0.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "steps.distance_goal_m must be a non-negative number, got {}",
                config.steps.distance_goal_m
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.database.path, ".upliftxp/upliftxp.db");
        assert!(!config.progression.reset_streak_on_miss);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/path.db
logging:
  level: debug
progression:
  reset_streak_on_miss: true
  leaderboard_limit: 10
steps:
  distance_goal_m: 500.0
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");
        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.progression.reset_streak_on_miss);
        assert_eq!(config.progression.leaderboard_limit, 10);
        assert_eq!(config.progression.max_write_attempts, 5);
        assert!((config.steps.distance_goal_m - 500.0).abs() < f64::EPSILON);
        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogRotation(_))
        ));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));
    }

    #[test]
    fn test_validate_zero_limits() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));

        let mut config = Config::default();
        config.progression.max_write_attempts = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxWriteAttempts(0))
        ));

        let mut config = Config::default();
        config.progression.leaderboard_limit = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLeaderboardLimit(0))
        ));

        let mut config = Config::default();
        config.steps.poll_interval_ms = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPollInterval(0))
        ));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.llm.temperature = 2.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature(_))
        ));
        config.llm.temperature = 0.0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "llm:\n  model: small-model\n  max_tokens: 64").unwrap();
        file.flush().unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.llm.model, "small-model");
        assert_eq!(config.llm.max_tokens, 64);
        assert_eq!(config.llm.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "logging:\n  format: xml").unwrap();
        file.flush().unwrap();
        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_hierarchical_merging_with_env() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.yaml"),
            "logging:\n  level: info\n  format: json\nprogression:\n  leaderboard_limit: 50\n",
        )
        .unwrap();
        std::fs::write(config_dir.join("local.yaml"), "logging:\n  level: debug\n").unwrap();

        temp_env::with_vars(
            [
                ("UPLIFTXP_PROGRESSION__LEADERBOARD_LIMIT", Some("7")),
                ("UPLIFTXP_LLM__MODEL", Some("env-model")),
            ],
            || {
                let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
                assert_eq!(config.logging.level, "debug", "local.yaml overrides config.yaml");
                assert_eq!(config.logging.format, "json", "config.yaml value persists");
                assert_eq!(config.progression.leaderboard_limit, 7, "env wins");
                assert_eq!(config.llm.model, "env-model");
            },
        );
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        temp_env::with_var_unset("UPLIFTXP_LOGGING__LEVEL", || {
            let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
            assert_eq!(config.logging.level, "warn");
        });
    }

    #[test]
    fn test_write_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = ConfigLoader::write_default(dir.path()).unwrap();
        assert!(path.ends_with("config.yaml"));
        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.steps.poll_interval_ms, 1000);
    }
}
