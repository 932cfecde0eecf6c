//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid. Carries the parsed values when only
    /// validation failed, so setup can start from them.
    Invalid(ConfigError, Option<AppConfig>),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// HR backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Session persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the `token`, `user` and `employee` keys.
    /// Unset means `session/` under the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    /// How often to look for session changes made by another window.
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,
}

fn default_watch_interval_secs() -> u64 {
    2
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Number of recent leave requests shown on the overview.
    #[serde(default = "default_recent_requests")]
    pub recent_requests: u32,
}

fn default_recent_requests() -> u32 {
    5
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e, Some(config)),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e), None),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e), None),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation("Server URL cannot be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "Server URL must start with http:// or https://".to_string(),
            ));
        }
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.session.watch_interval_secs < 1 {
            return Err(ConfigError::Validation(
                "Session watch interval must be at least 1 second".to_string(),
            ));
        }
        if !(1..=100).contains(&self.ui.recent_requests) {
            return Err(ConfigError::Validation(
                "Recent requests must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform data directory; log files live under `logs/`.
    pub fn data_dir(&self) -> PathBuf {
        directories::ProjectDirs::from("com", "Gianged", "gianged-hrm")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".gianged-hrm"))
    }

    /// Directory holding the session keys.
    pub fn session_dir(&self) -> PathBuf {
        match &self.session.storage_dir {
            Some(dir) => dir.clone(),
            None => self.data_dir().join("session"),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            watch_interval_secs: default_watch_interval_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            recent_requests: default_recent_requests(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_scheme() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://hr.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.api.timeout_secs = Some(30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_recent_requests_bounds() {
        let mut config = AppConfig::default();

        config.ui.recent_requests = 0;
        assert!(config.validate().is_err());

        config.ui.recent_requests = 101;
        assert!(config.validate().is_err());

        config.ui.recent_requests = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_file_fills_defaults() {
        let config: AppConfig = toml::from_str("[api]\nbase_url = \"https://hr.example.com/api\"\n").unwrap();
        assert_eq!(config.session.watch_interval_secs, 2);
        assert_eq!(config.ui.recent_requests, 5);
        assert!(config.api.timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.api.base_url = "https://hr.example.com/api".to_string();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded.api.base_url, "https://hr.example.com/api"),
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppConfig::try_load(&dir.path().join("nope.toml")),
            ConfigLoadResult::Missing
        ));
    }

    #[test]
    fn test_invalid_values_keep_parsed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"hr.example.com\"\ntimeout_secs = 30\n").unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Invalid(ConfigError::Validation(_), Some(parsed)) => {
                assert_eq!(parsed.api.base_url, "hr.example.com");
                assert_eq!(parsed.api.timeout_secs, Some(30));
            }
            other => panic!("unexpected load result: {other:?}"),
        }

        std::fs::write(&path, "not toml [").unwrap();
        assert!(matches!(
            AppConfig::try_load(&path),
            ConfigLoadResult::Invalid(ConfigError::Parse(_), None)
        ));
    }

    #[test]
    fn test_storage_dir_override() {
        let mut config = AppConfig::default();
        config.session.storage_dir = Some(PathBuf::from("/tmp/hrm-session"));
        assert_eq!(config.session_dir(), PathBuf::from("/tmp/hrm-session"));
        assert_eq!(config.data_dir(), AppConfig::default().data_dir());
    }

    #[test]
    fn test_default_session_dir_is_under_data_dir() {
        let config = AppConfig::default();
        assert_eq!(config.session_dir(), config.data_dir().join("session"));
    }
}
