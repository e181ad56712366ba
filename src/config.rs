//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::route::Route;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
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
    pub fetch: FetchConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to.
    pub base_url: String,
    /// Accept self-signed certificates (local development servers).
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Per-request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Data loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Parallel subprocess fetches while hydrating the process listing.
    #[serde(default = "default_hydration_concurrency")]
    pub hydration_concurrency: usize,
}

fn default_hydration_concurrency() -> usize {
    4
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Route opened at startup.
    #[serde(default = "default_start_route")]
    pub start_route: String,
    /// How long notifications stay on screen.
    #[serde(default = "default_toast_seconds")]
    pub toast_seconds: u64,
}

fn default_start_route() -> String {
    "/".to_string()
}

fn default_toast_seconds() -> u64 {
    4
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write a daily rolling log file.
    #[serde(default = "default_log_file")]
    pub file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> bool {
    true
}

impl AppConfig {
    /// Platform directories for this application.
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "Gianged", "ProcessFlow")
    }

    /// Get config file path (platform config dir, else next to the executable).
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = Self::project_dirs() {
            return dirs.config_dir().join("config.toml");
        }
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => ConfigLoadResult::Loaded(config),
                Err(e) => ConfigLoadResult::Invalid(e),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Parse and validate config text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation("API base URL cannot be empty".to_string()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if !(1..=32).contains(&self.fetch.hydration_concurrency) {
            return Err(ConfigError::Validation(
                "Hydration concurrency must be between 1 and 32".to_string(),
            ));
        }
        if self.ui.toast_seconds < 1 {
            return Err(ConfigError::Validation(
                "Notification duration must be at least 1 second".to_string(),
            ));
        }
        if let Route::NotFound(path) = Route::parse(&self.ui.start_route) {
            return Err(ConfigError::Validation(format!("Unknown start route '{path}'")));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:7115/api".to_string(),
            accept_invalid_certs: false,
            timeout_secs: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            hydration_concurrency: default_hydration_concurrency(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_route: default_start_route(),
            toast_seconds: default_toast_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
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
    fn test_minimal_toml_fills_defaults() {
        let config = AppConfig::from_toml("[api]\nbase_url = \"http://api.local/api\"\n").unwrap();
        assert_eq!(config.api.base_url, "http://api.local/api");
        assert!(!config.api.accept_invalid_certs);
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.fetch.hydration_concurrency, 4);
        assert_eq!(config.ui.start_route, "/");
        assert!(config.logging.file);
    }

    #[test]
    fn test_validation_empty_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_scheme() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_concurrency_bounds() {
        let mut config = AppConfig::default();

        config.fetch.hydration_concurrency = 0;
        assert!(config.validate().is_err());

        config.fetch.hydration_concurrency = 33;
        assert!(config.validate().is_err());

        config.fetch.hydration_concurrency = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_unknown_start_route() {
        let mut config = AppConfig::default();
        config.ui.start_route = "/reports".to_string();
        assert!(config.validate().is_err());

        config.ui.start_route = "/processes?departmentId=2".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("processflow-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.api.base_url = "http://127.0.0.1:5000/api".to_string();
        config.api.timeout_secs = Some(15);
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => {
                assert_eq!(loaded.api.base_url, "http://127.0.0.1:5000/api");
                assert_eq!(loaded.api.timeout_secs, Some(15));
            }
            other => panic!("unexpected load result: {other:?}"),
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("processflow-definitely-missing.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));
    }
}
