//! Configuration infrastructure
//!
//! Configuration is a single JSON file. Every section has defaults, so a
//! partial file (or no file at all) is valid. Command-line flags are applied
//! on top of the loaded file through [`ConfigOverrides`].

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use super::http_client::HttpClientConfig;
use super::parsing::config::ParsingConfig;

const APP_DIR_NAME: &str = "storefront-harvest";
const CONFIG_FILE_NAME: &str = "config.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpClientConfig,
    pub pacing: PacingConfig,
    pub site: SiteConfig,
    pub selectors: ParsingConfig,
    pub logging: LoggingConfig,
}

/// Delay inserted between consecutive items of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub base_delay_ms: u64,
    /// Upper bound of the uniformly random extra delay
    pub max_jitter_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 2000,
            max_jitter_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin for structured endpoints; each item's own origin when unset
    pub base_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Log directory; `logs/` next to the executable when unset
    pub log_dir: Option<PathBuf>,

    /// Log file naming strategy: "unified" or "timestamped"
    pub file_naming_strategy: String,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,

    /// Module-specific log level filters (e.g., "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            file_naming_strategy: "unified".to_string(),
            max_files: 10,
            module_filters: HashMap::new(),
        }
    }
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub delay_seconds: Option<f64>,
    pub site_base: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(seconds) = self.delay_seconds {
            config.pacing.base_delay_ms = (seconds.max(0.0) * 1000.0).round() as u64;
        }
        if let Some(base) = self.site_base.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            config.site.base_url = Some(base.trim_end_matches('/').to_string());
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

/// Loads and saves [`AppConfig`] files
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Manager for the default per-user configuration file
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Explicit path if given, the per-user default otherwise
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::with_path(path)),
            None => Self::new(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration; a missing file yields the defaults
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            info!("Configuration file not found, using defaults: {:?}", self.config_path);
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .with_context(|| format!("Failed to read configuration file {:?}", self.config_path))?;

        let config = serde_json::from_str::<AppConfig>(&content)
            .with_context(|| format!("Malformed configuration file {:?}", self.config_path))?;

        info!("Loaded configuration from: {:?}", self.config_path);
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .with_context(|| format!("Failed to write configuration file {:?}", self.config_path))?;

        info!("Configuration saved to: {:?}", self.config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("absent.json"));
        let config = manager.load_config().await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.pacing.base_delay_ms, 2000);
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"pacing": {"base_delay_ms": 500}, "site": {"base_url": "https://shop.example"}}"#)
            .unwrap();

        let config = ConfigManager::with_path(&path).load_config().await.unwrap();
        assert_eq!(config.pacing.base_delay_ms, 500);
        assert_eq!(config.pacing.max_jitter_ms, 1000);
        assert_eq!(config.site.base_url.as_deref(), Some("https://shop.example"));
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(ConfigManager::with_path(&path).load_config().await.is_err());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));
        let mut config = AppConfig::default();
        config.logging.module_filters.insert("reqwest".to_string(), "warn".to_string());

        manager.save_config(&config).await.unwrap();
        assert_eq!(manager.load_config().await.unwrap(), config);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        ConfigOverrides {
            delay_seconds: Some(0.25),
            site_base: Some("https://www.aloyoga.com/".to_string()),
            log_level: Some("debug".to_string()),
        }
        .apply(&mut config);

        assert_eq!(config.pacing.base_delay_ms, 250);
        assert_eq!(config.site.base_url.as_deref(), Some("https://www.aloyoga.com"));
        assert_eq!(config.logging.level, "debug");

        let before = config.clone();
        ConfigOverrides::default().apply(&mut config);
        assert_eq!(config, before);
    }
}
