use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// One external competition feed the user follows: display name plus the
/// code the provider expects in fixture requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueEndpoint {
    pub name: String,
    #[serde(rename = "provider_code")]
    pub provider_code: String,
}

impl LeagueEndpoint {
    pub fn new(name: impl Into<String>, provider_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_code: provider_code.into(),
        }
    }
}

/// Configuration for the reconciliation engine. Loaded from a TOML file in
/// the platform config directory; environment variables override file
/// values. The engine treats the league list as read-only input and
/// re-reads it between polling cycles.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Provider API domain for fixture and score requests. Includes the
    /// https:// prefix.
    pub api_domain: String,
    /// Path to the log file. If not specified, logs go to a default
    /// location under the platform config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for provider requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Competition feeds to fetch and poll.
    #[serde(default)]
    pub leagues: Vec<LeagueEndpoint>,
}

fn default_http_timeout() -> u64 {
    crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: String::new(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            leagues: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    ///
    /// # Environment Variables
    /// - `MATCHSYNC_API_DOMAIN` - Override API domain
    /// - `MATCHSYNC_LOG_FILE` - Override log file path
    /// - `MATCHSYNC_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    pub async fn load() -> Result<Self, AppError> {
        Self::load_from_path(&Self::config_path()).await
    }

    /// Loads configuration from an explicit path, applying env overrides
    /// and validation. A missing file yields the default config with env
    /// overrides applied, so a fresh install with `MATCHSYNC_API_DOMAIN`
    /// set works without a file.
    pub async fn load_from_path(path: &Path) -> Result<Self, AppError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).await?;
            toml::from_str(&content)?
        } else {
            debug!("No config file at {}, starting from defaults", path.display());
            Config::default()
        };

        if let Ok(api_domain) = std::env::var(crate::constants::env_vars::API_DOMAIN) {
            config.api_domain = api_domain;
        }

        if let Ok(log_file_path) = std::env::var(crate::constants::env_vars::LOG_FILE) {
            config.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(crate::constants::env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.http_timeout_seconds = timeout;
        }

        config.validate()?;

        Ok(config)
    }

    /// Saves the configuration to the default config file location,
    /// creating parent directories as needed.
    pub async fn save(&self) -> Result<(), AppError> {
        self.save_to_path(&Self::config_path()).await
    }

    /// Saves the configuration to an explicit path.
    pub async fn save_to_path(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Validates the configuration settings.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_domain.trim().is_empty() {
            return Err(AppError::config_error("API domain must not be empty"));
        }
        if !self.api_domain.starts_with("http://") && !self.api_domain.starts_with("https://") {
            return Err(AppError::config_error(format!(
                "API domain must include the protocol prefix: {}",
                self.api_domain
            )));
        }
        if self.http_timeout_seconds == 0 {
            return Err(AppError::config_error("HTTP timeout must be positive"));
        }
        for league in &self.leagues {
            if league.provider_code.trim().is_empty() {
                return Err(AppError::config_error(format!(
                    "League {:?} has an empty provider code",
                    league.name
                )));
            }
        }
        Ok(())
    }

    /// Platform-specific path of the config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("matchsync")
            .join("config.toml")
    }

    /// Platform-specific directory for log files.
    pub fn log_dir_path() -> String {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("matchsync")
            .join("logs")
            .to_string_lossy()
            .to_string()
    }
}
