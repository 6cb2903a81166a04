//! Engine configuration
//!
//! Loaded once at startup and never mutated. Sources, lowest precedence first:
//! - built-in defaults
//! - TOML file (`--config` or `DEVMENTOR_CONFIG`, else `~/.config/devmentor/config.toml` when present)
//! - environment (`OPENAI_API_KEY`, `DEVMENTOR_MODEL`, `DEVMENTOR_BASE_URL`, `PORT`)
//! - command-line flags, applied by the caller

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detect::DetectionThresholds;
use crate::error::{EngineError, Result};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "DEVMENTOR_MODEL";
pub const BASE_URL_ENV: &str = "DEVMENTOR_BASE_URL";
pub const PORT_ENV: &str = "PORT";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub completion: CompletionConfig,

    #[serde(default)]
    pub detection: DetectionThresholds,

    #[serde(default)]
    pub fallback: FallbackConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Completion service settings
#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Absent or blank means every request takes the fallback path
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

impl CompletionConfig {
    /// The credential, if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Synthesized-result settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Artificial latency before returning a synthesized result (0 disables)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    1500
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for this crate (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("devmentor").join("config.toml"))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| EngineError::ConfigError {
            message: format!("Failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| EngineError::ConfigError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }

    /// Load file (explicit path must exist; default path is optional) then environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overlay environment values using `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.completion.api_key = Some(key);
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.completion.model = model;
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.completion.base_url = url;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|_| EngineError::ConfigError {
                message: format!("{} is not a valid port: {}", PORT_ENV, port),
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        let ratio = self.detection.claimed_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(EngineError::ConfigError {
                message: format!("detection.claimed_ratio must be within 0..=1, got {}", ratio),
            });
        }
        if self.completion.model.trim().is_empty() {
            return Err(EngineError::ConfigError {
                message: "completion.model must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
