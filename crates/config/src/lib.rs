//! Configuration loading, validation, and management for SonjuTalk.
//!
//! Loads configuration from `~/.sonjutalk/config.toml` with environment
//! variable overrides. The API credential is the only fatal requirement,
//! and only at startup — `ensure_api_key()` is called by every command
//! that reaches the model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.sonjutalk/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenAI-compatible API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Max tokens per chat response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for chat and guide turns
    #[serde(default = "default_temperature_chat")]
    pub temperature_chat: f32,

    /// Temperature for quiz generation
    #[serde(default = "default_temperature_quiz")]
    pub temperature_quiz: f32,

    /// Client-side timeout for a single completion request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Conversation history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_max_tokens() -> u32 {
    600
}
fn default_temperature_chat() -> f32 {
    0.7
}
fn default_temperature_quiz() -> f32 {
    0.8
}
fn default_request_timeout_secs() -> u64 {
    30
}

/// Redact the credential in Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature_chat", &self.temperature_chat)
            .field("temperature_quiz", &self.temperature_quiz)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("history", &self.history)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// How many exchanges (user + assistant pairs) a session retains
    #[serde(default = "default_max_exchanges")]
    pub max_exchanges: usize,

    /// How many recent exchanges are included in each chat prompt
    #[serde(default = "default_prompt_exchanges")]
    pub prompt_exchanges: usize,
}

fn default_max_exchanges() -> usize {
    10
}
fn default_prompt_exchanges() -> usize {
    5
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_exchanges: default_max_exchanges(),
            prompt_exchanges: default_prompt_exchanges(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.sonjutalk/config.toml).
    ///
    /// Also checks environment variables for the API key:
    /// - `SONJUTALK_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("SONJUTALK_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("SONJUTALK_MODEL") {
            config.default_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".sonjutalk")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("temperature_chat", self.temperature_chat),
            ("temperature_quiz", self.temperature_quiz),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.history.max_exchanges == 0 || self.history.prompt_exchanges == 0 {
            return Err(ConfigError::ValidationError(
                "history windows must be at least 1 exchange".into(),
            ));
        }

        Ok(())
    }

    /// Fail with a ConfigError if no API key is available.
    ///
    /// Fatal at startup only; never called mid-session.
    pub fn ensure_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey)
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            temperature_chat: default_temperature_chat(),
            temperature_quiz: default_temperature_quiz(),
            request_timeout_secs: default_request_timeout_secs(),
            history: HistoryConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key configured — set SONJUTALK_API_KEY or OPENAI_API_KEY")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 600);
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.history.max_exchanges, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_model, config.default_model);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.history.prompt_exchanges, config.history.prompt_exchanges);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature_quiz: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_history_window_rejected() {
        let config = AppConfig {
            history: HistoryConfig {
                max_exchanges: 0,
                prompt_exchanges: 5,
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().default_model, "gpt-4o-mini");
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let config = AppConfig::default();
        assert!(matches!(
            config.ensure_api_key(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn api_key_redacted_in_debug() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn config_file_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_model = "gpt-4o"
temperature_quiz = 0.9

[history]
max_exchanges = 4

[gateway]
port = 9000
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_model, "gpt-4o");
        assert!((config.temperature_quiz - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.history.max_exchanges, 4);
        // Unspecified fields keep their defaults
        assert_eq!(config.history.prompt_exchanges, 5);
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.host, "0.0.0.0");
    }
}
