//! Configuration schema types
//!
//! This module defines the configuration structure for Veil.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Anonymizer configuration
    #[serde(default)]
    pub anonymizer: crate::anonymization::config::AnonymizerConfig,

    /// Language model endpoint configuration (optional; the anonymizer can
    /// be used standalone without an LLM step)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VeilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.anonymizer.validate().map_err(|e| e.to_string())?;
        if let Some(ref llm) = self.llm {
            llm.validate(&self.environment)?;
        }
        self.logging.validate()?;
        Ok(())
    }
}

impl Default for VeilConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            anonymizer: crate::anonymization::config::AnonymizerConfig::default(),
            llm: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Language model endpoint configuration
///
/// Covers an OpenAI-compatible chat completions endpoint. The API key is
/// held in a [`SecretString`] and never printed via Debug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the completion endpoint without the API path
    /// (e.g. `https://api.openai.com`); a trailing `/v1` is tolerated
    /// and stripped before the request path is appended
    pub base_url: String,

    /// Model identifier passed in the request body
    pub model: String,

    /// API key for bearer authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum retry attempts for retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff in milliseconds (doubled per attempt)
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    250
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

impl LlmConfig {
    /// Validates the LLM configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), String> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid llm.base_url '{}': {}", self.base_url, e))?;

        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(format!(
                "llm.base_url must be http(s), got '{}'",
                parsed.scheme()
            ));
        }

        // Plaintext endpoints are only acceptable outside production
        if *environment == Environment::Production && parsed.scheme() == "http" {
            return Err("llm.base_url must use https in production".to_string());
        }

        if self.model.trim().is_empty() {
            return Err("llm.model must not be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("llm.timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable local file logging with rotation
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy for local log files (daily, hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    /// Validates the logging configuration
    pub fn validate(&self) -> Result<(), String> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(format!(
                    "Invalid log level '{other}'. Must be one of: trace, debug, info, warn, error"
                ))
            }
        }

        match self.local_rotation.as_str() {
            "daily" | "hourly" => {}
            other => {
                return Err(format!(
                    "Invalid log rotation '{other}'. Must be one of: daily, hourly"
                ))
            }
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must not be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_llm_config() -> LlmConfig {
        LlmConfig {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_seconds: 30,
            max_retries: 3,
            initial_backoff_ms: 250,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = VeilConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_llm_config_valid() {
        let config = sample_llm_config();
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_llm_config_rejects_bad_url() {
        let mut config = sample_llm_config();
        config.base_url = "not a url".to_string();
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_llm_config_rejects_http_in_production() {
        let mut config = sample_llm_config();
        config.base_url = "http://localhost:8080".to_string();
        assert!(config.validate(&Environment::Development).is_ok());
        assert!(config.validate(&Environment::Production).is_err());
    }

    #[test]
    fn test_llm_config_rejects_empty_model() {
        let mut config = sample_llm_config();
        config.model = "  ".to_string();
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_logging_config_rejects_bad_level() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_llm_config_defaults_from_toml() {
        let config: LlmConfig = toml::from_str(
            r#"
            base_url = "https://api.openai.com"
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_backoff_ms, 250);
    }
}
