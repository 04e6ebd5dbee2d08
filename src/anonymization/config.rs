//! Anonymizer configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Anonymizer configuration
///
/// The allow-list and thresholds are immutable for the lifetime of one
/// facade instance; only `add_recognizer`/`add_operators` mutate a built
/// [`crate::anonymization::Anonymizer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Allow-list of entity categories to analyze.
    /// `None` or an empty list means all known categories.
    #[serde(default)]
    pub entities: Option<Vec<String>>,

    /// Minimum rule confidence for a span to be reported
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Path to a recognizer library TOML file (built-in rules if unset)
    pub pattern_library: Option<PathBuf>,

    /// Default locale for fake-value operators
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_confidence_threshold() -> f32 {
    0.4
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            entities: None,
            confidence_threshold: default_confidence_threshold(),
            pattern_library: None,
            default_locale: default_locale(),
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!(
                "confidence_threshold {} outside [0.0, 1.0]",
                self.confidence_threshold
            );
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        self.audit.validate().context("Invalid audit configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_ANONYMIZER_ENTITIES") {
            let entities: Vec<String> = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            self.entities = if entities.is_empty() {
                None
            } else {
                Some(entities)
            };
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZER_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = val
                .parse()
                .context("Invalid VEIL_ANONYMIZER_CONFIDENCE_THRESHOLD value")?;
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZER_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("VEIL_ANONYMIZER_LOCALE") {
            self.default_locale = val;
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled {
            if let Some(parent) = self.log_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!(
                            "Failed to create audit log directory: {}",
                            parent.display()
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid VEIL_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("VEIL_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("VEIL_AUDIT_JSON_FORMAT") {
            self.json_format = val.parse().context("Invalid VEIL_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}
