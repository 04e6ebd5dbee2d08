//! Configuration management for Veil.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Veil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - Environment variable overrides (`VEIL_*` prefix)
//! - Type-safe configuration structs
//!
//! # Example Configuration
//!
//! ```toml
//! [anonymizer]
//! entities = ["EMAIL_ADDRESS", "PHONE_NUMBER"]
//! confidence_threshold = 0.4
//!
//! [anonymizer.audit]
//! enabled = true
//! log_path = "./audit/anonymization.log"
//!
//! [llm]
//! base_url = "https://api.openai.com"
//! model = "gpt-4o-mini"
//! api_key = "${VEIL_LLM_API_KEY}"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//! if let Some(llm) = &config.llm {
//!     println!("LLM endpoint: {}", llm.base_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{Environment, LlmConfig, LoggingConfig, VeilConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
