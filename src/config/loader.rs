//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VeilConfig;
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`VeilConfig`]
/// 4. Applies environment variable overrides (`VEIL_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use veil::config::loader::load_config;
///
/// let config = load_config("veil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from a TOML string
///
/// Same pipeline as [`load_config`] without the file read.
pub fn load_config_from_str(contents: &str) -> Result<VeilConfig> {
    // Perform environment variable substitution
    let contents = substitute_env_vars(contents)?;

    // Parse TOML
    let mut config: VeilConfig = toml::from_str(&contents)
        .map_err(|e| VeilError::Configuration(format!("Failed to parse TOML: {e}")))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config)?;

    // Validate configuration
    config
        .validate()
        .map_err(|e| VeilError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are passed through untouched so documentation examples
/// inside config files don't require the variables to be set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VeilError::Configuration(format!("Invalid substitution regex: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let substituted = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing_vars.push(var_name.to_string());
                    String::new()
                }
            }
        });

        result.push_str(&substituted);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        missing_vars.sort();
        missing_vars.dedup();
        return Err(VeilError::Configuration(format!(
            "Missing environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies `VEIL_*` environment variable overrides to the configuration
fn apply_env_overrides(config: &mut VeilConfig) -> Result<()> {
    if let Ok(val) = std::env::var("VEIL_LOG_LEVEL") {
        config.logging.level = val;
    }

    if let Some(ref mut llm) = config.llm {
        if let Ok(val) = std::env::var("VEIL_LLM_BASE_URL") {
            llm.base_url = val;
        }
        if let Ok(val) = std::env::var("VEIL_LLM_MODEL") {
            llm.model = val;
        }
        if let Ok(val) = std::env::var("VEIL_LLM_API_KEY") {
            llm.api_key = Some(crate::config::secret_string(val));
        }
    }

    config
        .anonymizer
        .apply_env_overrides()
        .map_err(|e| VeilError::Configuration(e.to_string()))?;

    Ok(())
}
