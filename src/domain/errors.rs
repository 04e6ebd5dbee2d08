//! Domain error types
//!
//! This module defines the error hierarchy for Veil. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Recognizer pattern errors (invalid regex, unknown rule)
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Anonymization errors (detection or operator failures)
    #[error("Anonymization error: {0}")]
    Anonymization(String),

    /// Pipeline errors (missing keys, step failures)
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Prompt template errors
    #[error("Template error: {0}")]
    Template(String),

    /// Language model client errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Audit logging errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Language model client errors
///
/// Errors that occur when calling the completion endpoint.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to the completion endpoint
    #[error("Failed to connect to LLM endpoint: {0}")]
    ConnectionFailed(String),

    /// Authentication failed (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded, retry after: {0}")]
    RateLimitExceeded(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Invalid or empty response body
    #[error("Invalid response from endpoint: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Whether a retry may succeed for this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RateLimitExceeded(_)
                | Self::ServerError { .. }
                | Self::Timeout(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_veil_error_display() {
        let err = VeilError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_llm_error_conversion() {
        let llm_err = LlmError::ConnectionFailed("Network error".to_string());
        let veil_err: VeilError = llm_err.into();
        assert!(matches!(veil_err, VeilError::Llm(_)));
    }

    #[test]
    fn test_llm_error_retryable() {
        assert!(LlmError::RateLimitExceeded("5 seconds".to_string()).is_retryable());
        assert!(LlmError::ServerError {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_retryable());
        assert!(!LlmError::ClientError {
            status: 400,
            message: "bad request".to_string()
        }
        .is_retryable());
        assert!(!LlmError::AuthenticationFailed("bad key".to_string()).is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let veil_err: VeilError = io_err.into();
        assert!(matches!(veil_err, VeilError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let veil_err: VeilError = json_err.into();
        assert!(matches!(veil_err, VeilError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let veil_err: VeilError = toml_err.into();
        assert!(matches!(veil_err, VeilError::Configuration(_)));
        assert!(veil_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_veil_error_implements_std_error() {
        let err = VeilError::Pipeline("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
