//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted file logs with rotation
//! - Configurable log levels
//! - Console output for development
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the completion of an anonymization call
///
/// # Example
///
/// ```no_run
/// use veil::log_anonymize_complete;
/// use std::time::Duration;
///
/// let detections = 3;
/// let duration = Duration::from_millis(12);
/// log_anonymize_complete!(detections, duration);
/// ```
#[macro_export]
macro_rules! log_anonymize_complete {
    ($detections:expr, $duration:expr) => {
        tracing::info!(
            detections = $detections,
            duration_ms = $duration.as_millis(),
            "Anonymization completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use veil::log_error_with_context;
/// use veil::domain::VeilError;
///
/// let error = VeilError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = $reason,
            "Retrying operation"
        );
    };
}
