//! PII detection and anonymization
//!
//! This module provides detection and replacement of PII in free text
//! before it leaves the process (typically toward an LLM endpoint).
//!
//! # Architecture
//!
//! The anonymization path consists of:
//! - **Detection**: regex recognizers from an extensible registry
//! - **Replacement**: category-keyed operators with a placeholder fallback
//! - **Audit**: structured logging with hashed PII values
//!
//! # Usage
//!
//! ```rust
//! use veil::anonymization::{Anonymizer, config::AnonymizerConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let anonymizer = Anonymizer::new(AnonymizerConfig::default())?;
//! let clean = anonymizer.anonymize("Call me at (555) 123-4567")?;
//! assert_eq!(clean, "Call me at <PHONE_NUMBER>");
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;
pub mod operators;

// Re-export main types
pub use config::AnonymizerConfig;
pub use detector::patterns::{PatternRegistry, RecognizerRule};
pub use engine::Anonymizer;
pub use models::{AnonymizedText, Detection, EntityCategory};
pub use operators::{Operator, OperatorTable};
