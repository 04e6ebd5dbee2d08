//! PII detection module
//!
//! Provides the trait-based detection interface and the regex
//! implementation backed by the recognizer registry.

pub mod patterns;
pub mod regex;

use crate::anonymization::models::{Detection, EntityCategory};
use anyhow::Result;

/// Trait for PII detection implementations
///
/// A detector scans raw text and returns spans with a category and a
/// confidence score. When `allow_list` is given, only spans of the listed
/// categories are returned; `None` means all known categories.
pub trait PiiDetector: Send + Sync {
    /// Detect PII spans in a text
    fn detect(&self, text: &str, allow_list: Option<&[EntityCategory]>)
        -> Result<Vec<Detection>>;

    /// The minimum rule confidence this detector reports
    fn confidence_threshold(&self) -> f32;
}
