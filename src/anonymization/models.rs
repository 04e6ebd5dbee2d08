//! PII entity data models
//!
//! Entity categories are an open string vocabulary rather than a closed
//! enum: the set of categories is user-extensible at configuration time
//! (custom recognizers introduce new ones), so both the recognizer registry
//! and the operator table key on the category name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named class of sensitive information (e.g. `PERSON`, `PHONE_NUMBER`).
///
/// Category names are normalized to `SCREAMING_SNAKE_CASE` on construction
/// so lookups are insensitive to the casing used at registration time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCategory(String);

impl EntityCategory {
    /// Create a category from a name, normalizing to `SCREAMING_SNAKE_CASE`
    pub fn new(name: impl AsRef<str>) -> Self {
        let normalized = name
            .as_ref()
            .trim()
            .to_uppercase()
            .replace([' ', '-'], "_");
        Self(normalized)
    }

    /// The normalized category name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The default replacement token for this category: `<CATEGORY_NAME>`
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.0)
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityCategory {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EntityCategory {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A detected PII span within one input text
///
/// Offsets are byte offsets into the original text. Spans are transient per
/// call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Category of the detected entity
    pub category: EntityCategory,
    /// Byte offset of the span start (inclusive)
    pub start: usize,
    /// Byte offset of the span end (exclusive)
    pub end: usize,
    /// Confidence score (0.0 - 1.0), fixed per recognizer rule
    pub score: f32,
    /// The matched substring
    pub matched_text: String,
    /// Name of the recognizer rule that produced this span
    pub recognizer: String,
}

impl Detection {
    /// Create a new detection span
    pub fn new(
        category: EntityCategory,
        start: usize,
        end: usize,
        score: f32,
        matched_text: impl Into<String>,
        recognizer: impl Into<String>,
    ) -> Self {
        Self {
            category,
            start,
            end,
            score: score.clamp(0.0, 1.0),
            matched_text: matched_text.into(),
            recognizer: recognizer.into(),
        }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether two spans overlap
    pub fn overlaps(&self, other: &Detection) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Result of anonymizing one input text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// The text with every selected span replaced
    pub text: String,
    /// Spans that were replaced, in input order
    pub detections: Vec<Detection>,
    /// Detection counts per category
    pub stats_by_category: HashMap<EntityCategory, usize>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of the anonymization call
    pub timestamp: DateTime<Utc>,
}

impl AnonymizedText {
    /// Create a new anonymization result
    pub fn new(text: String, detections: Vec<Detection>, processing_time_ms: u64) -> Self {
        let mut stats_by_category = HashMap::new();
        for detection in &detections {
            *stats_by_category
                .entry(detection.category.clone())
                .or_insert(0) += 1;
        }

        Self {
            text,
            detections,
            stats_by_category,
            processing_time_ms,
            timestamp: Utc::now(),
        }
    }

    /// Get total number of detections
    pub fn total_detections(&self) -> usize {
        self.detections.len()
    }

    /// Check if any PII was detected
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}
