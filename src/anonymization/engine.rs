//! Anonymizer facade
//!
//! This module provides the [`Anonymizer`] that composes PII detection,
//! span replacement, and audit logging for free text.
//!
//! # Architecture
//!
//! The facade coordinates three components:
//! - **Detector**: finds PII spans using the recognizer registry
//! - **Operator table**: maps each span's category to its replacement
//! - **Audit Logger**: records anonymization operations with hashed values
//!
//! # Examples
//!
//! ```
//! use veil::anonymization::{Anonymizer, config::AnonymizerConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let anonymizer = Anonymizer::new(AnonymizerConfig::default())?;
//!
//! let output = anonymizer.anonymize("Contact me at jane@example.com")?;
//! assert_eq!(output, "Contact me at <EMAIL_ADDRESS>");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    audit::AuditLogger,
    config::AnonymizerConfig,
    detector::{patterns::PatternRegistry, patterns::RecognizerRule, regex::RegexDetector, PiiDetector},
    models::{AnonymizedText, Detection, EntityCategory},
    operators::{Operator, OperatorTable},
};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Instant;

/// Anonymizer facade
///
/// Composes the detector, recognizer registry, and operator table behind a
/// single `anonymize(text) -> text` operation. The configuration (allow-list,
/// threshold) is fixed at construction; `add_recognizer` and `add_operators`
/// are the only mutators and require external synchronization if the facade
/// is shared across threads while being configured.
pub struct Anonymizer {
    config: AnonymizerConfig,
    detector: RegexDetector,
    operators: OperatorTable,
    audit_logger: Option<AuditLogger>,
    allow_list: Option<Vec<EntityCategory>>,
}

impl Anonymizer {
    /// Create a new anonymizer facade
    ///
    /// Initializes the facade with the provided configuration, creating:
    /// - the regex detector (built-in rules, or a custom pattern library)
    /// - the audit logger (if enabled in configuration)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The pattern library file cannot be loaded
    /// - Audit logger initialization fails
    pub fn new(config: AnonymizerConfig) -> Result<Self> {
        config
            .validate()
            .context("Invalid anonymizer configuration")?;

        let detector = if let Some(ref pattern_path) = config.pattern_library {
            let registry = PatternRegistry::from_file(pattern_path)?;
            RegexDetector::with_registry(registry)
        } else {
            RegexDetector::new()?
        }
        .with_confidence_threshold(config.confidence_threshold);

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?)
        } else {
            None
        };

        // Empty allow-list means "all known categories"
        let allow_list = config
            .entities
            .as_ref()
            .filter(|entities| !entities.is_empty())
            .map(|entities| entities.iter().map(EntityCategory::new).collect());

        Ok(Self {
            config,
            detector,
            operators: OperatorTable::new(),
            audit_logger,
            allow_list,
        })
    }

    /// Anonymize a text, returning only the substituted string
    ///
    /// Shorthand for [`anonymize_detailed`](Self::anonymize_detailed)
    /// when the detections and timing are not needed.
    pub fn anonymize(&self, text: &str) -> Result<String> {
        Ok(self.anonymize_detailed(text)?.text)
    }

    /// Anonymize a text, returning the full result
    ///
    /// # Behavior
    ///
    /// 1. Detects spans, restricted to the configured allow-list
    /// 2. Resolves overlapping spans (highest score wins, then earliest,
    ///    then longest)
    /// 3. Replaces each selected span with its operator's output (custom
    ///    first, else the `<CATEGORY_NAME>` placeholder); segments outside
    ///    spans are untouched
    /// 4. Logs the operation to the audit log if enabled
    ///
    /// Each span is replaced independently: repeated occurrences of the
    /// same value are not guaranteed a consistent replacement.
    pub fn anonymize_detailed(&self, text: &str) -> Result<AnonymizedText> {
        let start = Instant::now();

        let raw = self
            .detector
            .detect(text, self.allow_list.as_deref())
            .context("PII detection failed")?;
        let spans = select_spans(raw);

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0usize;
        let mut detections = Vec::with_capacity(spans.len());

        for span in spans {
            output.push_str(&text[cursor..span.start]);
            let replacement = self
                .operators
                .replacement_for(&span)
                .with_context(|| format!("Operator failed for category {}", span.category))?;
            output.push_str(&replacement);
            cursor = span.end;
            detections.push(span);
        }
        output.push_str(&text[cursor..]);

        let processing_time = start.elapsed().as_millis() as u64;
        let result = AnonymizedText::new(output, detections, processing_time);

        if let Some(ref logger) = self.audit_logger {
            logger.log_anonymization(text, &result)?;
        }

        tracing::debug!(
            detections = result.total_detections(),
            duration_ms = result.processing_time_ms,
            "Anonymization completed"
        );

        Ok(result)
    }

    /// Register a recognizer rule
    ///
    /// Appends the rule to the registry; a rule with the same name is
    /// replaced wholesale. The rule is consulted on every subsequent
    /// detection call.
    pub fn add_recognizer(&mut self, rule: RecognizerRule) -> Result<()> {
        tracing::debug!(rule = %rule.name, category = %rule.category, "Registering recognizer");
        self.detector.add_rule(rule)
    }

    /// Merge custom operators into the operator table
    ///
    /// Existing entries for the same category are overwritten. Categories
    /// without a custom operator keep the placeholder fallback.
    pub fn add_operators(&mut self, operators: HashMap<EntityCategory, Operator>) {
        tracing::debug!(count = operators.len(), "Registering operators");
        self.operators.merge(operators);
    }

    /// Register a single custom operator
    pub fn add_operator(&mut self, category: impl Into<EntityCategory>, operator: Operator) {
        self.operators.insert(category, operator);
    }

    /// The configured allow-list, if any
    pub fn allow_list(&self) -> Option<&[EntityCategory]> {
        self.allow_list.as_deref()
    }

    /// The anonymizer configuration
    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }
}

/// Resolve overlapping spans
///
/// Highest score wins; ties go to the earlier start, then the longer span.
/// Returns the surviving spans in input order.
fn select_spans(mut detections: Vec<Detection>) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.start.cmp(&b.start))
            .then(b.len().cmp(&a.len()))
    });

    let mut selected: Vec<Detection> = Vec::new();
    for detection in detections {
        if !selected.iter().any(|kept| kept.overlaps(&detection)) {
            selected.push(detection);
        }
    }

    selected.sort_by_key(|d| d.start);
    selected
}
