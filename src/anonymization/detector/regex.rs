//! Regex-based PII detector

use super::{patterns::PatternRegistry, PiiDetector};
use crate::anonymization::detector::patterns::RecognizerRule;
use crate::anonymization::models::{Detection, EntityCategory};
use anyhow::Result;

/// Regex-based PII detector
///
/// Scans text against every compiled rule in the registry, skipping rules
/// below the confidence threshold and categories outside the allow-list.
pub struct RegexDetector {
    registry: PatternRegistry,
    confidence_threshold: f32,
}

impl RegexDetector {
    /// Create a new detector with the built-in rules
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::builtin()?;
        Ok(Self {
            registry,
            confidence_threshold: 0.4,
        })
    }

    /// Create a new detector with a custom registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            registry,
            confidence_threshold: 0.4,
        }
    }

    /// Set the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Register a recognizer rule, replacing any rule with the same name
    pub fn add_rule(&mut self, rule: RecognizerRule) -> Result<()> {
        self.registry.add_rule(rule)
    }

    /// The underlying registry
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }
}

impl PiiDetector for RegexDetector {
    fn detect(
        &self,
        text: &str,
        allow_list: Option<&[EntityCategory]>,
    ) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();

        for rule in self.registry.all_rules() {
            if rule.confidence < self.confidence_threshold {
                continue;
            }
            if let Some(allowed) = allow_list {
                if !allowed.contains(&rule.category) {
                    continue;
                }
            }

            for matched in rule.regex.find_iter(text) {
                detections.push(Detection::new(
                    rule.category.clone(),
                    matched.start(),
                    matched.end(),
                    rule.confidence,
                    matched.as_str(),
                    rule.name.clone(),
                ));
            }
        }

        detections.sort_by_key(|d| (d.start, d.end));
        Ok(detections)
    }

    fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_email() {
        let detector = RegexDetector::new().unwrap();
        let detections = detector
            .detect("Contact: john.doe@example.com", None)
            .unwrap();

        assert!(!detections.is_empty());
        assert!(detections
            .iter()
            .any(|d| d.matched_text.contains("@example.com")));
    }

    #[test]
    fn test_detect_phone() {
        let detector = RegexDetector::new().unwrap();
        let detections = detector.detect("Call (555) 123-4567", None).unwrap();

        assert!(!detections.is_empty());
        assert_eq!(
            detections[0].category,
            EntityCategory::new("PHONE_NUMBER")
        );
    }

    #[test]
    fn test_detect_multiple() {
        let detector = RegexDetector::new().unwrap();
        let detections = detector
            .detect(
                "Email patient@example.com or call (555) 123-4567",
                None,
            )
            .unwrap();

        let has_email = detections.iter().any(|d| d.matched_text.contains('@'));
        let has_phone = detections.iter().any(|d| d.matched_text.contains("555"));
        assert!(has_email);
        assert!(has_phone);
    }

    #[test]
    fn test_allow_list_restricts_categories() {
        let detector = RegexDetector::new().unwrap();
        let allow = vec![EntityCategory::new("EMAIL_ADDRESS")];
        let detections = detector
            .detect(
                "Email patient@example.com or call (555) 123-4567",
                Some(&allow),
            )
            .unwrap();

        assert!(!detections.is_empty());
        assert!(detections
            .iter()
            .all(|d| d.category == EntityCategory::new("EMAIL_ADDRESS")));
    }

    #[test]
    fn test_confidence_threshold_filters_rules() {
        // The phone rules sit at 0.6; a 0.7 threshold must drop them
        let detector = RegexDetector::new()
            .unwrap()
            .with_confidence_threshold(0.7);
        let detections = detector.detect("Call (555) 123-4567", None).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn test_added_rule_is_consulted() {
        let mut detector = RegexDetector::new().unwrap();
        assert!(detector
            .detect("My polish phone number is 666555444", None)
            .unwrap()
            .is_empty());

        detector
            .add_rule(RecognizerRule::new(
                "polish_phone",
                "PHONE_NUMBER",
                r"\b\d{9}\b",
                0.9,
            ))
            .unwrap();

        let detections = detector
            .detect("My polish phone number is 666555444", None)
            .unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].matched_text, "666555444");
    }

    #[test]
    fn test_spans_sorted_by_start() {
        let detector = RegexDetector::new().unwrap();
        let detections = detector
            .detect("b@b.com comes before 10.0.0.1 here", None)
            .unwrap();

        let starts: Vec<usize> = detections.iter().map(|d| d.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }
}
