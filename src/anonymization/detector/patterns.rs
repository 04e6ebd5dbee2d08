//! Recognizer registry for PII detection
//!
//! Rules are registered once at configuration time and consulted on every
//! detection call. Re-registering a rule under an existing name replaces it
//! wholesale; there is no partial mutation of a registered rule.

use crate::anonymization::models::EntityCategory;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// A recognizer rule as declared in TOML or built programmatically
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerRule {
    /// Rule name (registry key)
    #[serde(default)]
    pub name: String,
    /// Entity category this rule detects
    pub category: String,
    /// Regex patterns for this rule
    pub patterns: Vec<String>,
    /// Fixed confidence score (0.0 - 1.0)
    pub confidence: f32,
}

impl RecognizerRule {
    /// Create a single-pattern rule
    ///
    /// # Examples
    ///
    /// ```
    /// use veil::anonymization::detector::patterns::RecognizerRule;
    ///
    /// let rule = RecognizerRule::new("polish_phone", "PHONE_NUMBER", r"\d{9}", 0.9);
    /// assert_eq!(rule.patterns.len(), 1);
    /// ```
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        pattern: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            patterns: vec![pattern.into()],
            confidence,
        }
    }
}

/// A compiled pattern with its rule metadata
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// Rule name this pattern belongs to
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Entity category
    pub category: EntityCategory,
    /// Fixed confidence score
    pub confidence: f32,
}

/// Pattern library container (TOML shape)
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    recognizers: HashMap<String, RecognizerRule>,
}

/// Registry of compiled recognizer rules
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    rules: Vec<CompiledRule>,
}

impl PatternRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut registry = Self::new();
        // Sort for deterministic rule order regardless of the HashMap walk
        let mut entries: Vec<_> = library.recognizers.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, mut rule) in entries {
            if rule.name.is_empty() {
                rule.name = name;
            }
            registry.add_rule(rule)?;
        }

        Ok(registry)
    }

    /// Create a registry with the built-in default rules
    pub fn builtin() -> Result<Self> {
        let default_toml = include_str!("../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Register a rule, replacing any existing rule with the same name
    ///
    /// # Errors
    ///
    /// Returns an error if the confidence is out of range, the rule has no
    /// patterns, or a pattern fails to compile. On error the registry is
    /// left unchanged.
    pub fn add_rule(&mut self, rule: RecognizerRule) -> Result<()> {
        if rule.name.trim().is_empty() {
            anyhow::bail!("Recognizer rule must have a name");
        }
        if rule.patterns.is_empty() {
            anyhow::bail!("Recognizer rule '{}' has no patterns", rule.name);
        }
        if !(0.0..=1.0).contains(&rule.confidence) {
            anyhow::bail!(
                "Recognizer rule '{}' has confidence {} outside [0.0, 1.0]",
                rule.name,
                rule.confidence
            );
        }

        let category = EntityCategory::new(&rule.category);
        let mut compiled = Vec::with_capacity(rule.patterns.len());
        for pattern_str in &rule.patterns {
            let regex = Regex::new(pattern_str).with_context(|| {
                format!("Invalid regex in rule '{}': {}", rule.name, pattern_str)
            })?;
            compiled.push(CompiledRule {
                name: rule.name.clone(),
                regex,
                category: category.clone(),
                confidence: rule.confidence,
            });
        }

        // Replace wholesale, then append
        self.rules.retain(|r| r.name != rule.name);
        self.rules.extend(compiled);
        Ok(())
    }

    /// All compiled rules
    pub fn all_rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Compiled rules for one category
    pub fn rules_for_category(&self, category: &EntityCategory) -> Vec<&CompiledRule> {
        self.rules
            .iter()
            .filter(|r| &r.category == category)
            .collect()
    }

    /// All known category names, sorted
    pub fn categories(&self) -> BTreeSet<EntityCategory> {
        self.rules.iter().map(|r| r.category.clone()).collect()
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
