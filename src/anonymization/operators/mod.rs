//! Replacement operators
//!
//! An operator maps a detected span to its replacement value. The table is
//! keyed by category name; a category without a custom operator falls back
//! to the placeholder token `<CATEGORY_NAME>`.
//!
//! Replacement is independent per span: two occurrences of the same value
//! in one text go through the operator separately and may produce different
//! replacements. Cross-occurrence consistency is a known limitation.

pub mod fake;

use crate::anonymization::models::{Detection, EntityCategory};
use anyhow::Result;
use std::collections::HashMap;

/// Boxed replacement callback
pub type OperatorFn = dyn Fn(&Detection) -> Result<String> + Send + Sync;

/// A replacement operator for one entity category
pub struct Operator {
    func: Box<OperatorFn>,
}

impl Operator {
    /// Create an operator from a callback
    ///
    /// # Examples
    ///
    /// ```
    /// use veil::anonymization::operators::Operator;
    ///
    /// let masked = Operator::new(|d| Ok("*".repeat(d.matched_text.len())));
    /// # let _ = masked;
    /// ```
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Detection) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
        }
    }

    /// Create an operator that always returns a fixed replacement
    pub fn fixed(replacement: impl Into<String>) -> Self {
        let replacement = replacement.into();
        Self::new(move |_| Ok(replacement.clone()))
    }

    /// Apply the operator to a detected span
    pub fn apply(&self, detection: &Detection) -> Result<String> {
        (self.func)(detection)
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator").finish_non_exhaustive()
    }
}

/// Category-keyed table of replacement operators
#[derive(Debug, Default)]
pub struct OperatorTable {
    operators: HashMap<EntityCategory, Operator>,
}

impl OperatorTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator for a category, overwriting any existing entry
    pub fn insert(&mut self, category: impl Into<EntityCategory>, operator: Operator) {
        self.operators.insert(category.into(), operator);
    }

    /// Merge another set of operators into this table
    ///
    /// Entries for categories already present are overwritten.
    pub fn merge(&mut self, other: HashMap<EntityCategory, Operator>) {
        self.operators.extend(other);
    }

    /// Look up the operator for a category
    pub fn get(&self, category: &EntityCategory) -> Option<&Operator> {
        self.operators.get(category)
    }

    /// Compute the replacement for a span
    ///
    /// Uses the custom operator for the span's category when one is
    /// registered, otherwise the placeholder token `<CATEGORY_NAME>`.
    pub fn replacement_for(&self, detection: &Detection) -> Result<String> {
        match self.operators.get(&detection.category) {
            Some(operator) => operator.apply(detection),
            None => Ok(detection.category.placeholder()),
        }
    }

    /// Number of registered operators
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether no operators are registered
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}
