//! Sequential text-transform pipeline
//!
//! A [`Chain`] runs [`Step`]s one after another against a shared
//! [`StepContext`] of named string values. Each step reads its input keys
//! and writes its output key; composition order and key validation live
//! here, not in the steps.
//!
//! The demonstrated flow is: raw text -> anonymize -> prompt template ->
//! LLM call -> final answer. Steps are stateless; per-call state lives in
//! the context.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use veil::anonymization::{Anonymizer, config::AnonymizerConfig};
//! use veil::pipeline::{AnonymizeStep, Chain, PromptStep, PromptTemplate, StepContext};
//!
//! # async fn example() -> veil::domain::Result<()> {
//! let anonymizer = Arc::new(Anonymizer::new(AnonymizerConfig::default())
//!     .map_err(|e| veil::domain::VeilError::Anonymization(e.to_string()))?);
//!
//! let chain = Chain::new()
//!     .push(AnonymizeStep::new(anonymizer))
//!     .push(PromptStep::new(PromptTemplate::new(
//!         "Answer briefly: {anonymized_text}",
//!     )));
//!
//! let mut ctx = StepContext::with_input("text", "Call me at (555) 123-4567");
//! chain.run(&mut ctx).await?;
//!
//! let prompt = ctx.require("prompt")?;
//! # let _ = prompt;
//! # Ok(())
//! # }
//! ```

pub mod anonymize;
pub mod llm;
pub mod prompt;

pub use anonymize::AnonymizeStep;
pub use llm::{ChatCompletionsClient, LlmClient, LlmStep};
pub use prompt::{PromptStep, PromptTemplate};

use crate::domain::{Result, VeilError};
use async_trait::async_trait;
use std::collections::HashMap;

/// Named string values flowing through a chain
#[derive(Debug, Clone, Default)]
pub struct StepContext {
    values: HashMap<String, String>,
}

impl StepContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with one input value
    pub fn with_input(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut ctx = Self::new();
        ctx.insert(key, value);
        ctx
    }

    /// Insert or overwrite a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a value by key, failing with a pipeline error if absent
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| VeilError::Pipeline(format!("Missing context key '{key}'")))
    }

    /// Keys currently present, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// A named-input/named-output transform step
///
/// Steps are synchronous from the caller's perspective: one invocation per
/// `run`, no intermediate states. Anything async inside (the LLM call) is
/// awaited before the step returns.
#[async_trait]
pub trait Step: Send + Sync {
    /// Step name for logging
    fn name(&self) -> &str;

    /// Run the step against the context
    async fn run(&self, ctx: &mut StepContext) -> Result<()>;
}

/// A sequential chain of steps
#[derive(Default)]
pub struct Chain {
    steps: Vec<Box<dyn Step>>,
}

impl Chain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn push(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Number of steps in the chain
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run each step in order
    ///
    /// Stops at the first failing step; the context keeps the values
    /// written so far.
    pub async fn run(&self, ctx: &mut StepContext) -> Result<()> {
        for step in &self.steps {
            tracing::debug!(step = step.name(), "Running pipeline step");
            step.run(ctx).await.map_err(|e| {
                tracing::error!(step = step.name(), error = %e, "Pipeline step failed");
                e
            })?;
        }
        Ok(())
    }
}
