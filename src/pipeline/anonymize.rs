//! Anonymization pipeline step

use super::{Step, StepContext};
use crate::anonymization::Anonymizer;
use crate::domain::{Result, VeilError};
use async_trait::async_trait;
use std::sync::Arc;

/// Default input key for the raw text
pub const DEFAULT_INPUT_KEY: &str = "text";
/// Default output key for the anonymized text
pub const DEFAULT_OUTPUT_KEY: &str = "anonymized_text";

/// Pipeline step that anonymizes one named input into one named output
///
/// Pure glue around [`Anonymizer::anonymize_detailed`]: input validation
/// and composition order belong to the [`super::Chain`].
pub struct AnonymizeStep {
    anonymizer: Arc<Anonymizer>,
    input_key: String,
    output_key: String,
}

impl AnonymizeStep {
    /// Create a step with the default keys (`text` -> `anonymized_text`)
    pub fn new(anonymizer: Arc<Anonymizer>) -> Self {
        Self {
            anonymizer,
            input_key: DEFAULT_INPUT_KEY.to_string(),
            output_key: DEFAULT_OUTPUT_KEY.to_string(),
        }
    }

    /// Override the input and output keys
    pub fn with_keys(
        mut self,
        input_key: impl Into<String>,
        output_key: impl Into<String>,
    ) -> Self {
        self.input_key = input_key.into();
        self.output_key = output_key.into();
        self
    }
}

#[async_trait]
impl Step for AnonymizeStep {
    fn name(&self) -> &str {
        "anonymize"
    }

    async fn run(&self, ctx: &mut StepContext) -> Result<()> {
        let input = ctx.require(&self.input_key)?;

        let result = self
            .anonymizer
            .anonymize_detailed(input)
            .map_err(|e| VeilError::Anonymization(e.to_string()))?;

        tracing::debug!(
            detections = result.total_detections(),
            duration_ms = result.processing_time_ms,
            output_key = %self.output_key,
            "Anonymize step completed"
        );

        ctx.insert(&self.output_key, result.text);
        Ok(())
    }
}
