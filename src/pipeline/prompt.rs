//! Prompt-formatting pipeline step

use super::{Step, StepContext};
use crate::domain::{Result, VeilError};
use async_trait::async_trait;
use regex::Regex;

/// Default output key for the rendered prompt
pub const DEFAULT_OUTPUT_KEY: &str = "prompt";

/// A prompt template with `{key}` placeholders
///
/// Every placeholder must resolve against the context when rendered;
/// unresolved placeholders are an error rather than passed through.
///
/// # Examples
///
/// ```
/// use veil::pipeline::{PromptTemplate, StepContext};
///
/// let template = PromptTemplate::new("Answer the question: {anonymized_text}");
/// let ctx = StepContext::with_input("anonymized_text", "Where is <PERSON> from?");
///
/// let prompt = template.render(&ctx).unwrap();
/// assert_eq!(prompt, "Answer the question: Where is <PERSON> from?");
/// ```
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render the template against a context
    ///
    /// # Errors
    ///
    /// Returns a template error naming the first placeholder the context
    /// does not provide.
    pub fn render(&self, ctx: &StepContext) -> Result<String> {
        let re = Regex::new(r"\{([A-Za-z0-9_]+)\}")
            .map_err(|e| VeilError::Template(format!("Invalid placeholder regex: {e}")))?;

        let mut missing: Option<String> = None;
        let rendered = re.replace_all(&self.template, |caps: &regex::Captures| {
            let key = &caps[1];
            match ctx.get(key) {
                Some(value) => value.to_string(),
                None => {
                    if missing.is_none() {
                        missing = Some(key.to_string());
                    }
                    String::new()
                }
            }
        });

        if let Some(key) = missing {
            return Err(VeilError::Template(format!(
                "Template placeholder '{{{key}}}' has no value in the context"
            )));
        }

        Ok(rendered.into_owned())
    }

    /// The raw template string
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Pipeline step rendering a [`PromptTemplate`] into the context
pub struct PromptStep {
    template: PromptTemplate,
    output_key: String,
}

impl PromptStep {
    /// Create a step writing to the default `prompt` key
    pub fn new(template: PromptTemplate) -> Self {
        Self {
            template,
            output_key: DEFAULT_OUTPUT_KEY.to_string(),
        }
    }

    /// Override the output key
    pub fn with_output_key(mut self, output_key: impl Into<String>) -> Self {
        self.output_key = output_key.into();
        self
    }
}

#[async_trait]
impl Step for PromptStep {
    fn name(&self) -> &str {
        "prompt"
    }

    async fn run(&self, ctx: &mut StepContext) -> Result<()> {
        let prompt = self.template.render(ctx)?;
        tracing::debug!(
            prompt_len = prompt.len(),
            output_key = %self.output_key,
            "Prompt rendered"
        );
        ctx.insert(&self.output_key, prompt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_placeholder() {
        let template = PromptTemplate::new("Q: {question}");
        let ctx = StepContext::with_input("question", "why?");
        assert_eq!(template.render(&ctx).unwrap(), "Q: why?");
    }

    #[test]
    fn test_render_multiple_placeholders() {
        let template = PromptTemplate::new("{system}\n\nUser: {question}");
        let mut ctx = StepContext::with_input("system", "Be terse.");
        ctx.insert("question", "why?");
        assert_eq!(template.render(&ctx).unwrap(), "Be terse.\n\nUser: why?");
    }

    #[test]
    fn test_render_missing_placeholder_fails() {
        let template = PromptTemplate::new("Q: {question}");
        let ctx = StepContext::new();
        let err = template.render(&ctx).unwrap_err();
        assert!(matches!(err, VeilError::Template(_)));
        assert!(err.to_string().contains("question"));
    }

    #[test]
    fn test_render_without_placeholders() {
        let template = PromptTemplate::new("static prompt");
        let ctx = StepContext::new();
        assert_eq!(template.render(&ctx).unwrap(), "static prompt");
    }

    #[tokio::test]
    async fn test_prompt_step_writes_output() {
        let step = PromptStep::new(PromptTemplate::new("Echo: {anonymized_text}"));
        let mut ctx = StepContext::with_input("anonymized_text", "<PERSON> called");

        step.run(&mut ctx).await.unwrap();
        assert_eq!(ctx.get("prompt"), Some("Echo: <PERSON> called"));
    }
}
