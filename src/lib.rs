// Veil - PII anonymization for LLM prompt pipelines
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - PII anonymization for LLM prompt pipelines
//!
//! Veil detects and replaces PII in free text before the text is
//! substituted into a prompt and sent to a language-model endpoint.
//!
//! ## Overview
//!
//! This library provides:
//! - **Detection** of PII spans via an extensible regex recognizer registry
//! - **Replacement** via a category-keyed operator table (custom callbacks,
//!   fake-value providers, or `<CATEGORY_NAME>` placeholders)
//! - **Pipelining** of anonymize -> prompt-format -> LLM-call steps
//! - **Auditing** of anonymization operations with hashed values
//!
//! ## Architecture
//!
//! Veil follows a layered architecture:
//!
//! - [`anonymization`] - Detection, operators, and the [`Anonymizer`] facade
//! - [`pipeline`] - Named-input/named-output transform steps and the chain
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use veil::anonymization::{Anonymizer, AnonymizerConfig, Operator, RecognizerRule};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut anonymizer = Anonymizer::new(AnonymizerConfig::default())?;
//!
//! // Built-in recognizers fall back to placeholder tokens
//! let output = anonymizer.anonymize("Email me at jane@example.com")?;
//! assert_eq!(output, "Email me at <EMAIL_ADDRESS>");
//!
//! // A custom recognizer plus a custom operator
//! anonymizer.add_recognizer(RecognizerRule::new(
//!     "polish_phone",
//!     "PHONE_NUMBER",
//!     r"\b\d{9}\b",
//!     0.9,
//! ))?;
//! anonymizer.add_operator("PHONE_NUMBER", Operator::fixed("+48 000 000 000"));
//!
//! let output = anonymizer.anonymize("My polish phone number is 666555444")?;
//! assert_eq!(output, "My polish phone number is +48 000 000 000");
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipelines
//!
//! The anonymizer composes with a prompt template and an LLM call as a
//! sequential chain:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use veil::anonymization::{Anonymizer, AnonymizerConfig};
//! use veil::config::LlmConfig;
//! use veil::pipeline::{
//!     AnonymizeStep, Chain, ChatCompletionsClient, LlmStep, PromptStep, PromptTemplate,
//!     StepContext,
//! };
//!
//! # async fn example(llm_config: LlmConfig) -> veil::domain::Result<()> {
//! let anonymizer = Arc::new(
//!     Anonymizer::new(AnonymizerConfig::default())
//!         .map_err(|e| veil::domain::VeilError::Anonymization(e.to_string()))?,
//! );
//! let llm = Arc::new(ChatCompletionsClient::new(llm_config)?);
//!
//! let chain = Chain::new()
//!     .push(AnonymizeStep::new(anonymizer))
//!     .push(PromptStep::new(PromptTemplate::new(
//!         "Answer the question: {anonymized_text}",
//!     )))
//!     .push(LlmStep::new(llm));
//!
//! let mut ctx = StepContext::with_input("text", "Where does jane@example.com work?");
//! chain.run(&mut ctx).await?;
//! println!("{}", ctx.require("completion")?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Known limitation
//!
//! Replacement is independent per detected span: the same phone number
//! appearing twice in one text may be replaced with two different fake
//! values. Cross-occurrence consistency is future work.

pub mod anonymization;
pub mod config;
pub mod domain;
pub mod logging;
pub mod pipeline;

// Re-export the facade at the crate root
pub use anonymization::Anonymizer;
