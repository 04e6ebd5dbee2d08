//! Language-model invocation step
//!
//! The model boundary is a prompt string in and a completion string out.
//! [`ChatCompletionsClient`] speaks the OpenAI-compatible chat completions
//! protocol; anything else can plug in behind [`LlmClient`].

use super::{Step, StepContext};
use crate::config::LlmConfig;
use crate::domain::{LlmError, Result, VeilError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Default input key for the prompt
pub const DEFAULT_INPUT_KEY: &str = "prompt";
/// Default output key for the completion
pub const DEFAULT_OUTPUT_KEY: &str = "completion";

/// Trait for language-model clients
///
/// Consumes a prompt string, produces a completion string. Retries and
/// transport details are the implementation's concern.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Request one completion for a prompt
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// OpenAI-compatible chat completions client
///
/// Sends the prompt as a single user message and returns the first
/// choice's content. Retryable failures (connection errors, timeouts,
/// 429, 5xx) are retried with exponential backoff up to the configured
/// maximum.
pub struct ChatCompletionsClient {
    config: LlmConfig,
    client: Client,
}

impl ChatCompletionsClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                VeilError::Llm(LlmError::ConnectionFailed(format!(
                    "Failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base);
        format!("{base}/v1/chat/completions")
    }

    async fn send_once(&self, prompt: &str) -> std::result::Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(ref api_key) = self.config.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(e.to_string())
            } else {
                LlmError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let parsed: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
                parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
                    .ok_or_else(|| {
                        LlmError::InvalidResponse("Response contained no choices".to_string())
                    })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(LlmError::AuthenticationFailed(format!(
                    "Endpoint returned {status}"
                )))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string();
                Err(LlmError::RateLimitExceeded(retry_after))
            }
            s if s.is_server_error() => {
                let message = response.text().await.unwrap_or_default();
                Err(LlmError::ServerError {
                    status: s.as_u16(),
                    message,
                })
            }
            s => {
                let message = response.text().await.unwrap_or_default();
                Err(LlmError::ClientError {
                    status: s.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(prompt).await {
                Ok(completion) => {
                    tracing::debug!(
                        model = %self.config.model,
                        completion_len = completion.len(),
                        "Completion received"
                    );
                    return Ok(completion);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let backoff = backoff_delay(self.config.initial_backoff_ms, attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = self.config.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Retrying LLM request"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(VeilError::Llm(e)),
            }
        }
    }
}

/// Exponential backoff, exponent capped so large retry counts cannot
/// overflow the shift
fn backoff_delay(initial_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(initial_ms.saturating_mul(1u64 << attempt.min(31)))
}

/// Pipeline step invoking an [`LlmClient`]
pub struct LlmStep {
    client: Arc<dyn LlmClient>,
    input_key: String,
    output_key: String,
}

impl LlmStep {
    /// Create a step with the default keys (`prompt` -> `completion`)
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
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
impl Step for LlmStep {
    fn name(&self) -> &str {
        "llm"
    }

    async fn run(&self, ctx: &mut StepContext) -> Result<()> {
        let prompt = ctx.require(&self.input_key)?.to_string();
        let completion = self.client.complete(&prompt).await?;
        ctx.insert(&self.output_key, completion);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> LlmConfig {
        LlmConfig {
            base_url,
            model: "test-model".to_string(),
            api_key: Some(crate::config::secret_string("sk-test".to_string())),
            timeout_seconds: 5,
            max_retries: 1,
            initial_backoff_ms: 10,
        }
    }

    fn completion_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[test]
    fn test_backoff_delay_doubles_per_attempt() {
        assert_eq!(backoff_delay(250, 0), Duration::from_millis(250));
        assert_eq!(backoff_delay(250, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(250, 3), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_delay_saturates_for_large_attempts() {
        // Attempts past the exponent cap must not overflow
        assert_eq!(backoff_delay(u64::MAX, 200), Duration::from_millis(u64::MAX));
        assert_eq!(backoff_delay(0, 200), Duration::from_millis(0));
        assert!(backoff_delay(250, 64) >= backoff_delay(250, 31));
    }

    #[test]
    fn test_endpoint_appends_api_path() {
        let client =
            ChatCompletionsClient::new(test_config("https://api.openai.com".to_string())).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_endpoint_tolerates_v1_suffix() {
        for base in ["https://host/v1", "https://host/v1/", "https://host/"] {
            let client = ChatCompletionsClient::new(test_config(base.to_string())).unwrap();
            assert_eq!(client.endpoint(), "https://host/v1/chat/completions");
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("It never rains in Warsaw."))
            .create_async()
            .await;

        let client = ChatCompletionsClient::new(test_config(server.url())).unwrap();
        let completion = client.complete("How is the weather?").await.unwrap();

        assert_eq!(completion, "It never rains in Warsaw.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .create_async()
            .await;

        let client = ChatCompletionsClient::new(test_config(server.url())).unwrap();
        let err = client.complete("hello").await.unwrap_err();

        assert!(matches!(
            err,
            VeilError::Llm(LlmError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_retries_server_errors() {
        let mut server = mockito::Server::new_async().await;
        // max_retries = 1, so a persistent 503 is attempted exactly twice
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let client = ChatCompletionsClient::new(test_config(server.url())).unwrap();
        let err = client.complete("hello").await.unwrap_err();

        assert!(matches!(
            err,
            VeilError::Llm(LlmError::ServerError { status: 503, .. })
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_rejects_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = ChatCompletionsClient::new(test_config(server.url())).unwrap();
        let err = client.complete("hello").await.unwrap_err();

        assert!(matches!(err, VeilError::Llm(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_llm_step_writes_completion() {
        struct EchoClient;

        #[async_trait]
        impl LlmClient for EchoClient {
            async fn complete(&self, prompt: &str) -> Result<String> {
                Ok(format!("echo: {prompt}"))
            }
        }

        let step = LlmStep::new(Arc::new(EchoClient));
        let mut ctx = StepContext::with_input("prompt", "hello");

        step.run(&mut ctx).await.unwrap();
        assert_eq!(ctx.get("completion"), Some("echo: hello"));
    }
}
