use std::sync::Arc;
use std::time::Duration;

use erpforge_llm_sdk::client::LlmClient;
use erpforge_llm_sdk::types::{CompletionRequest, Message};
use serde::de::DeserializeOwned;

use crate::error::PipelineError;

/// Default deadline for one model call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_MAX_TOKENS: u32 = 8000;
const STRUCTURED_TEMPERATURE: f32 = 0.3;

/// Executes agent model calls with the pipeline's fault policy.
///
/// Structured outputs get exactly two attempts: on a parse failure the raw
/// output and a corrective instruction are appended and the call is retried
/// once. The second failure is surfaced as a generation failure carrying
/// the last raw output. Every call runs under a timeout; hitting it is a
/// generation failure, never a partial result.
pub struct AgentInvoker {
    client: Arc<dyn LlmClient>,
    timeout: Duration,
    max_tokens: u32,
}

impl AgentInvoker {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One free-text completion (conversational replies)
    pub async fn complete_text(
        &self,
        system: &str,
        messages: Vec<Message>,
    ) -> Result<String, PipelineError> {
        let response = self.call(system, messages, None).await?;
        Ok(response)
    }

    /// One structured completion, parsed into `T`, with the bounded retry.
    /// `expected_shape` describes the contract for the corrective message.
    pub async fn complete_structured<T: DeserializeOwned>(
        &self,
        system: &str,
        mut messages: Vec<Message>,
        expected_shape: &str,
    ) -> Result<T, PipelineError> {
        let mut last_raw = String::new();

        for attempt in 1..=2u32 {
            let text = self.call(system, messages.clone(), Some(STRUCTURED_TEMPERATURE)).await?;
            let cleaned = strip_code_fences(&text);

            match serde_json::from_str::<T>(cleaned) {
                Ok(value) => return Ok(value),
                Err(parse_error) => {
                    tracing::warn!(attempt, error = %parse_error, "structured output failed validation");
                    last_raw = text.clone();

                    if attempt == 1 {
                        messages.push(Message::assistant(text));
                        messages.push(Message::user(format!(
                            "Your response was invalid. Error: {}\n\nPlease respond with valid JSON matching this shape: {}\nReturn ONLY the JSON, nothing else.",
                            parse_error, expected_shape
                        )));
                    }
                }
            }
        }

        Err(PipelineError::generation(
            "structured output failed validation after 2 attempts",
            Some(last_raw),
        ))
    }

    async fn call(
        &self,
        system: &str,
        messages: Vec<Message>,
        temperature: Option<f32>,
    ) -> Result<String, PipelineError> {
        let mut request =
            CompletionRequest::new(self.client.model_name(), messages, self.max_tokens)
                .with_system(system);
        if let Some(t) = temperature {
            request = request.with_temperature(t);
        }

        let result = tokio::time::timeout(self.timeout, self.client.complete(request)).await;

        match result {
            Ok(Ok(response)) => Ok(response.text()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(PipelineError::generation(
                format!("model call timed out after {}s", self.timeout.as_secs()),
                None,
            )),
        }
    }
}

/// Strip a surrounding markdown code fence from model output.
/// Models wrap JSON in ```json fences despite instructions not to.
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    for prefix in ["```json", "```python", "```"] {
        if let Some(rest) = cleaned.strip_prefix(prefix) {
            cleaned = rest;
            break;
        }
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}
