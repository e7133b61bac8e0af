use crate::{
    error::LlmError,
    types::{CompletionRequest, CompletionResponse},
};
use async_trait::async_trait;

/// Core trait for LLM clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a request (non-streaming)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Get provider name (e.g., "anthropic")
    fn provider_name(&self) -> &str;

    /// Get model name (e.g., "claude-sonnet-4-5")
    fn model_name(&self) -> &str;
}

/// Trait for text embedding providers
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed a batch of document texts, one vector per input in order
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, LlmError>;

    /// Embed a retrieval query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError>;

    /// Get provider name (e.g., "voyage")
    fn provider_name(&self) -> &str;
}
