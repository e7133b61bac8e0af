use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::{
    error::LlmError,
    voyage::types::{
        VoyageEmbeddingRequest, VoyageEmbeddingResponse, VoyageErrorResponse, VoyageInput,
        VoyageInputType,
    },
};

/// Voyage AI client for text embeddings
pub struct VoyageClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl VoyageClient {
    /// Create a new Voyage AI client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300)) // 5 minute timeout
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: "https://api.voyageai.com".to_string(),
            model: crate::models::voyage::VOYAGE_4_LITE_ID.to_string(),
            http_client,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the embedding model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create embeddings for the given input
    pub async fn create_embedding(
        &self,
        request: VoyageEmbeddingRequest,
    ) -> Result<VoyageEmbeddingResponse, LlmError> {
        let url = format!("{}/v1/embeddings", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if status.is_success() {
            let voyage_response: VoyageEmbeddingResponse = response
                .json()
                .await
                .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))?;
            Ok(voyage_response)
        } else {
            // Extract retry-after header before consuming the response
            let retry_after = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                response
                    .headers()
                    .get("retry-after")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
            } else {
                None
            };

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            // Try to parse as Voyage error response
            let message = serde_json::from_str::<VoyageErrorResponse>(&error_text)
                .map(|e| e.detail)
                .unwrap_or(error_text);

            match status {
                reqwest::StatusCode::BAD_REQUEST => Err(LlmError::invalid_request(message)),
                reqwest::StatusCode::UNAUTHORIZED => Err(LlmError::authentication(message)),
                reqwest::StatusCode::FORBIDDEN => Err(LlmError::authentication(message)),
                reqwest::StatusCode::NOT_FOUND => Err(LlmError::api_error(404, message)),
                reqwest::StatusCode::PAYLOAD_TOO_LARGE => {
                    Err(LlmError::invalid_request("Request too large"))
                }
                reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    Err(LlmError::rate_limit(message, retry_after))
                }
                reqwest::StatusCode::INTERNAL_SERVER_ERROR => {
                    Err(LlmError::api_error(500, message))
                }
                _ => Err(LlmError::api_error(status.as_u16(), message)),
            }
        }
    }
}

#[async_trait]
impl crate::client::EmbeddingClient for VoyageClient {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = VoyageEmbeddingRequest {
            input: VoyageInput::Multiple(texts),
            model: self.model.clone(),
            input_type: Some(VoyageInputType::Document),
            truncation: Some(true),
            output_dimension: None,
        };

        let mut response = self.create_embedding(request).await?;
        // The API preserves input order via the index field
        response.data.sort_by_key(|e| e.index);
        Ok(response.data.into_iter().map(|e| e.embedding).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = VoyageEmbeddingRequest {
            input: VoyageInput::Single(text.to_string()),
            model: self.model.clone(),
            input_type: Some(VoyageInputType::Query),
            truncation: Some(true),
            output_dimension: None,
        };

        let response = self.create_embedding(request).await?;
        response
            .data
            .into_iter()
            .next()
            .map(|e| e.embedding)
            .ok_or_else(|| LlmError::internal("Embedding response contained no data"))
    }

    fn provider_name(&self) -> &str {
        crate::providers::VOYAGE
    }
}
