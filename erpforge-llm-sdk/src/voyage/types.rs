use serde::{Deserialize, Serialize};

/// Input type for embedding requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoyageInputType {
    /// Query input - prepends "Represent the query for retrieving supporting documents: "
    Query,
    /// Document input - prepends "Represent the document for retrieval: "
    Document,
}

/// Input for embedding request - can be a single string or array of strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoyageInput {
    /// Single text string
    Single(String),
    /// Multiple text strings
    Multiple(Vec<String>),
}

impl From<String> for VoyageInput {
    fn from(s: String) -> Self {
        VoyageInput::Single(s)
    }
}

impl From<&str> for VoyageInput {
    fn from(s: &str) -> Self {
        VoyageInput::Single(s.to_string())
    }
}

impl From<Vec<String>> for VoyageInput {
    fn from(v: Vec<String>) -> Self {
        VoyageInput::Multiple(v)
    }
}

/// Request for creating embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyageEmbeddingRequest {
    /// A single text string or a list of texts
    pub input: VoyageInput,

    /// Name of the model (e.g., "voyage-4-lite")
    pub model: String,

    /// Type of input text (query, document, or null for direct conversion)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<VoyageInputType>,

    /// Whether to truncate input texts to fit context length (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<bool>,

    /// Output embedding dimensions (256, 512, 1024 (default), or 2048)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dimension: Option<u32>,
}

/// Single embedding object in the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageEmbedding {
    /// Always "embedding"
    pub object: String,

    /// The embedding vector (array of numbers)
    pub embedding: Vec<f32>,

    /// Index of this embedding in the list
    pub index: usize,
}

/// Token usage information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoyageUsage {
    /// Total number of tokens used for computing embeddings
    pub total_tokens: u32,
}

/// Response from the embeddings API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageEmbeddingResponse {
    /// Always "list"
    pub object: String,

    /// Array of embedding objects
    pub data: Vec<VoyageEmbedding>,

    /// Name of the model used
    pub model: String,

    /// Token usage information
    pub usage: VoyageUsage,
}

/// Error response from Voyage API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageErrorResponse {
    /// Error message
    pub detail: String,
}
