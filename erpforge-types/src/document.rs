use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ingested reference document. Immutable once stored; uploading a file
/// with the same name supersedes the old document and its chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub project_id: Uuid,
    pub filename: String,
    pub text: String,
    pub uploaded_at: i64,
}

impl Document {
    pub fn new(project_id: Uuid, filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            filename: filename.into(),
            text: text.into(),
            uploaded_at: Utc::now().timestamp(),
        }
    }
}

/// A bounded text span of a document, the unit of embedding and retrieval.
/// Chunks carry their project scope so index queries never cross projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub project_id: Uuid,
    pub seq: i64,
    pub text: String,
    pub embedding: Vec<f32>,
}
