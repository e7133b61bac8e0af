use std::sync::Arc;

use erpforge_llm_sdk::client::EmbeddingClient;
use erpforge_types::Chunk;
use uuid::Uuid;

use crate::rag::index::VectorIndex;

/// Default number of chunks retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

/// Best-effort retrieval over a project's ingested documents.
///
/// Retrieval is augmentation, never a hard dependency: an embedding or
/// index failure degrades to an empty result rather than failing the
/// request that triggered it.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingClient>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Top-k chunks for the query, scoped to the project. Empty on any
    /// upstream failure.
    pub async fn retrieve(&self, project_id: Uuid, query: &str) -> Vec<Chunk> {
        let vector = match self.embedder.embed_query(query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(project_id = %project_id, error = %e, "query embedding failed, proceeding without retrieved context");
                return Vec::new();
            }
        };

        match self.index.search(project_id, &vector, self.top_k).await {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::warn!(project_id = %project_id, error = %e, "index search failed, proceeding without retrieved context");
                Vec::new()
            }
        }
    }
}
