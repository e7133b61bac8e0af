use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use erpforge_types::Chunk;
use uuid::Uuid;

use crate::storage::StorageError;

/// Project-scoped vector store.
///
/// Every query carries a project id and only that project's chunks are
/// candidates. Similarity is cosine, matching the metric embeddings were
/// indexed under.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn add_chunks(&self, chunks: Vec<Chunk>) -> Result<(), StorageError>;

    /// Drop every chunk belonging to one document
    async fn remove_document(&self, document_id: Uuid) -> Result<(), StorageError>;

    /// Drop every chunk belonging to one project
    async fn remove_project(&self, project_id: Uuid) -> Result<(), StorageError>;

    /// Top-k chunks for the query vector within the project scope,
    /// most similar first.
    async fn search(
        &self,
        project_id: Uuid,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<Chunk>, StorageError>;
}

/// Cosine similarity; zero vectors and dimension mismatches score 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Exhaustive-scan index held in memory, keyed by project
#[derive(Clone, Default)]
pub struct InMemoryIndex {
    chunks: Arc<Mutex<HashMap<Uuid, Vec<Chunk>>>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn add_chunks(&self, chunks: Vec<Chunk>) -> Result<(), StorageError> {
        let mut map = self.chunks.lock().unwrap();
        for chunk in chunks {
            map.entry(chunk.project_id).or_default().push(chunk);
        }
        Ok(())
    }

    async fn remove_document(&self, document_id: Uuid) -> Result<(), StorageError> {
        let mut map = self.chunks.lock().unwrap();
        for chunks in map.values_mut() {
            chunks.retain(|c| c.document_id != document_id);
        }
        Ok(())
    }

    async fn remove_project(&self, project_id: Uuid) -> Result<(), StorageError> {
        self.chunks.lock().unwrap().remove(&project_id);
        Ok(())
    }

    async fn search(
        &self,
        project_id: Uuid,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<Chunk>, StorageError> {
        let map = self.chunks.lock().unwrap();
        let Some(candidates) = map.get(&project_id) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<(f32, &Chunk)> = candidates
            .iter()
            .map(|c| (cosine_similarity(query, &c.embedding), c))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored.into_iter().take(k).map(|(_, c)| c.clone()).collect())
    }
}
