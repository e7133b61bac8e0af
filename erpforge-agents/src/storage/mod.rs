//! Persistence seam for the pipeline.
//!
//! The orchestrator only sees [`ProjectStore`]; the API crate provides a
//! SQLite-backed implementation and tests use [`InMemoryStore`].

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use erpforge_types::{AgentKind, ChatMessage, Document, Prd, Project, QaReport};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use memory::InMemoryStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One file an agent wrote into the project workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedFileRecord {
    pub project_id: Uuid,
    pub agent: AgentKind,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the pipeline persists, keyed by project.
///
/// Deleting a project cascades to its messages, documents, PRD, QA report
/// and file manifest.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, project: &Project) -> Result<(), StorageError>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StorageError>;
    async fn list_projects(&self) -> Result<Vec<Project>, StorageError>;
    async fn update_project(&self, project: &Project) -> Result<(), StorageError>;
    async fn delete_project(&self, id: Uuid) -> Result<(), StorageError>;

    async fn append_message(&self, message: &ChatMessage) -> Result<(), StorageError>;
    /// Messages in chronological order
    async fn get_messages(&self, project_id: Uuid) -> Result<Vec<ChatMessage>, StorageError>;

    /// Store a document; a previous document with the same filename in the
    /// same project is replaced, and its id is returned so the caller can
    /// evict its chunks from the index.
    async fn upsert_document(&self, document: &Document) -> Result<Option<Uuid>, StorageError>;
    async fn get_documents(&self, project_id: Uuid) -> Result<Vec<Document>, StorageError>;

    async fn set_prd(&self, project_id: Uuid, prd: &Prd) -> Result<(), StorageError>;
    async fn get_prd(&self, project_id: Uuid) -> Result<Option<Prd>, StorageError>;

    async fn set_qa_report(&self, report: &QaReport) -> Result<(), StorageError>;
    async fn get_qa_report(&self, project_id: Uuid) -> Result<Option<QaReport>, StorageError>;

    /// Replace the manifest entries for one agent in one project
    async fn record_generated_files(
        &self,
        project_id: Uuid,
        agent: AgentKind,
        paths: &[String],
    ) -> Result<(), StorageError>;
    async fn get_generated_files(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<GeneratedFileRecord>, StorageError>;
}
