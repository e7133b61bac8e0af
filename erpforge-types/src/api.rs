use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Standard error response returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Project as rendered over the wire. Ids are plain strings so the
/// generated TypeScript stays free of custom scalar types.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub stage: String,
    pub backend_done: bool,
    pub frontend_done: bool,
    pub qa_done: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectSummary>,
}

/// One user turn of the requirements conversation
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatResponse {
    pub reply: String,
    pub stage: String,
    /// Set when the assistant's reply suggests the conversation has enough
    /// detail to generate a PRD.
    pub prd_suggested: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeneratePrdResponse {
    pub prd: serde_json::Value,
    pub stage: String,
}

/// Result of a backend/frontend/QA agent run
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgentRunResponse {
    pub agent: String,
    pub files: Vec<String>,
    pub stage: String,
    #[serde(default)]
    pub findings: Vec<serde_json::Value>,
}

/// Reference document upload, file content base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UploadDocumentRequest {
    pub filename: String,
    pub content_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UploadDocumentResponse {
    pub document_id: String,
    pub filename: String,
    pub chunks: i64,
}

/// Node in a project's generated file tree
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub children: Vec<FileNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileContent {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WriteFileRequest {
    pub path: String,
    pub content: String,
}
