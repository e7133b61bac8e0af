// Shared models for the erpforge orchestrator, API and web frontend.

pub mod api;
pub mod chat;
pub mod document;
pub mod prd;
pub mod project;
pub mod qa;

pub use api::{
    AgentRunResponse, ChatRequest, ChatResponse, CreateProjectRequest, ErrorResponse, FileContent,
    FileNode, GeneratePrdResponse, ProjectListResponse, ProjectSummary, UploadDocumentRequest,
    UploadDocumentResponse, WriteFileRequest,
};
pub use chat::{ChatMessage, MessageRole};
pub use document::{Chunk, Document};
pub use prd::{Prd, PrdEntity, PrdField, PrdModule, PrdRole, PrdWorkflow};
pub use project::{AgentKind, Project, ProjectStage, StageError};
pub use qa::{QaFinding, QaReport, Severity};
