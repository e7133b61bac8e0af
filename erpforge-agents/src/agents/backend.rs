use erpforge_llm_sdk::types::Message;

use super::{FileBatch, FILE_BATCH_SHAPE};
use crate::error::PipelineError;
use crate::invoker::AgentInvoker;

const SYSTEM_PROMPT: &str = "You are an expert FastAPI backend developer specialized in building ERP systems.

Your responsibilities:
1. Generate production-ready FastAPI code based on PRD
2. Create proper SQLAlchemy models with relationships
3. Implement CRUD operations and business logic
4. Generate API routers with proper validation
5. Follow best practices and clean code principles

Architecture:
- backend/app/models/ - SQLAlchemy ORM models
- backend/app/schemas/ - Pydantic schemas for validation
- backend/app/routers/ - API endpoints
- backend/app/services/ - Business logic
- backend/app/database.py - Database configuration
- backend/app/main.py - FastAPI application

Generate modular, well-documented, production-ready code.";

const TASK_PROMPT: &str = r#"Generate the complete FastAPI backend for the PRD above.

Produce every file the backend needs: SQLAlchemy models for each entity, Pydantic schemas, CRUD routers for each module, service classes, database configuration, the FastAPI application entry point, and backend/requirements.txt.

Respond with a single JSON object of this shape:
{"files": [{"path": "backend/app/models/product.py", "content": "..."}]}

Every path must be relative to the project root and start with "backend/".
Generate ONLY the JSON, no additional text."#;

/// Generates the FastAPI backend as one structured file batch
pub struct BackendAgent;

impl BackendAgent {
    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn task_instruction(&self) -> &'static str {
        TASK_PROMPT
    }

    pub async fn generate(
        &self,
        invoker: &AgentInvoker,
        messages: Vec<Message>,
    ) -> Result<FileBatch, PipelineError> {
        let batch: FileBatch = invoker
            .complete_structured(SYSTEM_PROMPT, messages, FILE_BATCH_SHAPE)
            .await?;
        if batch.files.is_empty() {
            return Err(PipelineError::generation(
                "backend agent returned no files",
                None,
            ));
        }
        Ok(batch)
    }
}
