use erpforge_types::StageError;
use erpforge_workspace::WorkspaceError;
use thiserror::Error;

use crate::storage::StorageError;

/// Failure taxonomy for pipeline operations.
///
/// Every failure is local to one project and one request. External-service
/// failures (timeouts, rate limits) surface as generation failures; they
/// never crash the process or touch project state.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Operation requested while the project is not in a compatible state.
    /// Reported before any external call is made.
    #[error("Precondition failed: {0}")]
    Precondition(#[from] StageError),

    /// Agent output could not be parsed or validated within the retry
    /// budget, or the model call itself failed. Carries the last raw
    /// output for diagnostics when there is one.
    #[error("Generation failed: {message}")]
    Generation {
        message: String,
        raw_output: Option<String>,
    },

    /// Unsafe path or write error; the whole batch was rejected.
    #[error("Materialization failed: {0}")]
    Materialization(#[from] WorkspaceError),

    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Project not found: {0}")]
    ProjectNotFound(uuid::Uuid),
}

impl PipelineError {
    pub fn generation<S: Into<String>>(message: S, raw_output: Option<String>) -> Self {
        Self::Generation {
            message: message.into(),
            raw_output,
        }
    }
}

impl From<erpforge_llm_sdk::LlmError> for PipelineError {
    fn from(err: erpforge_llm_sdk::LlmError) -> Self {
        Self::Generation {
            message: err.to_string(),
            raw_output: None,
        }
    }
}
