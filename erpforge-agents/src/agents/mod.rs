//! The four pipeline agents.
//!
//! Each agent owns its system prompt and output contract; none of them
//! touch storage or the filesystem. The PM agent converses and produces
//! the PRD, the backend and frontend agents each return one structured
//! file batch, and the QA agent returns test files plus findings.

mod backend;
mod frontend;
mod pm;
mod qa;

pub use backend::BackendAgent;
pub use frontend::FrontendAgent;
pub use pm::PmAgent;
pub use qa::{QaAgent, QaOutput};

use erpforge_workspace::GeneratedFile;
use serde::Deserialize;

/// Output contract for the backend and frontend agents
#[derive(Debug, Deserialize)]
pub struct FileBatch {
    pub files: Vec<GeneratedFile>,
}

pub(crate) const FILE_BATCH_SHAPE: &str =
    r#"{"files": [{"path": "relative/file/path", "content": "full file content"}]}"#;
