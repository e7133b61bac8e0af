//! Agent orchestration and retrieval pipeline.
//!
//! This crate holds the substance of the system: the chunker and vector
//! retrieval layer, the context assembler, the bounded-retry agent invoker,
//! the four agents (PM, backend, frontend, QA), the static QA validator,
//! and the [`Orchestrator`] that sequences them against the project state
//! machine. Persistence and HTTP live behind traits; the pipeline itself
//! has no I/O beyond the model and embedding clients it is given.

pub mod agents;
pub mod context;
pub mod error;
pub mod invoker;
pub mod orchestrator;
pub mod rag;
pub mod storage;
pub mod validator;

pub use error::PipelineError;
pub use invoker::AgentInvoker;
pub use orchestrator::{AgentRun, ChatReply, IngestResult, Orchestrator};
pub use storage::{InMemoryStore, ProjectStore, StorageError};
