//! Per-project file workspace.
//!
//! Every project owns an isolated directory under the workspace root.
//! Generated code only ever lands there via the [`Materializer`], which
//! validates a whole batch before any byte is written.

pub mod error;
pub mod extract;
pub mod materializer;
pub mod store;

pub use error::WorkspaceError;
pub use extract::extract_text;
pub use materializer::{GeneratedFile, Materializer};
pub use store::FileStore;
