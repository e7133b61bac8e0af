use std::path::PathBuf;
use thiserror::Error;

/// Errors from workspace file operations
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Relative path points outside the project root
    #[error("Path escapes the project workspace: {path}")]
    PathEscape { path: String },

    /// Batch entry wants a file where another entry needs a directory
    #[error("Path conflicts with another file in the batch: {path}")]
    PathConflict { path: String },

    /// Requested file or project directory does not exist
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// Underlying filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text extraction from an uploaded document failed
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    /// Uploaded document has a format we cannot extract text from
    #[error("Unsupported document format: .{extension}")]
    UnsupportedFormat { extension: String },
}

impl WorkspaceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }
}
