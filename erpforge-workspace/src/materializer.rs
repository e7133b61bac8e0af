use std::fs;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WorkspaceError;
use crate::store::FileStore;

/// One file produced by a code-generation agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the project root, e.g. `backend/app.py`
    pub path: String,
    pub content: String,
}

/// Writes agent output batches into a project workspace.
///
/// A batch is all-or-nothing: every path is validated before any write,
/// and the files are first written to a staging directory inside the
/// project root, then moved into place. A failure mid-batch leaves
/// previously materialized files from older runs untouched.
#[derive(Debug, Clone)]
pub struct Materializer {
    store: FileStore,
}

impl Materializer {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    /// Materialize a batch of generated files. Returns the relative paths
    /// written, in input order.
    pub fn materialize(
        &self,
        project_id: Uuid,
        files: &[GeneratedFile],
    ) -> Result<Vec<String>, WorkspaceError> {
        // Reject the whole batch before a single byte hits disk
        let mut targets = Vec::with_capacity(files.len());
        for file in files {
            targets.push(self.store.resolve(project_id, &file.path)?);
        }
        // An entry whose path is a directory prefix of another entry's
        // path cannot land as a file
        for (i, file) in files.iter().enumerate() {
            let shadowed = targets
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && *other != targets[i] && other.starts_with(&targets[i]));
            if shadowed {
                return Err(WorkspaceError::PathConflict {
                    path: file.path.clone(),
                });
            }
        }

        let project_root = self.store.init_project(project_id)?;
        let staging = project_root.join(format!(".staging-{}", Uuid::new_v4()));
        fs::create_dir_all(&staging).map_err(|e| WorkspaceError::io(&staging, e))?;

        let result = self.stage_and_commit(project_id, files, &targets, &staging);

        // Staging dir is always removed, success or not
        let _ = fs::remove_dir_all(&staging);
        result
    }

    fn stage_and_commit(
        &self,
        project_id: Uuid,
        files: &[GeneratedFile],
        targets: &[std::path::PathBuf],
        staging: &std::path::Path,
    ) -> Result<Vec<String>, WorkspaceError> {
        let mut staged = Vec::with_capacity(files.len());
        for (i, file) in files.iter().enumerate() {
            let staged_path = staging.join(i.to_string());
            fs::write(&staged_path, &file.content)
                .map_err(|e| WorkspaceError::io(&staged_path, e))?;
            staged.push(staged_path);
        }

        // All parent directories exist before the first rename, so a
        // failed directory creation cannot leave a partial batch behind
        for target in targets {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| WorkspaceError::io(parent, e))?;
            }
        }

        let mut written = Vec::with_capacity(files.len());
        for ((file, target), staged_path) in files.iter().zip(targets).zip(&staged) {
            // Same filesystem, so rename is atomic per file
            fs::rename(staged_path, target).map_err(|e| WorkspaceError::io(target, e))?;
            tracing::debug!(project_id = %project_id, path = %file.path, "materialized file");
            written.push(file.path.clone());
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore, Materializer) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let materializer = Materializer::new(store.clone());
        (dir, store, materializer)
    }

    fn file(path: &str, content: &str) -> GeneratedFile {
        GeneratedFile {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn materializes_a_batch() {
        let (_dir, store, materializer) = setup();
        let id = Uuid::new_v4();

        let written = materializer
            .materialize(
                id,
                &[
                    file("backend/app.py", "app"),
                    file("backend/models.py", "models"),
                ],
            )
            .unwrap();

        assert_eq!(written, vec!["backend/app.py", "backend/models.py"]);
        assert_eq!(store.read_file(id, "backend/app.py").unwrap(), "app");
        assert_eq!(store.read_file(id, "backend/models.py").unwrap(), "models");
    }

    #[test]
    fn one_bad_path_rejects_whole_batch() {
        let (_dir, store, materializer) = setup();
        let id = Uuid::new_v4();

        let err = materializer
            .materialize(
                id,
                &[
                    file("backend/app.py", "app"),
                    file("../evil.py", "nope"),
                ],
            )
            .unwrap_err();

        assert!(matches!(err, WorkspaceError::PathEscape { .. }));
        // Nothing from the batch was written
        assert!(store.read_file(id, "backend/app.py").is_err());
    }

    #[test]
    fn file_and_directory_conflict_rejects_whole_batch() {
        let (_dir, store, materializer) = setup();
        let id = Uuid::new_v4();

        let err = materializer
            .materialize(id, &[file("a", "file"), file("a/b", "nested")])
            .unwrap_err();

        assert!(matches!(err, WorkspaceError::PathConflict { .. }));
        assert!(store.read_file(id, "a").is_err());
        assert!(store.read_file(id, "a/b").is_err());
    }

    #[test]
    fn conflict_is_detected_regardless_of_batch_order() {
        let (_dir, store, materializer) = setup();
        let id = Uuid::new_v4();

        let err = materializer
            .materialize(id, &[file("a/b", "nested"), file("a", "file")])
            .unwrap_err();

        assert!(matches!(err, WorkspaceError::PathConflict { .. }));
        assert!(store.read_file(id, "a").is_err());
    }

    #[test]
    fn rerun_overwrites_previous_output() {
        let (_dir, store, materializer) = setup();
        let id = Uuid::new_v4();

        materializer
            .materialize(id, &[file("backend/app.py", "v1")])
            .unwrap();
        materializer
            .materialize(id, &[file("backend/app.py", "v2")])
            .unwrap();

        assert_eq!(store.read_file(id, "backend/app.py").unwrap(), "v2");
    }

    #[test]
    fn staging_dir_is_cleaned_up() {
        let (_dir, store, materializer) = setup();
        let id = Uuid::new_v4();

        materializer
            .materialize(id, &[file("frontend/index.html", "<html>")])
            .unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(store.project_root(id))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".staging-"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
