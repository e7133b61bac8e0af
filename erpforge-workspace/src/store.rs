use std::fs;
use std::path::{Component, Path, PathBuf};

use erpforge_types::FileNode;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::WorkspaceError;

/// Subdirectories seeded into every fresh project workspace.
const SKELETON_DIRS: &[&str] = &["backend", "frontend", "tests", "docs"];

/// Root of all project workspaces. Each project gets its own
/// `project_<id>` directory; nothing outside it is ever touched on that
/// project's behalf.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute directory for one project's files
    pub fn project_root(&self, project_id: Uuid) -> PathBuf {
        self.root.join(format!("project_{}", project_id))
    }

    /// Create the project directory with its skeleton subdirectories.
    /// Idempotent.
    pub fn init_project(&self, project_id: Uuid) -> Result<PathBuf, WorkspaceError> {
        let root = self.project_root(project_id);
        for dir in SKELETON_DIRS {
            let path = root.join(dir);
            fs::create_dir_all(&path).map_err(|e| WorkspaceError::io(&path, e))?;
        }
        Ok(root)
    }

    /// Resolve a client-supplied relative path inside the project root.
    ///
    /// Absolute paths and any `..` component are rejected outright rather
    /// than normalized, so a hostile path never reaches the filesystem.
    pub fn resolve(&self, project_id: Uuid, relative: &str) -> Result<PathBuf, WorkspaceError> {
        let candidate = Path::new(relative);
        if candidate.is_absolute() {
            return Err(WorkspaceError::PathEscape {
                path: relative.to_string(),
            });
        }
        for component in candidate.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(WorkspaceError::PathEscape {
                        path: relative.to_string(),
                    });
                }
            }
        }
        Ok(self.project_root(project_id).join(candidate))
    }

    pub fn write_file(
        &self,
        project_id: Uuid,
        relative: &str,
        content: &str,
    ) -> Result<PathBuf, WorkspaceError> {
        let path = self.resolve(project_id, relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| WorkspaceError::io(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| WorkspaceError::io(&path, e))?;
        Ok(path)
    }

    pub fn read_file(&self, project_id: Uuid, relative: &str) -> Result<String, WorkspaceError> {
        let path = self.resolve(project_id, relative)?;
        if !path.is_file() {
            return Err(WorkspaceError::NotFound { path });
        }
        fs::read_to_string(&path).map_err(|e| WorkspaceError::io(&path, e))
    }

    /// Relative paths of all regular files under the given subdirectory
    /// ("" for the whole project), sorted for stable output.
    pub fn list_files(
        &self,
        project_id: Uuid,
        subdir: &str,
    ) -> Result<Vec<String>, WorkspaceError> {
        let base = self.resolve(project_id, subdir)?;
        let project_root = self.project_root(project_id);
        if !base.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&base).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                if let Ok(rel) = entry.path().strip_prefix(&project_root) {
                    files.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Directory tree of the project as nested [`FileNode`]s
    pub fn file_tree(&self, project_id: Uuid) -> Result<Vec<FileNode>, WorkspaceError> {
        let root = self.project_root(project_id);
        if !root.is_dir() {
            return Err(WorkspaceError::NotFound { path: root });
        }
        build_tree(&root, &root)
    }

    /// Remove a project's entire directory. Missing directories are fine.
    pub fn delete_project(&self, project_id: Uuid) -> Result<(), WorkspaceError> {
        let root = self.project_root(project_id);
        if root.exists() {
            fs::remove_dir_all(&root).map_err(|e| WorkspaceError::io(&root, e))?;
        }
        Ok(())
    }
}

fn build_tree(dir: &Path, project_root: &Path) -> Result<Vec<FileNode>, WorkspaceError> {
    let mut nodes = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| WorkspaceError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| WorkspaceError::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        // Staging directories are an implementation detail
        if name.starts_with(".staging-") {
            continue;
        }
        let rel = path
            .strip_prefix(project_root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        if path.is_dir() {
            nodes.push(FileNode {
                name,
                path: rel,
                is_dir: true,
                children: build_tree(&path, project_root)?,
            });
        } else {
            nodes.push(FileNode {
                name,
                path: rel,
                is_dir: false,
                children: Vec::new(),
            });
        }
    }

    nodes.sort_by(|a, b| (b.is_dir, &a.name).cmp(&(a.is_dir, &b.name)));
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn init_project_creates_skeleton() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();
        let root = store.init_project(id).unwrap();

        for sub in SKELETON_DIRS {
            assert!(root.join(sub).is_dir(), "missing {}", sub);
        }
    }

    #[test]
    fn write_and_read_roundtrip() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();
        store.init_project(id).unwrap();

        store
            .write_file(id, "backend/main.py", "print('hi')")
            .unwrap();
        let content = store.read_file(id, "backend/main.py").unwrap();
        assert_eq!(content, "print('hi')");
    }

    #[test]
    fn rejects_absolute_paths() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();
        let err = store.resolve(id, "/etc/passwd").unwrap_err();
        assert!(matches!(err, WorkspaceError::PathEscape { .. }));
    }

    #[test]
    fn rejects_parent_traversal() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();
        for path in ["../outside.txt", "backend/../../outside.txt", ".."] {
            let err = store.resolve(id, path).unwrap_err();
            assert!(matches!(err, WorkspaceError::PathEscape { .. }), "{}", path);
        }
    }

    #[test]
    fn list_files_is_sorted_and_relative() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();
        store.init_project(id).unwrap();
        store.write_file(id, "backend/models.py", "").unwrap();
        store.write_file(id, "backend/app.py", "").unwrap();

        let files = store.list_files(id, "backend").unwrap();
        assert_eq!(files, vec!["backend/app.py", "backend/models.py"]);
    }

    #[test]
    fn file_tree_skips_staging_dirs() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();
        store.init_project(id).unwrap();
        store.write_file(id, "backend/app.py", "x").unwrap();
        fs::create_dir_all(store.project_root(id).join(".staging-abc")).unwrap();

        let tree = store.file_tree(id).unwrap();
        assert!(tree.iter().all(|n| !n.name.starts_with(".staging-")));
    }

    #[test]
    fn delete_project_is_idempotent() {
        let (_dir, store) = store();
        let id = Uuid::new_v4();
        store.init_project(id).unwrap();
        store.delete_project(id).unwrap();
        store.delete_project(id).unwrap();
        assert!(!store.project_root(id).exists());
    }
}
