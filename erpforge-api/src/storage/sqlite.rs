use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use erpforge_agents::rag::{cosine_similarity, VectorIndex};
use erpforge_agents::storage::{GeneratedFileRecord, ProjectStore, StorageError};
use erpforge_types::{
    AgentKind, ChatMessage, Chunk, Document, MessageRole, Prd, Project, ProjectStage, QaReport,
};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::DbConnection;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    stage TEXT NOT NULL,
    backend_done INTEGER NOT NULL DEFAULT 0,
    frontend_done INTEGER NOT NULL DEFAULT 0,
    qa_done INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    filename TEXT NOT NULL,
    text TEXT NOT NULL,
    uploaded_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    seq INTEGER NOT NULL,
    text TEXT NOT NULL,
    embedding TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_chunks_project ON chunks(project_id);

CREATE TABLE IF NOT EXISTS prds (
    project_id TEXT PRIMARY KEY REFERENCES projects(id) ON DELETE CASCADE,
    prd TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS qa_reports (
    project_id TEXT PRIMARY KEY REFERENCES projects(id) ON DELETE CASCADE,
    report TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS generated_files (
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    agent TEXT NOT NULL,
    path TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_generated_files_project ON generated_files(project_id);
"#;

/// Open (creating if needed) the SQLite database
pub fn initialize_database(db_path: &Path) -> anyhow::Result<DbConnection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    conn.execute_batch(SCHEMA)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// SQLite-backed [`ProjectStore`] and [`VectorIndex`].
///
/// Embeddings are stored as JSON arrays and similarity is computed in
/// process; corpora here are a handful of documents per project, so an
/// exhaustive scan over one project's chunks is fine.
#[derive(Clone)]
pub struct SqliteStore {
    connection: DbConnection,
}

impl SqliteStore {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StorageError> {
        self.connection
            .lock()
            .map_err(|e| StorageError::OperationFailed(format!("Lock error: {}", e)))
    }
}

fn op_err(e: rusqlite::Error) -> StorageError {
    StorageError::OperationFailed(e.to_string())
}

fn parse_uuid(value: String) -> Result<Uuid, rusqlite::Error> {
    Uuid::parse_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn project_from_row(row: &rusqlite::Row<'_>) -> Result<Project, rusqlite::Error> {
    let stage_str: String = row.get(3)?;
    Ok(Project {
        id: parse_uuid(row.get(0)?)?,
        name: row.get(1)?,
        description: row.get(2)?,
        stage: ProjectStage::parse(&stage_str).unwrap_or(ProjectStage::New),
        backend_done: row.get(4)?,
        frontend_done: row.get(5)?,
        qa_done: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[async_trait]
impl ProjectStore for SqliteStore {
    async fn create_project(&self, project: &Project) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO projects (id, name, description, stage, backend_done, frontend_done, qa_done, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                project.id.to_string(),
                project.name,
                project.description,
                project.stage.as_str(),
                project.backend_done,
                project.frontend_done,
                project.qa_done,
                project.created_at,
            ],
        )
        .map_err(op_err)?;
        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StorageError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, description, stage, backend_done, frontend_done, qa_done, created_at
             FROM projects WHERE id = ?1",
            params![id.to_string()],
            project_from_row,
        )
        .optional()
        .map_err(op_err)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, description, stage, backend_done, frontend_done, qa_done, created_at
                 FROM projects ORDER BY created_at DESC, id",
            )
            .map_err(op_err)?;
        let rows = stmt
            .query_map([], project_from_row)
            .map_err(op_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(op_err)?;
        Ok(rows)
    }

    async fn update_project(&self, project: &Project) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                r#"
                UPDATE projects
                SET name = ?2, description = ?3, stage = ?4,
                    backend_done = ?5, frontend_done = ?6, qa_done = ?7
                WHERE id = ?1
                "#,
                params![
                    project.id.to_string(),
                    project.name,
                    project.description,
                    project.stage.as_str(),
                    project.backend_done,
                    project.frontend_done,
                    project.qa_done,
                ],
            )
            .map_err(op_err)?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("project {}", project.id)));
        }
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StorageError> {
        let conn = self.conn()?;
        // Chunks have no FK cascade; they are shared with the index side
        conn.execute("DELETE FROM chunks WHERE project_id = ?1", params![id.to_string()])
            .map_err(op_err)?;
        conn.execute("DELETE FROM projects WHERE id = ?1", params![id.to_string()])
            .map_err(op_err)?;
        Ok(())
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO messages (id, project_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id.to_string(),
                message.project_id.to_string(),
                message.role.as_str(),
                message.content,
                message.created_at,
            ],
        )
        .map_err(op_err)?;
        Ok(())
    }

    async fn get_messages(&self, project_id: Uuid) -> Result<Vec<ChatMessage>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, project_id, role, content, created_at
                 FROM messages WHERE project_id = ?1 ORDER BY rowid",
            )
            .map_err(op_err)?;
        let rows = stmt
            .query_map(params![project_id.to_string()], |row| {
                let role_str: String = row.get(2)?;
                Ok(ChatMessage {
                    id: parse_uuid(row.get(0)?)?,
                    project_id: parse_uuid(row.get(1)?)?,
                    role: MessageRole::parse(&role_str).unwrap_or(MessageRole::User),
                    content: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })
            .map_err(op_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(op_err)?;
        Ok(rows)
    }

    async fn upsert_document(&self, document: &Document) -> Result<Option<Uuid>, StorageError> {
        let conn = self.conn()?;
        let superseded: Option<String> = conn
            .query_row(
                "SELECT id FROM documents WHERE project_id = ?1 AND filename = ?2",
                params![document.project_id.to_string(), document.filename],
                |row| row.get(0),
            )
            .optional()
            .map_err(op_err)?;

        if let Some(old_id) = &superseded {
            conn.execute("DELETE FROM documents WHERE id = ?1", params![old_id])
                .map_err(op_err)?;
        }

        conn.execute(
            "INSERT INTO documents (id, project_id, filename, text, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                document.id.to_string(),
                document.project_id.to_string(),
                document.filename,
                document.text,
                document.uploaded_at,
            ],
        )
        .map_err(op_err)?;

        superseded
            .map(|id| {
                Uuid::parse_str(&id)
                    .map_err(|e| StorageError::OperationFailed(format!("Bad document id: {}", e)))
            })
            .transpose()
    }

    async fn get_documents(&self, project_id: Uuid) -> Result<Vec<Document>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, project_id, filename, text, uploaded_at
                 FROM documents WHERE project_id = ?1 ORDER BY uploaded_at, rowid",
            )
            .map_err(op_err)?;
        let rows = stmt
            .query_map(params![project_id.to_string()], |row| {
                Ok(Document {
                    id: parse_uuid(row.get(0)?)?,
                    project_id: parse_uuid(row.get(1)?)?,
                    filename: row.get(2)?,
                    text: row.get(3)?,
                    uploaded_at: row.get(4)?,
                })
            })
            .map_err(op_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(op_err)?;
        Ok(rows)
    }

    async fn set_prd(&self, project_id: Uuid, prd: &Prd) -> Result<(), StorageError> {
        let json = serde_json::to_string(prd)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO prds (project_id, prd) VALUES (?1, ?2)
             ON CONFLICT(project_id) DO UPDATE SET prd = excluded.prd",
            params![project_id.to_string(), json],
        )
        .map_err(op_err)?;
        Ok(())
    }

    async fn get_prd(&self, project_id: Uuid) -> Result<Option<Prd>, StorageError> {
        let conn = self.conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT prd FROM prds WHERE project_id = ?1",
                params![project_id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(op_err)?;
        json.map(|j| serde_json::from_str(&j).map_err(StorageError::from))
            .transpose()
    }

    async fn set_qa_report(&self, report: &QaReport) -> Result<(), StorageError> {
        let json = serde_json::to_string(report)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO qa_reports (project_id, report) VALUES (?1, ?2)
             ON CONFLICT(project_id) DO UPDATE SET report = excluded.report",
            params![report.project_id.to_string(), json],
        )
        .map_err(op_err)?;
        Ok(())
    }

    async fn get_qa_report(&self, project_id: Uuid) -> Result<Option<QaReport>, StorageError> {
        let conn = self.conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT report FROM qa_reports WHERE project_id = ?1",
                params![project_id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(op_err)?;
        json.map(|j| serde_json::from_str(&j).map_err(StorageError::from))
            .transpose()
    }

    async fn record_generated_files(
        &self,
        project_id: Uuid,
        agent: AgentKind,
        paths: &[String],
    ) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM generated_files WHERE project_id = ?1 AND agent = ?2",
            params![project_id.to_string(), agent.as_str()],
        )
        .map_err(op_err)?;

        let now = chrono::Utc::now().timestamp();
        for path in paths {
            conn.execute(
                "INSERT INTO generated_files (project_id, agent, path, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![project_id.to_string(), agent.as_str(), path, now],
            )
            .map_err(op_err)?;
        }
        Ok(())
    }

    async fn get_generated_files(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<GeneratedFileRecord>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT project_id, agent, path, created_at
                 FROM generated_files WHERE project_id = ?1 ORDER BY rowid",
            )
            .map_err(op_err)?;
        let rows = stmt
            .query_map(params![project_id.to_string()], |row| {
                let agent_str: String = row.get(1)?;
                let created_at: i64 = row.get(3)?;
                Ok(GeneratedFileRecord {
                    project_id: parse_uuid(row.get(0)?)?,
                    agent: AgentKind::parse(&agent_str).unwrap_or(AgentKind::Backend),
                    path: row.get(2)?,
                    created_at: chrono::DateTime::from_timestamp(created_at, 0)
                        .unwrap_or_else(chrono::Utc::now),
                })
            })
            .map_err(op_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(op_err)?;
        Ok(rows)
    }
}

#[async_trait]
impl VectorIndex for SqliteStore {
    async fn add_chunks(&self, chunks: Vec<Chunk>) -> Result<(), StorageError> {
        let conn = self.conn()?;
        for chunk in chunks {
            let embedding = serde_json::to_string(&chunk.embedding)?;
            conn.execute(
                "INSERT INTO chunks (id, document_id, project_id, seq, text, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    chunk.id.to_string(),
                    chunk.document_id.to_string(),
                    chunk.project_id.to_string(),
                    chunk.seq,
                    chunk.text,
                    embedding,
                ],
            )
            .map_err(op_err)?;
        }
        Ok(())
    }

    async fn remove_document(&self, document_id: Uuid) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM chunks WHERE document_id = ?1",
            params![document_id.to_string()],
        )
        .map_err(op_err)?;
        Ok(())
    }

    async fn remove_project(&self, project_id: Uuid) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM chunks WHERE project_id = ?1",
            params![project_id.to_string()],
        )
        .map_err(op_err)?;
        Ok(())
    }

    async fn search(
        &self,
        project_id: Uuid,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<Chunk>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, document_id, project_id, seq, text, embedding
                 FROM chunks WHERE project_id = ?1",
            )
            .map_err(op_err)?;
        let candidates = stmt
            .query_map(params![project_id.to_string()], |row| {
                let embedding_json: String = row.get(5)?;
                let embedding: Vec<f32> =
                    serde_json::from_str(&embedding_json).unwrap_or_default();
                Ok(Chunk {
                    id: parse_uuid(row.get(0)?)?,
                    document_id: parse_uuid(row.get(1)?)?,
                    project_id: parse_uuid(row.get(2)?)?,
                    seq: row.get(3)?,
                    text: row.get(4)?,
                    embedding,
                })
            })
            .map_err(op_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(op_err)?;

        let mut scored: Vec<(f32, Chunk)> = candidates
            .into_iter()
            .map(|c| (cosine_similarity(query, &c.embedding), c))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored.into_iter().take(k).map(|(_, c)| c).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn store() -> (NamedTempFile, SqliteStore) {
        let file = NamedTempFile::new().unwrap();
        let conn = initialize_database(file.path()).unwrap();
        (file, SqliteStore::new(conn))
    }

    #[tokio::test]
    async fn project_roundtrip() {
        let (_file, store) = store();
        let mut project = Project::new("inventory", "stock tracking");
        store.create_project(&project).await.unwrap();

        project.record_message();
        store.update_project(&project).await.unwrap();

        let loaded = store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(loaded.stage, ProjectStage::Gathering);
        assert_eq!(loaded.name, "inventory");
    }

    #[tokio::test]
    async fn messages_keep_insertion_order() {
        let (_file, store) = store();
        let project = Project::new("p", "");
        store.create_project(&project).await.unwrap();

        for text in ["first", "second", "third"] {
            store
                .append_message(&ChatMessage::new(project.id, MessageRole::User, text))
                .await
                .unwrap();
        }

        let messages = store.get_messages(project.id).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn prd_upsert_overwrites() {
        let (_file, store) = store();
        let project = Project::new("p", "");
        store.create_project(&project).await.unwrap();

        let mut prd = Prd {
            project_name: "v1".to_string(),
            ..Default::default()
        };
        store.set_prd(project.id, &prd).await.unwrap();
        prd.project_name = "v2".to_string();
        store.set_prd(project.id, &prd).await.unwrap();

        let loaded = store.get_prd(project.id).await.unwrap().unwrap();
        assert_eq!(loaded.project_name, "v2");
    }

    #[tokio::test]
    async fn chunk_search_is_project_scoped() {
        let (_file, store) = store();
        let project_a = Uuid::new_v4();
        let project_b = Uuid::new_v4();

        store
            .add_chunks(vec![Chunk {
                id: Uuid::new_v4(),
                document_id: Uuid::new_v4(),
                project_id: project_a,
                seq: 0,
                text: "warehouse chunk".to_string(),
                embedding: vec![1.0, 0.0],
            }])
            .await
            .unwrap();

        let hits = store.search(project_a, &[1.0, 0.0], 3).await.unwrap();
        assert_eq!(hits.len(), 1);
        let misses = store.search(project_b, &[1.0, 0.0], 3).await.unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn delete_project_cascades() {
        let (_file, store) = store();
        let project = Project::new("p", "");
        store.create_project(&project).await.unwrap();
        store
            .append_message(&ChatMessage::new(project.id, MessageRole::User, "hi"))
            .await
            .unwrap();
        store
            .add_chunks(vec![Chunk {
                id: Uuid::new_v4(),
                document_id: Uuid::new_v4(),
                project_id: project.id,
                seq: 0,
                text: "c".to_string(),
                embedding: vec![1.0],
            }])
            .await
            .unwrap();

        ProjectStore::delete_project(&store, project.id).await.unwrap();
        assert!(store.get_project(project.id).await.unwrap().is_none());
        assert!(store.get_messages(project.id).await.unwrap().is_empty());
        assert!(store.search(project.id, &[1.0], 3).await.unwrap().is_empty());
    }
}
