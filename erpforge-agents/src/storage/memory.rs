use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use erpforge_types::{AgentKind, ChatMessage, Document, Prd, Project, QaReport};
use uuid::Uuid;

use super::{GeneratedFileRecord, ProjectStore, StorageError};

#[derive(Default)]
struct Inner {
    projects: HashMap<Uuid, Project>,
    messages: HashMap<Uuid, Vec<ChatMessage>>,
    documents: HashMap<Uuid, Vec<Document>>,
    prds: HashMap<Uuid, Prd>,
    qa_reports: HashMap<Uuid, QaReport>,
    generated_files: HashMap<Uuid, Vec<GeneratedFileRecord>>,
}

/// Non-persistent store for tests and local development
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn create_project(&self, project: &Project) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StorageError> {
        Ok(self.inner.lock().unwrap().projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        let inner = self.inner.lock().unwrap();
        let mut projects: Vec<Project> = inner.projects.values().cloned().collect();
        projects.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        Ok(projects)
    }

    async fn update_project(&self, project: &Project) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.projects.contains_key(&project.id) {
            return Err(StorageError::NotFound(format!("project {}", project.id)));
        }
        inner.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.projects.remove(&id);
        inner.messages.remove(&id);
        inner.documents.remove(&id);
        inner.prds.remove(&id);
        inner.qa_reports.remove(&id);
        inner.generated_files.remove(&id);
        Ok(())
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .messages
            .entry(message.project_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn get_messages(&self, project_id: Uuid) -> Result<Vec<ChatMessage>, StorageError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.messages.get(&project_id).cloned().unwrap_or_default())
    }

    async fn upsert_document(&self, document: &Document) -> Result<Option<Uuid>, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        let docs = inner.documents.entry(document.project_id).or_default();
        let superseded = docs
            .iter()
            .position(|d| d.filename == document.filename)
            .map(|i| docs.remove(i).id);
        docs.push(document.clone());
        Ok(superseded)
    }

    async fn get_documents(&self, project_id: Uuid) -> Result<Vec<Document>, StorageError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.documents.get(&project_id).cloned().unwrap_or_default())
    }

    async fn set_prd(&self, project_id: Uuid, prd: &Prd) -> Result<(), StorageError> {
        self.inner
            .lock()
            .unwrap()
            .prds
            .insert(project_id, prd.clone());
        Ok(())
    }

    async fn get_prd(&self, project_id: Uuid) -> Result<Option<Prd>, StorageError> {
        Ok(self.inner.lock().unwrap().prds.get(&project_id).cloned())
    }

    async fn set_qa_report(&self, report: &QaReport) -> Result<(), StorageError> {
        self.inner
            .lock()
            .unwrap()
            .qa_reports
            .insert(report.project_id, report.clone());
        Ok(())
    }

    async fn get_qa_report(&self, project_id: Uuid) -> Result<Option<QaReport>, StorageError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .qa_reports
            .get(&project_id)
            .cloned())
    }

    async fn record_generated_files(
        &self,
        project_id: Uuid,
        agent: AgentKind,
        paths: &[String],
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        let records = inner.generated_files.entry(project_id).or_default();
        records.retain(|r| r.agent != agent);
        let now = Utc::now();
        records.extend(paths.iter().map(|path| GeneratedFileRecord {
            project_id,
            agent,
            path: path.clone(),
            created_at: now,
        }));
        Ok(())
    }

    async fn get_generated_files(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<GeneratedFileRecord>, StorageError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .generated_files
            .get(&project_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erpforge_types::MessageRole;

    #[tokio::test]
    async fn project_roundtrip_and_listing() {
        let store = InMemoryStore::new();
        let project = Project::new("inventory", "tracks stock");
        store.create_project(&project).await.unwrap();

        let loaded = store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "inventory");
        assert_eq!(store.list_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_requires_existing_project() {
        let store = InMemoryStore::new();
        let project = Project::new("p", "");
        let err = store.update_project(&project).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn upsert_document_supersedes_same_filename() {
        let store = InMemoryStore::new();
        let project = Project::new("p", "");
        let first = Document::new(project.id, "reqs.pdf", "v1 text");
        let second = Document::new(project.id, "reqs.pdf", "v2 text");

        assert_eq!(store.upsert_document(&first).await.unwrap(), None);
        let superseded = store.upsert_document(&second).await.unwrap();
        assert_eq!(superseded, Some(first.id));

        let docs = store.get_documents(project.id).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "v2 text");
    }

    #[tokio::test]
    async fn delete_project_cascades() {
        let store = InMemoryStore::new();
        let project = Project::new("p", "");
        store.create_project(&project).await.unwrap();
        store
            .append_message(&ChatMessage::new(project.id, MessageRole::User, "hi"))
            .await
            .unwrap();
        store
            .upsert_document(&Document::new(project.id, "a.txt", "text"))
            .await
            .unwrap();

        store.delete_project(project.id).await.unwrap();
        assert!(store.get_project(project.id).await.unwrap().is_none());
        assert!(store.get_messages(project.id).await.unwrap().is_empty());
        assert!(store.get_documents(project.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn manifest_replaces_per_agent() {
        let store = InMemoryStore::new();
        let project = Project::new("p", "");
        store
            .record_generated_files(
                project.id,
                AgentKind::Backend,
                &["backend/app/main.py".to_string()],
            )
            .await
            .unwrap();
        store
            .record_generated_files(
                project.id,
                AgentKind::Backend,
                &["backend/app/models.py".to_string()],
            )
            .await
            .unwrap();

        let records = store.get_generated_files(project.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "backend/app/models.py");
    }
}
