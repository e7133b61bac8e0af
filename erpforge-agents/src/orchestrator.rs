use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use erpforge_llm_sdk::client::{EmbeddingClient, LlmClient};
use erpforge_types::{
    AgentKind, ChatMessage, Chunk, Document, FileNode, MessageRole, Prd, Project, ProjectStage,
    QaFinding, QaReport, StageError,
};
use erpforge_workspace::{FileStore, GeneratedFile, Materializer};
use uuid::Uuid;

use crate::agents::{BackendAgent, FrontendAgent, PmAgent, QaAgent};
use crate::context::ContextAssembler;
use crate::error::PipelineError;
use crate::invoker::AgentInvoker;
use crate::rag::{chunk_text, Retriever, VectorIndex, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::storage::ProjectStore;
use crate::validator::StaticValidator;

/// Relative workspace path the PRD markdown is rendered to
const PRD_MARKDOWN_PATH: &str = "docs/PRD.md";
/// Per-file cap on backend code quoted into the QA review prompt
const QA_REVIEW_CHARS_PER_FILE: usize = 4_000;

/// Result of one conversational turn
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    /// The message matched a PRD-trigger phrase. A UI hint only; PRD
    /// generation remains an explicit separate call.
    pub prd_requested: bool,
    pub stage: ProjectStage,
}

/// Result of one code-generation agent run
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub agent: AgentKind,
    /// Relative paths materialized into the workspace
    pub files: Vec<String>,
    /// QA findings; empty for backend/frontend runs
    pub findings: Vec<QaFinding>,
    pub project: Project,
}

/// Result of ingesting one uploaded document
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub document_id: Uuid,
    pub filename: String,
    pub chunks: usize,
}

/// Sequences the agents against the project state machine.
///
/// All pipeline operations for one project run under that project's
/// mutex; different projects proceed independently. The orchestrator is
/// the only component that touches storage, the vector index, and the
/// workspace together, so every state transition happens in one place.
pub struct Orchestrator {
    store: Arc<dyn ProjectStore>,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingClient>,
    files: FileStore,
    materializer: Materializer,
    invoker: AgentInvoker,
    retriever: Retriever,
    assembler: ContextAssembler,
    validator: StaticValidator,
    pm: PmAgent,
    backend: BackendAgent,
    frontend: FrontendAgent,
    qa: QaAgent,
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingClient>,
        files: FileStore,
    ) -> Self {
        Self {
            store,
            index: index.clone(),
            embedder: embedder.clone(),
            materializer: Materializer::new(files.clone()),
            files,
            invoker: AgentInvoker::new(llm),
            retriever: Retriever::new(embedder, index),
            assembler: ContextAssembler::default(),
            validator: StaticValidator::new(),
            pm: PmAgent,
            backend: BackendAgent,
            frontend: FrontendAgent,
            qa: QaAgent,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, project_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(project_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    async fn load_project(&self, project_id: Uuid) -> Result<Project, PipelineError> {
        self.store
            .get_project(project_id)
            .await?
            .ok_or(PipelineError::ProjectNotFound(project_id))
    }

    // Project lifecycle

    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Project, PipelineError> {
        let project = Project::new(name, description);
        self.store.create_project(&project).await?;
        self.files.init_project(project.id)?;
        tracing::info!(project_id = %project.id, name, "created project");
        Ok(project)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, PipelineError> {
        Ok(self.store.list_projects().await?)
    }

    pub async fn get_project(&self, project_id: Uuid) -> Result<Project, PipelineError> {
        self.load_project(project_id).await
    }

    pub async fn get_prd(&self, project_id: Uuid) -> Result<Option<Prd>, PipelineError> {
        self.load_project(project_id).await?;
        Ok(self.store.get_prd(project_id).await?)
    }

    pub async fn get_qa_report(&self, project_id: Uuid) -> Result<Option<QaReport>, PipelineError> {
        self.load_project(project_id).await?;
        Ok(self.store.get_qa_report(project_id).await?)
    }

    pub async fn get_messages(&self, project_id: Uuid) -> Result<Vec<ChatMessage>, PipelineError> {
        self.load_project(project_id).await?;
        Ok(self.store.get_messages(project_id).await?)
    }

    /// Remove the project and everything derived from it: conversation,
    /// documents, index entries, workspace files.
    pub async fn delete_project(&self, project_id: Uuid) -> Result<(), PipelineError> {
        let lock = self.lock_for(project_id);
        let _guard = lock.lock().await;

        self.load_project(project_id).await?;
        self.store.delete_project(project_id).await?;
        self.index.remove_project(project_id).await?;
        self.files.delete_project(project_id)?;
        self.locks.lock().unwrap().remove(&project_id);
        tracing::info!(project_id = %project_id, "deleted project");
        Ok(())
    }

    // Conversation

    pub async fn post_message(
        &self,
        project_id: Uuid,
        message: &str,
    ) -> Result<ChatReply, PipelineError> {
        let lock = self.lock_for(project_id);
        let _guard = lock.lock().await;

        let mut project = self.load_project(project_id).await?;
        let history = self.store.get_messages(project_id).await?;
        let prd = self.store.get_prd(project_id).await?;
        let chunks = self.retriever.retrieve(project_id, message).await;

        let messages =
            self.assembler
                .assemble(&project, prd.as_ref(), &history, &chunks, message);
        let reply = self.pm.chat(&self.invoker, messages).await?;

        self.store
            .append_message(&ChatMessage::new(project_id, MessageRole::User, message))
            .await?;
        self.store
            .append_message(&ChatMessage::new(project_id, MessageRole::Assistant, &reply))
            .await?;

        project.record_message();
        self.store.update_project(&project).await?;

        Ok(ChatReply {
            reply,
            prd_requested: self.pm.prd_requested(message),
            stage: project.stage,
        })
    }

    /// Distill the conversation into a PRD, persist it, and render its
    /// markdown into the workspace. Regeneration overwrites both.
    pub async fn generate_prd(&self, project_id: Uuid) -> Result<(Prd, Project), PipelineError> {
        let lock = self.lock_for(project_id);
        let _guard = lock.lock().await;

        let mut project = self.load_project(project_id).await?;
        project.ensure_can_generate_prd()?;

        let history = self.store.get_messages(project_id).await?;
        let query = format!("{} requirements", project.name);
        let chunks = self.retriever.retrieve(project_id, &query).await;

        let messages = self.assembler.assemble(
            &project,
            None,
            &history,
            &chunks,
            self.pm.prd_instruction(),
        );
        let prd = self.pm.generate_prd(&self.invoker, messages).await?;

        self.store.set_prd(project_id, &prd).await?;
        self.files
            .write_file(project_id, PRD_MARKDOWN_PATH, &prd.to_markdown())?;

        project.record_prd();
        self.store.update_project(&project).await?;
        tracing::info!(project_id = %project_id, "PRD generated");
        Ok((prd, project))
    }

    // Code generation

    pub async fn run_agent(
        &self,
        project_id: Uuid,
        kind: AgentKind,
    ) -> Result<AgentRun, PipelineError> {
        let lock = self.lock_for(project_id);
        let _guard = lock.lock().await;

        let mut project = self.load_project(project_id).await?;
        project.ensure_can_run(kind)?;

        let prd = self
            .store
            .get_prd(project_id)
            .await?
            .ok_or(PipelineError::Precondition(StageError::PrdRequired))?;

        let run = match kind {
            AgentKind::Backend => self.run_codegen(&project, &prd, kind).await?,
            AgentKind::Frontend => self.run_codegen(&project, &prd, kind).await?,
            AgentKind::Qa => self.run_qa(&project, &prd).await?,
        };

        project.record_agent_done(kind);
        self.store.update_project(&project).await?;
        tracing::info!(project_id = %project_id, agent = %kind, files = run.files.len(), "agent run complete");

        Ok(AgentRun { project, ..run })
    }

    async fn run_codegen(
        &self,
        project: &Project,
        prd: &Prd,
        kind: AgentKind,
    ) -> Result<AgentRun, PipelineError> {
        let chunks = self.retriever.retrieve(project.id, &prd.overview).await;
        let trigger = match kind {
            AgentKind::Backend => self.backend.task_instruction(),
            _ => self.frontend.task_instruction(),
        };
        let messages = self
            .assembler
            .assemble(project, Some(prd), &[], &chunks, trigger);

        let batch = match kind {
            AgentKind::Backend => self.backend.generate(&self.invoker, messages).await?,
            _ => self.frontend.generate(&self.invoker, messages).await?,
        };

        let written = self.materializer.materialize(project.id, &batch.files)?;
        self.store
            .record_generated_files(project.id, kind, &written)
            .await?;

        Ok(AgentRun {
            agent: kind,
            files: written,
            findings: Vec::new(),
            project: project.clone(),
        })
    }

    async fn run_qa(&self, project: &Project, prd: &Prd) -> Result<AgentRun, PipelineError> {
        let backend_files = self.read_backend_files(project.id).await?;

        let mut trigger = String::from(self.qa.task_instruction());
        trigger.push_str("\n\nGenerated backend code:\n");
        for file in &backend_files {
            let excerpt: String = file.content.chars().take(QA_REVIEW_CHARS_PER_FILE).collect();
            trigger.push_str(&format!("\n### {}\n```\n{}\n```\n", file.path, excerpt));
        }

        let messages = self
            .assembler
            .assemble(project, Some(prd), &[], &[], &trigger);
        let output = self.qa.run(&self.invoker, messages).await?;

        let written = self.materializer.materialize(project.id, &output.files)?;
        self.store
            .record_generated_files(project.id, AgentKind::Qa, &written)
            .await?;

        let mut findings = output.findings;
        findings.extend(self.validator.validate_files(&backend_files));

        let report = QaReport::new(project.id, written.clone(), findings.clone());
        self.store.set_qa_report(&report).await?;

        Ok(AgentRun {
            agent: AgentKind::Qa,
            files: written,
            findings,
            project: project.clone(),
        })
    }

    /// Backend files as recorded in the manifest, read back from the
    /// workspace. Files deleted out from under the manifest are skipped.
    async fn read_backend_files(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<GeneratedFile>, PipelineError> {
        let records = self.store.get_generated_files(project_id).await?;
        let mut files = Vec::new();
        for record in records
            .into_iter()
            .filter(|r| r.agent == AgentKind::Backend)
        {
            match self.files.read_file(project_id, &record.path) {
                Ok(content) => files.push(GeneratedFile {
                    path: record.path,
                    content,
                }),
                Err(e) => {
                    tracing::warn!(project_id = %project_id, path = %record.path, error = %e, "manifest file missing from workspace");
                }
            }
        }
        Ok(files)
    }

    // Document ingestion

    /// Chunk, embed and index one extracted document. Unlike retrieval,
    /// ingestion fails loudly when embedding fails: silently indexing
    /// nothing would look like success.
    pub async fn ingest_document(
        &self,
        project_id: Uuid,
        filename: &str,
        text: &str,
    ) -> Result<IngestResult, PipelineError> {
        let lock = self.lock_for(project_id);
        let _guard = lock.lock().await;

        self.load_project(project_id).await?;

        let document = Document::new(project_id, filename, text);
        let pieces = chunk_text(text, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP);
        let embeddings = self.embedder.embed_documents(pieces.clone()).await?;

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(seq, (text, embedding))| Chunk {
                id: Uuid::new_v4(),
                document_id: document.id,
                project_id,
                seq: seq as i64,
                text,
                embedding,
            })
            .collect();

        if let Some(superseded) = self.store.upsert_document(&document).await? {
            self.index.remove_document(superseded).await?;
        }
        let count = chunks.len();
        self.index.add_chunks(chunks).await?;

        tracing::info!(project_id = %project_id, filename, chunks = count, "document ingested");
        Ok(IngestResult {
            document_id: document.id,
            filename: filename.to_string(),
            chunks: count,
        })
    }

    pub async fn list_documents(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<Document>, PipelineError> {
        self.load_project(project_id).await?;
        Ok(self.store.get_documents(project_id).await?)
    }

    // Workspace passthrough

    pub async fn read_file(
        &self,
        project_id: Uuid,
        path: &str,
    ) -> Result<String, PipelineError> {
        self.load_project(project_id).await?;
        Ok(self.files.read_file(project_id, path)?)
    }

    /// Manual edit of one workspace file; the same containment rules as
    /// generated output apply.
    pub async fn write_file(
        &self,
        project_id: Uuid,
        path: &str,
        content: &str,
    ) -> Result<(), PipelineError> {
        self.load_project(project_id).await?;
        self.files.write_file(project_id, path, content)?;
        Ok(())
    }

    pub async fn list_files(&self, project_id: Uuid) -> Result<Vec<String>, PipelineError> {
        self.load_project(project_id).await?;
        Ok(self.files.list_files(project_id, "")?)
    }

    pub async fn file_tree(&self, project_id: Uuid) -> Result<Vec<FileNode>, PipelineError> {
        self.load_project(project_id).await?;
        Ok(self.files.file_tree(project_id)?)
    }
}
