use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversation-driven part of the project lifecycle.
///
/// Backend/frontend/QA progress is tracked as explicit boolean facts on
/// [`Project`] rather than as further linear stages, because backend and
/// frontend generation are independent forward edges from `PrdReady` and
/// the UI gates each generation button on its own flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStage {
    /// Created, no conversation yet.
    New,
    /// Requirements conversation in progress.
    Gathering,
    /// A PRD has been generated from the conversation.
    PrdReady,
}

impl ProjectStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStage::New => "new",
            ProjectStage::Gathering => "gathering",
            ProjectStage::PrdReady => "prd_ready",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(ProjectStage::New),
            "gathering" => Some(ProjectStage::Gathering),
            "prd_ready" => Some(ProjectStage::PrdReady),
            _ => None,
        }
    }
}

/// Code-generation agents that can be triggered once a PRD exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Backend,
    Frontend,
    Qa,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Backend => "backend",
            AgentKind::Frontend => "frontend",
            AgentKind::Qa => "qa",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "backend" => Some(AgentKind::Backend),
            "frontend" => Some(AgentKind::Frontend),
            "qa" => Some(AgentKind::Qa),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precondition violations for lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("the project has no conversation to generate a PRD from")]
    NothingGathered,

    #[error("no PRD has been generated for this project yet")]
    PrdRequired,

    #[error("QA requires generated backend code")]
    BackendRequired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub stage: ProjectStage,
    pub backend_done: bool,
    pub frontend_done: bool,
    pub qa_done: bool,
    pub created_at: i64,
}

impl Project {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            stage: ProjectStage::New,
            backend_done: false,
            frontend_done: false,
            qa_done: false,
            created_at: Utc::now().timestamp(),
        }
    }

    /// A user message moves a fresh project into requirements gathering.
    /// Messages never move the project backwards out of `PrdReady`.
    pub fn record_message(&mut self) {
        if self.stage == ProjectStage::New {
            self.stage = ProjectStage::Gathering;
        }
    }

    /// PRD generation requires at least one conversation turn. Regeneration
    /// from `PrdReady` is allowed and overwrites the previous PRD.
    pub fn ensure_can_generate_prd(&self) -> Result<(), StageError> {
        match self.stage {
            ProjectStage::New => Err(StageError::NothingGathered),
            ProjectStage::Gathering | ProjectStage::PrdReady => Ok(()),
        }
    }

    pub fn record_prd(&mut self) {
        self.stage = ProjectStage::PrdReady;
    }

    /// Checks the precondition for running a code-generation agent without
    /// mutating any state. Re-running an already-completed agent is legal
    /// and overwrites its prior output.
    pub fn ensure_can_run(&self, kind: AgentKind) -> Result<(), StageError> {
        if self.stage != ProjectStage::PrdReady {
            return Err(StageError::PrdRequired);
        }
        if kind == AgentKind::Qa && !self.backend_done {
            return Err(StageError::BackendRequired);
        }
        Ok(())
    }

    pub fn record_agent_done(&mut self, kind: AgentKind) {
        match kind {
            AgentKind::Backend => self.backend_done = true,
            AgentKind::Frontend => self.frontend_done = true,
            AgentKind::Qa => self.qa_done = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_starts_clean() {
        let project = Project::new("warehouse", "inventory tracking");
        assert_eq!(project.stage, ProjectStage::New);
        assert!(!project.backend_done);
        assert!(!project.frontend_done);
        assert!(!project.qa_done);
    }

    #[test]
    fn messages_move_new_to_gathering_only() {
        let mut project = Project::new("p", "");
        project.record_message();
        assert_eq!(project.stage, ProjectStage::Gathering);

        project.record_prd();
        project.record_message();
        assert_eq!(project.stage, ProjectStage::PrdReady);
    }

    #[test]
    fn prd_requires_conversation() {
        let mut project = Project::new("p", "");
        assert_eq!(
            project.ensure_can_generate_prd(),
            Err(StageError::NothingGathered)
        );

        project.record_message();
        assert!(project.ensure_can_generate_prd().is_ok());

        // Regeneration stays legal once a PRD exists.
        project.record_prd();
        assert!(project.ensure_can_generate_prd().is_ok());
    }

    #[test]
    fn codegen_requires_prd() {
        let mut project = Project::new("p", "");
        project.record_message();

        assert_eq!(
            project.ensure_can_run(AgentKind::Backend),
            Err(StageError::PrdRequired)
        );
        assert_eq!(
            project.ensure_can_run(AgentKind::Frontend),
            Err(StageError::PrdRequired)
        );

        project.record_prd();
        assert!(project.ensure_can_run(AgentKind::Backend).is_ok());
        assert!(project.ensure_can_run(AgentKind::Frontend).is_ok());
    }

    #[test]
    fn backend_and_frontend_are_independent() {
        let mut project = Project::new("p", "");
        project.record_message();
        project.record_prd();

        project.record_agent_done(AgentKind::Frontend);
        assert!(project.frontend_done);
        assert!(!project.backend_done);

        project.record_agent_done(AgentKind::Backend);
        assert!(project.backend_done);
        assert!(project.frontend_done);
    }

    #[test]
    fn qa_requires_backend() {
        let mut project = Project::new("p", "");
        project.record_message();
        project.record_prd();

        assert_eq!(
            project.ensure_can_run(AgentKind::Qa),
            Err(StageError::BackendRequired)
        );

        project.record_agent_done(AgentKind::Backend);
        assert!(project.ensure_can_run(AgentKind::Qa).is_ok());

        // No terminal state: QA may re-run.
        project.record_agent_done(AgentKind::Qa);
        assert!(project.ensure_can_run(AgentKind::Qa).is_ok());
    }
}
