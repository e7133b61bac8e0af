pub mod agents;
pub mod chat;
pub mod documents;
pub mod files;
pub mod health;
pub mod projects;

use actix_web::HttpResponse;
use erpforge_agents::PipelineError;
use erpforge_types::{ErrorResponse, Project, ProjectSummary};
use erpforge_workspace::WorkspaceError;

/// Map a pipeline failure onto an HTTP status.
///
/// Precondition violations are conflicts with the project's current
/// stage; generation failures are upstream-model problems, hence 502.
pub(crate) fn error_response(err: &PipelineError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        PipelineError::ProjectNotFound(_) => HttpResponse::NotFound().json(body),
        PipelineError::Precondition(_) => HttpResponse::Conflict().json(body),
        PipelineError::Materialization(WorkspaceError::PathEscape { .. })
        | PipelineError::Materialization(WorkspaceError::PathConflict { .. }) => {
            HttpResponse::BadRequest().json(body)
        }
        PipelineError::Materialization(WorkspaceError::NotFound { .. }) => {
            HttpResponse::NotFound().json(body)
        }
        PipelineError::Generation { .. } => HttpResponse::BadGateway().json(body),
        PipelineError::Materialization(_) | PipelineError::Storage(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

pub(crate) fn project_summary(project: &Project) -> ProjectSummary {
    ProjectSummary {
        id: project.id.to_string(),
        name: project.name.clone(),
        description: project.description.clone(),
        stage: project.stage.as_str().to_string(),
        backend_done: project.backend_done,
        frontend_done: project.frontend_done,
        qa_done: project.qa_done,
        created_at: project.created_at,
    }
}
