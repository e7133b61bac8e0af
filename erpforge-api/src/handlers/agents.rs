use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse, Responder};
use erpforge_agents::Orchestrator;
use erpforge_types::{AgentKind, AgentRunResponse, ErrorResponse};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::error_response;

#[post("/projects/{project_id}/agents/{agent}")]
pub async fn run_agent(
    path: web::Path<(Uuid, String)>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let (project_id, agent_name) = path.into_inner();

    let Some(kind) = AgentKind::parse(&agent_name) else {
        warn!(agent = %agent_name, "unknown agent requested");
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("unknown agent '{}'", agent_name),
        });
    };

    match orchestrator.run_agent(project_id, kind).await {
        Ok(run) => {
            info!(project_id = %project_id, agent = %kind, files = run.files.len(), "agent run finished");
            HttpResponse::Ok().json(AgentRunResponse {
                agent: run.agent.as_str().to_string(),
                files: run.files,
                stage: run.project.stage.as_str().to_string(),
                findings: run
                    .findings
                    .iter()
                    .filter_map(|f| serde_json::to_value(f).ok())
                    .collect(),
            })
        }
        Err(e) => {
            error!(error = %e, project_id = %project_id, agent = %kind, "agent run failed");
            error_response(&e)
        }
    }
}

#[get("/projects/{project_id}/qa-report")]
pub async fn get_qa_report(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    match orchestrator.get_qa_report(project_id.into_inner()).await {
        Ok(Some(report)) => HttpResponse::Ok().json(report),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "QA has not been run for this project".to_string(),
        }),
        Err(e) => error_response(&e),
    }
}
