use std::sync::Arc;

use actix_web::{delete, get, post, web, HttpResponse, Responder};
use erpforge_agents::Orchestrator;
use erpforge_types::{CreateProjectRequest, ErrorResponse, ProjectListResponse};
use tracing::{error, info};
use uuid::Uuid;

use super::{error_response, project_summary};

#[post("/projects")]
pub async fn create_project(
    request: web::Json<CreateProjectRequest>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let request = request.into_inner();
    if request.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "project name must not be empty".to_string(),
        });
    }

    match orchestrator
        .create_project(request.name.trim(), &request.description)
        .await
    {
        Ok(project) => {
            info!(project_id = %project.id, "project created");
            HttpResponse::Created().json(project_summary(&project))
        }
        Err(e) => {
            error!(error = %e, "failed to create project");
            error_response(&e)
        }
    }
}

#[get("/projects")]
pub async fn list_projects(orchestrator: web::Data<Arc<Orchestrator>>) -> impl Responder {
    match orchestrator.list_projects().await {
        Ok(projects) => HttpResponse::Ok().json(ProjectListResponse {
            projects: projects.iter().map(project_summary).collect(),
        }),
        Err(e) => {
            error!(error = %e, "failed to list projects");
            error_response(&e)
        }
    }
}

#[get("/projects/{project_id}")]
pub async fn get_project(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    match orchestrator.get_project(project_id.into_inner()).await {
        Ok(project) => HttpResponse::Ok().json(project_summary(&project)),
        Err(e) => error_response(&e),
    }
}

#[delete("/projects/{project_id}")]
pub async fn delete_project(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let id = project_id.into_inner();
    match orchestrator.delete_project(id).await {
        Ok(()) => {
            info!(project_id = %id, "project deleted");
            HttpResponse::NoContent().finish()
        }
        Err(e) => {
            error!(error = %e, project_id = %id, "failed to delete project");
            error_response(&e)
        }
    }
}
