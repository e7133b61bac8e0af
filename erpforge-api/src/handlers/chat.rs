use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse, Responder};
use erpforge_agents::Orchestrator;
use erpforge_types::{ChatRequest, ChatResponse, ErrorResponse, GeneratePrdResponse};
use tracing::{error, info};
use uuid::Uuid;

use super::error_response;

#[post("/projects/{project_id}/chat")]
pub async fn post_message(
    project_id: web::Path<Uuid>,
    request: web::Json<ChatRequest>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let id = project_id.into_inner();
    let message = request.into_inner().message;
    if message.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "message must not be empty".to_string(),
        });
    }

    match orchestrator.post_message(id, &message).await {
        Ok(reply) => HttpResponse::Ok().json(ChatResponse {
            reply: reply.reply,
            stage: reply.stage.as_str().to_string(),
            prd_suggested: reply.prd_requested,
        }),
        Err(e) => {
            error!(error = %e, project_id = %id, "chat turn failed");
            error_response(&e)
        }
    }
}

#[get("/projects/{project_id}/messages")]
pub async fn get_messages(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    match orchestrator.get_messages(project_id.into_inner()).await {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(e) => error_response(&e),
    }
}

#[post("/projects/{project_id}/prd")]
pub async fn generate_prd(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let id = project_id.into_inner();
    match orchestrator.generate_prd(id).await {
        Ok((prd, project)) => {
            info!(project_id = %id, "PRD generated");
            HttpResponse::Ok().json(GeneratePrdResponse {
                prd: serde_json::to_value(&prd).unwrap_or_default(),
                stage: project.stage.as_str().to_string(),
            })
        }
        Err(e) => {
            error!(error = %e, project_id = %id, "PRD generation failed");
            error_response(&e)
        }
    }
}

#[get("/projects/{project_id}/prd")]
pub async fn get_prd(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let id = project_id.into_inner();
    match orchestrator.get_prd(id).await {
        Ok(Some(prd)) => {
            let project = match orchestrator.get_project(id).await {
                Ok(p) => p,
                Err(e) => return error_response(&e),
            };
            HttpResponse::Ok().json(GeneratePrdResponse {
                prd: serde_json::to_value(&prd).unwrap_or_default(),
                stage: project.stage.as_str().to_string(),
            })
        }
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "no PRD has been generated for this project".to_string(),
        }),
        Err(e) => error_response(&e),
    }
}
