use std::sync::Arc;

use actix_web::{get, put, web, HttpResponse, Responder};
use erpforge_agents::Orchestrator;
use erpforge_types::{FileContent, WriteFileRequest};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use super::error_response;

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub path: String,
}

#[get("/projects/{project_id}/files")]
pub async fn list_files(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    match orchestrator.list_files(project_id.into_inner()).await {
        Ok(files) => HttpResponse::Ok().json(files),
        Err(e) => error_response(&e),
    }
}

#[get("/projects/{project_id}/files/tree")]
pub async fn file_tree(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    match orchestrator.file_tree(project_id.into_inner()).await {
        Ok(tree) => HttpResponse::Ok().json(tree),
        Err(e) => error_response(&e),
    }
}

#[get("/projects/{project_id}/file")]
pub async fn read_file(
    project_id: web::Path<Uuid>,
    query: web::Query<FileQuery>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let id = project_id.into_inner();
    let path = query.into_inner().path;
    match orchestrator.read_file(id, &path).await {
        Ok(content) => HttpResponse::Ok().json(FileContent { path, content }),
        Err(e) => error_response(&e),
    }
}

#[put("/projects/{project_id}/file")]
pub async fn write_file(
    project_id: web::Path<Uuid>,
    request: web::Json<WriteFileRequest>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let id = project_id.into_inner();
    let request = request.into_inner();
    match orchestrator
        .write_file(id, &request.path, &request.content)
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            error!(error = %e, project_id = %id, path = %request.path, "manual file write failed");
            error_response(&e)
        }
    }
}
