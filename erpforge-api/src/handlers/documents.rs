use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse, Responder};
use base64::Engine;
use erpforge_agents::Orchestrator;
use erpforge_types::{ErrorResponse, UploadDocumentRequest, UploadDocumentResponse};
use erpforge_workspace::extract_text;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::error_response;

#[post("/projects/{project_id}/documents")]
pub async fn upload_document(
    project_id: web::Path<Uuid>,
    request: web::Json<UploadDocumentRequest>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    let id = project_id.into_inner();
    let request = request.into_inner();

    let bytes = match base64::engine::general_purpose::STANDARD.decode(&request.content_base64) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, filename = %request.filename, "invalid base64 upload");
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: format!("invalid base64 content: {}", e),
            });
        }
    };

    let text = match extract_text(&request.filename, &bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, filename = %request.filename, "text extraction failed");
            return HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: format!("could not extract text: {}", e),
            });
        }
    };

    if text.trim().is_empty() {
        return HttpResponse::UnprocessableEntity().json(ErrorResponse {
            error: "document contains no extractable text".to_string(),
        });
    }

    match orchestrator
        .ingest_document(id, &request.filename, &text)
        .await
    {
        Ok(result) => {
            info!(project_id = %id, filename = %result.filename, chunks = result.chunks, "document uploaded");
            HttpResponse::Ok().json(UploadDocumentResponse {
                document_id: result.document_id.to_string(),
                filename: result.filename,
                chunks: result.chunks as i64,
            })
        }
        Err(e) => {
            error!(error = %e, project_id = %id, "document ingestion failed");
            error_response(&e)
        }
    }
}

#[get("/projects/{project_id}/documents")]
pub async fn list_documents(
    project_id: web::Path<Uuid>,
    orchestrator: web::Data<Arc<Orchestrator>>,
) -> impl Responder {
    match orchestrator.list_documents(project_id.into_inner()).await {
        Ok(documents) => HttpResponse::Ok().json(documents),
        Err(e) => error_response(&e),
    }
}
