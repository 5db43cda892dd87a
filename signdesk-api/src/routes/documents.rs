/// Document endpoints
///
/// Files are stored and rendered by a separate processing service. These
/// endpoints only track document metadata and the status that service
/// reports back.
///
/// # Endpoints
///
/// - `POST /v1/documents` - Register an uploaded document
/// - `GET /v1/documents/:id` - Fetch a document
/// - `DELETE /v1/documents/:id` - Delete a document and its placements
/// - `PUT /v1/documents/:id/status` - Record processing status
/// - `GET /v1/users/:id/documents` - List a user's documents

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::signatures::DeleteResponse,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use signdesk_shared::models::document::{CreateDocument, Document, UpdateDocumentStatus};
use uuid::Uuid;

/// List documents response
#[derive(Debug, Serialize)]
pub struct ListDocumentsResponse {
    pub documents: Vec<Document>,
}

/// Register an uploaded document
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `404 Not Found`: Owning user does not exist
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_document(
    State(state): State<AppState>,
    body: Result<Json<CreateDocument>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let Json(req) = body?;
    let document = state.storage.create_document(req).await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// Fetch a document
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Document>> {
    state
        .storage
        .documents
        .find_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| document_not_found(id))
}

/// List a user's documents, oldest first
pub async fn list_user_documents(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ListDocumentsResponse>> {
    let documents = state.storage.documents.list_by_user(user_id).await;
    Ok(Json(ListDocumentsResponse { documents }))
}

/// Record processing status
///
/// ```text
/// PUT /v1/documents/:id/status
///
/// { "status": "completed", "pageCount": 3 }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: Unknown document
/// - `422 Unprocessable Entity`: `pageCount` above the supported maximum
pub async fn update_document_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateDocumentStatus>, JsonRejection>,
) -> ApiResult<Json<Document>> {
    let Json(update) = body?;

    state
        .storage
        .documents
        .update_status(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| document_not_found(id))
}

/// Delete a document together with all of its placements
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.storage.delete_document(id).await;
    Ok(Json(DeleteResponse { deleted }))
}

fn document_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Document {} not found", id))
}
