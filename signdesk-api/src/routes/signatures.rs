/// Signature profile endpoints
///
/// # Endpoints
///
/// - `POST /v1/signatures` - Create a signature profile
/// - `GET /v1/signatures/:id` - Fetch a signature profile
/// - `DELETE /v1/signatures/:id` - Delete a profile and every placement of it
/// - `GET /v1/users/:id/signatures` - List a user's profiles

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use signdesk_shared::models::signature::{CreateSignatureProfile, SignatureProfile};
use uuid::Uuid;

/// List signature profiles response
#[derive(Debug, Serialize)]
pub struct ListSignaturesResponse {
    pub signatures: Vec<SignatureProfile>,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether a record was removed
    pub deleted: bool,
}

/// Create a signature profile
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `404 Not Found`: Owning user does not exist
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_signature(
    State(state): State<AppState>,
    body: Result<Json<CreateSignatureProfile>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SignatureProfile>)> {
    let Json(req) = body?;
    let profile = state.storage.create_signature(req).await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Fetch a signature profile
pub async fn get_signature(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SignatureProfile>> {
    state
        .storage
        .signatures
        .find_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Signature profile {} not found", id)))
}

/// List a user's signature profiles, oldest first
pub async fn list_user_signatures(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ListSignaturesResponse>> {
    let signatures = state.storage.signatures.list_by_user(user_id).await;
    Ok(Json(ListSignaturesResponse { signatures }))
}

/// Delete a signature profile
///
/// Placements of the profile are removed on every document, even when the
/// profile itself was already gone.
pub async fn delete_signature(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.storage.delete_signature(id).await;
    Ok(Json(DeleteResponse { deleted }))
}
