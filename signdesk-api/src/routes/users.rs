/// User endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - Register a user
/// - `GET /v1/users/:id` - Fetch a user
///
/// Password hashing happens upstream; this service stores the hash as given
/// and never returns it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use signdesk_shared::models::user::{CreateUser, User};
use uuid::Uuid;

/// Create user request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub user: CreateUser,

    /// Token the user must present to verify their email
    #[serde(default)]
    pub verification_token: Option<String>,
}

/// Register a user
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `409 Conflict`: Email or verification token already in use
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(req) = body?;

    let user = state
        .storage
        .users
        .create(req.user, req.verification_token)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Fetch a user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    state
        .storage
        .users
        .find_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))
}
