/// Signature placement endpoints
///
/// Placing the same signature on the same page twice moves the existing
/// placement instead of adding a second one; the all-pages sweep always adds.
///
/// # Endpoints
///
/// - `GET /v1/documents/:id/placements` - List placements on a document
/// - `POST /v1/documents/:id/placements` - Apply (or move) a signature
/// - `POST /v1/documents/:id/placements/all-pages` - Apply to every page
/// - `DELETE /v1/documents/:id/placements` - Remove all placements on a document
/// - `DELETE /v1/documents/:id/pages/:page/placements` - Remove placements on a page
/// - `PUT /v1/placements/:id/position` - Move a placement
/// - `DELETE /v1/placements/:id` - Remove one placement

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{parse_id, signatures::DeleteResponse},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use signdesk_shared::{
    models::applied_signature::{position_or_none, AppliedSignature, ApplySignature, Position},
    store::FieldError,
};
use uuid::Uuid;

/// Apply signature request
///
/// Fields default when absent, and a non-object `position` counts as absent,
/// so the store reports them as validation errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySignatureRequest {
    #[serde(default)]
    pub signature_id: String,

    #[serde(default)]
    pub page_number: i64,

    #[serde(default, deserialize_with = "position_or_none")]
    pub position: Option<Position>,
}

/// Apply to all pages request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyAllPagesRequest {
    #[serde(default)]
    pub signature_id: String,

    #[serde(default, deserialize_with = "position_or_none")]
    pub position: Option<Position>,
}

/// Reposition request
#[derive(Debug, Deserialize)]
pub struct RepositionRequest {
    #[serde(default, deserialize_with = "position_or_none")]
    pub position: Option<Position>,
}

/// Placement list response
#[derive(Debug, Serialize)]
pub struct PlacementsResponse {
    pub placements: Vec<AppliedSignature>,
}

/// Bulk removal response
#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    /// Number of placements removed
    pub removed: usize,
}

/// List placements on a document, in application order
pub async fn list_placements(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> ApiResult<Json<PlacementsResponse>> {
    let placements = state.storage.placements.list_for_document(document_id).await;
    Ok(Json(PlacementsResponse { placements }))
}

/// Apply a signature to a document page
///
/// ```text
/// POST /v1/documents/:id/placements
///
/// {
///   "signatureId": "uuid",
///   "pageNumber": 1,
///   "position": { "gridPosition": "B3", "x": 120, "y": 640 }
/// }
/// ```
///
/// Returns the new placement, or the existing one moved to `position` when
/// this signature is already on the page.
///
/// # Errors
///
/// - `404 Not Found`: Document or signature profile does not exist
/// - `422 Unprocessable Entity`: Validation failed (all problems reported)
pub async fn apply_signature(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    body: Result<Json<ApplySignatureRequest>, JsonRejection>,
) -> ApiResult<Json<AppliedSignature>> {
    let Json(req) = body?;

    let request = ApplySignature {
        document_id,
        signature_id: req.signature_id,
        page_number: req.page_number,
        position: req.position,
    };

    let placement = state.storage.apply_signature(request, false).await?;
    Ok(Json(placement))
}

/// Apply a signature to every page of a document
///
/// Each page gets a new placement, even where the signature already appears.
///
/// # Errors
///
/// - `404 Not Found`: Document or signature profile does not exist
/// - `422 Unprocessable Entity`: Invalid position or the document has not
///   been measured yet (no pages)
pub async fn apply_to_all_pages(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    body: Result<Json<ApplyAllPagesRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PlacementsResponse>)> {
    let Json(req) = body?;

    let signature_id = parse_id("signatureId", &req.signature_id)?;
    let position = require_position(req.position)?;

    let placements = state
        .storage
        .apply_to_all_pages(document_id, signature_id, position)
        .await?;

    Ok((StatusCode::CREATED, Json(PlacementsResponse { placements })))
}

/// Remove every placement on a document
pub async fn remove_document_placements(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> ApiResult<Json<RemovedResponse>> {
    let removed = state.storage.placements.remove_document(document_id).await;
    Ok(Json(RemovedResponse { removed }))
}

/// Remove every placement on one page of a document
pub async fn remove_page_placements(
    State(state): State<AppState>,
    Path((document_id, page_number)): Path<(Uuid, u32)>,
) -> ApiResult<Json<RemovedResponse>> {
    let removed = state
        .storage
        .placements
        .remove_page(document_id, page_number)
        .await;
    Ok(Json(RemovedResponse { removed }))
}

/// Move a placement, keeping its id
///
/// # Errors
///
/// - `404 Not Found`: Unknown placement
/// - `422 Unprocessable Entity`: Missing or invalid position
pub async fn reposition_placement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<RepositionRequest>, JsonRejection>,
) -> ApiResult<Json<AppliedSignature>> {
    let Json(req) = body?;
    let position = require_position(req.position)?;

    let placement = state.storage.placements.reposition(id, position).await?;
    Ok(Json(placement))
}

/// Remove one placement
pub async fn remove_placement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.storage.placements.remove(id).await;
    Ok(Json(DeleteResponse { deleted }))
}

fn require_position(position: Option<Position>) -> Result<Position, ApiError> {
    let position = position.ok_or_else(|| {
        ApiError::ValidationError(vec![FieldError::new(
            "position",
            "position object is required",
        )])
    })?;
    position.check()?;
    Ok(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_position() {
        assert!(matches!(
            require_position(None),
            Err(ApiError::ValidationError(errors)) if errors[0].field == "position"
        ));

        match require_position(Some(Position::new("  "))) {
            Err(ApiError::ValidationError(errors)) => {
                assert_eq!(errors[0].field, "position.gridPosition");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        assert!(require_position(Some(Position::new("C4"))).is_ok());
    }

    #[test]
    fn test_reposition_request_non_object_position() {
        for body in [r#"{"position":null}"#, r#"{"position":"A1"}"#, r#"{"position":3}"#] {
            let req: RepositionRequest = serde_json::from_str(body).unwrap();
            assert!(matches!(
                require_position(req.position),
                Err(ApiError::ValidationError(errors)) if errors[0].field == "position"
            ));
        }
    }

    #[test]
    fn test_apply_request_defaults_missing_fields() {
        let req: ApplySignatureRequest = serde_json::from_str("{}").unwrap();
        assert!(req.signature_id.is_empty());
        assert_eq!(req.page_number, 0);
        assert!(req.position.is_none());
    }
}
