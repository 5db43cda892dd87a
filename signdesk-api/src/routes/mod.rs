/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User registration and lookup
/// - `signatures`: Signature profile management
/// - `documents`: Uploaded document registry
/// - `placements`: Applying, moving and removing signatures on pages

pub mod documents;
pub mod health;
pub mod placements;
pub mod signatures;
pub mod users;

use crate::error::ApiError;
use uuid::Uuid;

/// Parses a path or body identifier, reporting failures under `field`
pub(crate) fn parse_id(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiError::ValidationError(vec![signdesk_shared::store::FieldError::new(
            field,
            format!("{} must be a valid UUID", field),
        )])
    })
}
