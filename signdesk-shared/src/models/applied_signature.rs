/// Applied signature model
///
/// An applied signature binds a signature profile to one page of a document
/// at a position on that page. Records are owned by the placement engine
/// ([`crate::store::placement::PlacementEngine`]); documents and signature
/// profiles are referenced by ID only.
///
/// # Wire format
///
/// ```json
/// {
///   "id": "uuid",
///   "documentId": "uuid",
///   "signatureId": "uuid",
///   "pageNumber": 1,
///   "position": { "gridPosition": "A1", "x": 72.0, "y": 640.5 },
///   "appliedAt": "2025-01-03T12:00:00Z"
/// }
/// ```
///
/// Everything in `position` besides `gridPosition` is layout data owned by the
/// client and passed through untouched.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::store::error::{FieldError, StoreError, StoreResult};

/// On-page placement of a signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Position {
    /// Grid cell the signature is anchored to (e.g. "A1"); must not be blank
    ///
    /// A missing or non-string value deserializes as empty so it is reported
    /// as a validation error rather than a decoding error.
    #[serde(rename = "gridPosition", default, deserialize_with = "string_or_empty")]
    #[validate(custom(function = "validate_grid_position"))]
    pub grid_position: String,

    /// Additional coordinate/size fields
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Position {
    /// Creates a position anchored at `grid_position` with no extra fields
    pub fn new(grid_position: impl Into<String>) -> Self {
        Self {
            grid_position: grid_position.into(),
            extra: Map::new(),
        }
    }

    /// Adds an opaque layout field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Checks the position shape, reporting errors under `position.*`
    pub fn check(&self) -> StoreResult<()> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(errors))
        }
    }

    fn field_errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => FieldError::collect(&errors, Some("position")),
        }
    }
}

fn validate_grid_position(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("grid_position");
        error.message = Some("gridPosition is required and must be a non-empty string".into());
        return Err(error);
    }
    Ok(())
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(value) => Ok(value),
        _ => Ok(String::new()),
    }
}

/// Deserializes a position, treating anything but a JSON object as absent
///
/// Use with `#[serde(default, deserialize_with = "...")]` on request fields so
/// `null`, strings or numbers fail the "position object is required" rule
/// instead of the JSON decoder.
pub fn position_or_none<'de, D>(deserializer: D) -> Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        value @ JsonValue::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Placement request as received from callers
///
/// IDs are kept as strings, and every field defaults when absent, so that
/// missing, empty or malformed values surface as validation errors instead of
/// decoding failures.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplySignature {
    #[serde(default)]
    #[validate(length(min = 1, message = "documentId is required"))]
    pub document_id: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "signatureId is required"))]
    pub signature_id: String,

    #[serde(default)]
    #[validate(range(min = 1, message = "pageNumber is required and must be >= 1"))]
    pub page_number: i64,

    #[serde(default, deserialize_with = "position_or_none")]
    #[validate(required(message = "position object is required"))]
    pub position: Option<Position>,
}

/// Placement request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    pub document_id: Uuid,
    pub signature_id: Uuid,
    pub page_number: u32,
    pub position: Position,
}

impl PlacementRequest {
    /// Composite key used for de-duplication
    pub fn key(&self) -> PlacementKey {
        PlacementKey {
            document_id: self.document_id,
            page_number: self.page_number,
            signature_id: self.signature_id,
        }
    }
}

impl ApplySignature {
    /// Validates every field and returns the typed request
    ///
    /// All violations are reported together.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if:
    /// - `documentId` or `signatureId` is empty or not a UUID
    /// - `pageNumber` is below 1 or does not fit in a `u32`
    /// - `position` is missing or not an object, or its `gridPosition` is
    ///   blank or not a string
    pub fn validate_placement(&self) -> StoreResult<PlacementRequest> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => FieldError::collect(&errors, None),
        };

        let page_number = u32::try_from(self.page_number).ok();
        if self.page_number > 0 && page_number.is_none() {
            errors.push(FieldError::new(
                "pageNumber",
                format!("pageNumber must be at most {}", u32::MAX),
            ));
        }

        let document_id = parse_id("documentId", &self.document_id, &mut errors);
        let signature_id = parse_id("signatureId", &self.signature_id, &mut errors);

        if let Some(position) = &self.position {
            errors.extend(position.field_errors());
        }

        match (document_id, signature_id, page_number, &self.position) {
            (Some(document_id), Some(signature_id), Some(page_number), Some(position))
                if errors.is_empty() =>
            {
                Ok(PlacementRequest {
                    document_id,
                    signature_id,
                    page_number,
                    position: position.clone(),
                })
            }
            _ => Err(StoreError::Validation(errors)),
        }
    }
}

fn parse_id(field: &str, raw: &str, errors: &mut Vec<FieldError>) -> Option<Uuid> {
    if raw.is_empty() {
        // Already reported by the length rule
        return None;
    }
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(FieldError::new(field, format!("{} must be a valid UUID", field)));
            None
        }
    }
}

/// Composite key of the (document, page, signature) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementKey {
    pub document_id: Uuid,
    pub page_number: u32,
    pub signature_id: Uuid,
}

/// Signature profile placed on a document page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedSignature {
    /// Unique placement ID (UUID v4)
    pub id: Uuid,

    /// Document the signature is placed on
    pub document_id: Uuid,

    /// Signature profile that was placed
    pub signature_id: Uuid,

    /// 1-based page number
    pub page_number: u32,

    /// Where on the page
    pub position: Position,

    /// When the placement was created (unchanged by repositioning)
    pub applied_at: DateTime<Utc>,
}

impl AppliedSignature {
    pub fn key(&self) -> PlacementKey {
        PlacementKey {
            document_id: self.document_id,
            page_number: self.page_number,
            signature_id: self.signature_id,
        }
    }
}
