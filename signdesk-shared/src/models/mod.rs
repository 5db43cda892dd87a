/// Domain models for SignDesk
///
/// This module contains the records held by the stores and the input types
/// used to create or update them.
///
/// # Models
///
/// - `user`: User accounts (identity store)
/// - `signature`: Signature profiles bundling an image and certificate material
/// - `document`: Uploaded PDF metadata and processing status
/// - `applied_signature`: Placements of a signature profile on a document page
///
/// # Example
///
/// ```
/// use signdesk_shared::models::applied_signature::{ApplySignature, Position};
///
/// let request = ApplySignature {
///     document_id: "2f1c5cbe-8a43-4b7e-9a47-3d5f0c7e1b10".to_string(),
///     signature_id: "a3c9d2e4-1b5f-4f6e-8c7d-9e0f1a2b3c4d".to_string(),
///     page_number: 1,
///     position: Some(Position::new("A1")),
/// };
///
/// assert!(request.validate_placement().is_ok());
/// ```

pub mod applied_signature;
pub mod document;
pub mod signature;
pub mod user;
