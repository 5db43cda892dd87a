/// Document model
///
/// Metadata for an uploaded PDF. The file itself lives in external storage;
/// SignDesk only tracks where it is, how many pages it has and how far the
/// document-processing service has got with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Largest page count a document may report
///
/// Bounds the all-pages sweep, which creates one placement per page.
pub const MAX_PAGE_COUNT: u32 = 10_000;

/// Processing status, owned by the document-processing service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Uploaded, not yet picked up
    #[default]
    Pending,

    /// Pages are being rendered/measured
    Processing,

    /// Ready for signing
    Completed,

    /// Processing failed
    Failed,
}

impl DocumentStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
        }
    }
}

/// Size of a single page in PDF points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// Uploaded PDF document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Name of the stored file
    pub file_name: String,

    /// Name of the file as uploaded
    pub original_name: String,

    /// File size in bytes
    pub file_size: u64,

    /// Location in file storage
    pub file_path: String,

    /// Number of pages (0 until processing has measured the file)
    pub page_count: u32,

    /// Per-page sizes, when known
    pub page_sizes: Option<Vec<PageSize>>,

    /// Processing status
    pub status: DocumentStatus,

    /// When the document was uploaded
    pub uploaded_at: DateTime<Utc>,
}

/// Input for registering an uploaded document
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocument {
    /// Owning user
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,

    #[validate(length(min = 1, max = 255, message = "Original name must be 1-255 characters"))]
    pub original_name: String,

    pub file_size: u64,

    #[validate(length(min = 1, message = "File path is required"))]
    pub file_path: String,

    #[serde(default)]
    #[validate(range(max = 10000, message = "pageCount must be at most 10000"))]
    pub page_count: u32,

    #[serde(default)]
    pub page_sizes: Option<Vec<PageSize>>,

    /// Initial status (defaults to pending)
    #[serde(default)]
    pub status: DocumentStatus,
}

/// Status update reported by the document-processing service
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentStatus {
    pub status: DocumentStatus,

    #[serde(default)]
    #[validate(range(max = 10000, message = "pageCount must be at most 10000"))]
    pub page_count: Option<u32>,

    #[serde(default)]
    pub page_sizes: Option<Vec<PageSize>>,
}
