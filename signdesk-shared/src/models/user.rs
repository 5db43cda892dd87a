/// User model
///
/// Users own signature profiles and documents. Credentials and verification
/// tokens are produced by the authentication layer; this crate only stores
/// them and keeps their uniqueness indexes consistent.
///
/// # Example
///
/// ```
/// use signdesk_shared::models::user::CreateUser;
/// use validator::Validate;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     full_name: "Jane Doe".to_string(),
///     company_name: None,
///     is_verified: false,
/// };
///
/// assert!(new_user.validate().is_ok());
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User model representing a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, stored lowercase
    ///
    /// Must be unique across all users
    pub email: String,

    /// Password hash produced by the authentication layer
    ///
    /// Never serialized back out.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Display name
    pub full_name: String,

    /// Optional company name
    pub company_name: Option<String>,

    /// Whether the email address has been verified
    pub is_verified: bool,

    /// Pending verification token (unique when present)
    #[serde(skip_serializing, default)]
    pub verification_token: Option<String>,

    /// When the user account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    /// Email address (normalized to lowercase on insert)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password hash (NOT a plaintext password)
    #[validate(length(min = 1, message = "Password hash is required"))]
    pub password_hash: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: String,

    /// Optional company name
    pub company_name: Option<String>,

    /// Initial verification state
    #[serde(default)]
    pub is_verified: bool,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password hash
    #[validate(length(min = 1, message = "Password hash is required"))]
    pub password_hash: Option<String>,

    /// New display name
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: Option<String>,

    /// New company name (use Some(None) to clear)
    pub company_name: Option<Option<String>>,

    /// Update verification status
    pub is_verified: Option<bool>,

    /// New verification token (use Some(None) to clear)
    pub verification_token: Option<Option<String>>,
}

/// Normalizes an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
