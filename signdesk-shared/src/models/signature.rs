/// Signature profile model
///
/// A signature profile is a named signing identity owned by a user. It bundles
/// signer metadata, an optional visual signature image, and the certificate
/// and private key material issued by the certificate service. The key
/// material and the optional password are opaque to SignDesk and are never
/// serialized back out.
///
/// Deleting a profile removes every applied signature that references it
/// (see [`crate::store::signatures::SignatureProfileStore::delete`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Signature profile owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureProfile {
    /// Unique profile ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Display name of the profile (e.g. "Contracts")
    pub name: String,

    /// Signer's full name as it appears in the certificate
    pub full_name: String,

    /// Signer's company
    pub company_name: String,

    /// Signing location
    pub location: String,

    /// Signer's time zone (IANA name)
    pub time_zone: String,

    /// PEM certificate
    pub certificate: String,

    /// PEM private key
    #[serde(skip_serializing, default)]
    pub private_key: String,

    /// Optional signature image (data URI)
    pub signature_image: Option<String>,

    /// Optional key password, passed through untouched
    #[serde(skip_serializing, default)]
    pub password: Option<String>,

    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a signature profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignatureProfile {
    /// Owning user
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,

    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    #[validate(length(min = 1, message = "Time zone is required"))]
    pub time_zone: String,

    #[validate(length(min = 1, message = "Certificate is required"))]
    pub certificate: String,

    #[validate(length(min = 1, message = "Private key is required"))]
    pub private_key: String,

    pub signature_image: Option<String>,

    pub password: Option<String>,
}
