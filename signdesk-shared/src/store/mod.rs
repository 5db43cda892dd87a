/// In-memory stores for SignDesk
///
/// This module provides the identity, signature profile and document stores,
/// the signature placement engine, and the [`Storage`] facade that ties them
/// together.
///
/// # Modules
///
/// - `error`: `StoreError` and field-level validation errors
/// - `cascade`: The `CascadeHook` contract parent stores call on delete
/// - `placement`: The signature placement engine
/// - `documents`: Document metadata store
/// - `signatures`: Signature profile store
/// - `identity`: User store
///
/// # Referential integrity
///
/// Applied signatures reference a document and a signature profile. The
/// facade checks both exist (and keeps them pinned) before the engine records
/// a placement, and both parent stores call the engine's cascade hook from
/// their delete path, so a placement never outlives its parents.
///
/// # Example
///
/// ```
/// use signdesk_shared::models::applied_signature::{ApplySignature, Position};
/// use signdesk_shared::store::{Storage, StoreError};
/// use uuid::Uuid;
///
/// # #[tokio::main]
/// # async fn main() {
/// let storage = Storage::new();
///
/// let result = storage
///     .apply_signature(
///         ApplySignature {
///             document_id: Uuid::new_v4().to_string(),
///             signature_id: Uuid::new_v4().to_string(),
///             page_number: 1,
///             position: Some(Position::new("A1")),
///         },
///         false,
///     )
///     .await;
///
/// // Neither parent exists
/// assert!(matches!(result, Err(StoreError::ReferentialViolation { .. })));
/// # }
/// ```

pub mod cascade;
pub mod documents;
pub mod error;
pub mod identity;
pub mod placement;
pub mod signatures;

pub use cascade::{CascadeHook, NoCascade};
pub use documents::DocumentStore;
pub use error::{Entity, FieldError, StoreError, StoreResult};
pub use identity::IdentityStore;
pub use placement::PlacementEngine;
pub use signatures::SignatureProfileStore;

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::models::applied_signature::{AppliedSignature, ApplySignature, Position, PlacementRequest};
use crate::models::document::{CreateDocument, Document};
use crate::models::signature::{CreateSignatureProfile, SignatureProfile};

/// All SignDesk stores, with cascades wired to the placement engine
///
/// Cheap to share behind an `Arc`; every store synchronizes internally.
pub struct Storage {
    pub users: IdentityStore,
    pub signatures: SignatureProfileStore,
    pub documents: DocumentStore,
    pub placements: Arc<PlacementEngine>,
}

impl Storage {
    /// Creates empty stores
    pub fn new() -> Self {
        let placements = Arc::new(PlacementEngine::new());

        Self {
            users: IdentityStore::new(),
            signatures: SignatureProfileStore::new(placements.clone()),
            documents: DocumentStore::new(placements.clone()),
            placements,
        }
    }

    /// Creates a signature profile for an existing user
    ///
    /// # Errors
    ///
    /// - `StoreError::ReferentialViolation` if the user does not exist
    /// - `StoreError::Validation` if a required field is empty
    pub async fn create_signature(&self, data: CreateSignatureProfile) -> StoreResult<SignatureProfile> {
        self.require_user(data.user_id).await?;
        self.signatures.create(data).await
    }

    /// Registers an uploaded document for an existing user
    ///
    /// # Errors
    ///
    /// - `StoreError::ReferentialViolation` if the user does not exist
    /// - `StoreError::Validation` if a required field is empty
    pub async fn create_document(&self, data: CreateDocument) -> StoreResult<Document> {
        self.require_user(data.user_id).await?;
        self.documents.create(data).await
    }

    /// Deletes a document together with its placements
    pub async fn delete_document(&self, id: Uuid) -> bool {
        self.documents.delete(id).await
    }

    /// Deletes a signature profile together with its placements
    pub async fn delete_signature(&self, id: Uuid) -> bool {
        self.signatures.delete(id).await
    }

    /// Applies a signature to a document page
    ///
    /// Validates the request, then keeps the document and signature profile
    /// pinned while the engine records the placement. See
    /// [`PlacementEngine::apply`] for the reposition-vs-create rules.
    ///
    /// # Errors
    ///
    /// - `StoreError::Validation` if the request is malformed
    /// - `StoreError::ReferentialViolation` if the document or signature
    ///   profile does not exist
    pub async fn apply_signature(
        &self,
        request: ApplySignature,
        bulk: bool,
    ) -> StoreResult<AppliedSignature> {
        let placement = request.validate_placement()?;

        let _document = self.documents.pin(placement.document_id).await.ok_or(
            StoreError::ReferentialViolation {
                entity: Entity::Document,
                id: placement.document_id,
            },
        )?;
        let _signature = self.signatures.pin(placement.signature_id).await.ok_or(
            StoreError::ReferentialViolation {
                entity: Entity::SignatureProfile,
                id: placement.signature_id,
            },
        )?;

        Ok(self.placements.apply_validated(placement, bulk).await)
    }

    /// Applies a signature to every page of a document
    ///
    /// Runs the placement in bulk mode for pages `1..=page_count`, so every
    /// page gets a new placement even if one already exists for the same
    /// signature. Returns the created placements in page order.
    ///
    /// # Errors
    ///
    /// - `StoreError::Validation` if the position is malformed or the
    ///   document has no pages yet
    /// - `StoreError::ReferentialViolation` if the document or signature
    ///   profile does not exist
    pub async fn apply_to_all_pages(
        &self,
        document_id: Uuid,
        signature_id: Uuid,
        position: Position,
    ) -> StoreResult<Vec<AppliedSignature>> {
        position.check()?;

        let document = self.documents.pin(document_id).await.ok_or(
            StoreError::ReferentialViolation {
                entity: Entity::Document,
                id: document_id,
            },
        )?;
        let _signature = self.signatures.pin(signature_id).await.ok_or(
            StoreError::ReferentialViolation {
                entity: Entity::SignatureProfile,
                id: signature_id,
            },
        )?;

        if document.page_count == 0 {
            return Err(StoreError::invalid(
                "pageCount",
                "Document has no pages to sign yet",
            ));
        }

        let mut applied = Vec::new();
        for page_number in 1..=document.page_count {
            let placement = PlacementRequest {
                document_id,
                signature_id,
                page_number,
                position: position.clone(),
            };
            applied.push(self.placements.apply_validated(placement, true).await);
        }

        info!(
            %document_id,
            %signature_id,
            pages = applied.len(),
            "Applied signature to all pages"
        );

        Ok(applied)
    }

    async fn require_user(&self, user_id: Uuid) -> StoreResult<()> {
        if self.users.exists(user_id).await {
            Ok(())
        } else {
            Err(StoreError::ReferentialViolation {
                entity: Entity::User,
                id: user_id,
            })
        }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}
