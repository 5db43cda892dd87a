//! Cascade contract between parent stores and the placement engine.
//!
//! Documents and signature profiles do not own their applied signatures, but
//! removing either parent must remove every placement that references it.
//! Each parent store holds a [`CascadeHook`] and calls it from its delete
//! path while still holding its own write lock, so no placement can be added
//! for the parent between the cascade and the parent's removal.

use async_trait::async_trait;
use uuid::Uuid;

/// Receives parent deletions and removes dependent records.
///
/// Implementations must be idempotent: cascading for a parent with no
/// dependents is a no-op. The return value is the number of records removed.
#[async_trait]
pub trait CascadeHook: Send + Sync {
    /// Called by the document store before a document is removed.
    async fn on_document_deleted(&self, document_id: Uuid) -> usize;

    /// Called by the signature profile store before a profile is removed.
    async fn on_signature_deleted(&self, signature_id: Uuid) -> usize;
}

/// Hook that removes nothing, for stores used without a placement engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCascade;

#[async_trait]
impl CascadeHook for NoCascade {
    async fn on_document_deleted(&self, _document_id: Uuid) -> usize {
        0
    }

    async fn on_signature_deleted(&self, _signature_id: Uuid) -> usize {
        0
    }
}
