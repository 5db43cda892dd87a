//! Signature placement engine.
//!
//! The engine owns the collection of [`AppliedSignature`] records. It enforces
//! that a (document, page, signature) triple has at most one placement outside
//! of bulk "apply to all pages" sweeps, repositions instead of duplicating on
//! repeat placement, and removes placements when their parents are deleted
//! (via [`CascadeHook`]).
//!
//! Existence of the referenced document and signature profile is checked by
//! the caller before a placement reaches the engine; see
//! [`crate::store::Storage::apply_signature`].
//!
//! # Example
//!
//! ```
//! use signdesk_shared::models::applied_signature::{ApplySignature, Position};
//! use signdesk_shared::store::placement::PlacementEngine;
//! use uuid::Uuid;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = PlacementEngine::new();
//! let request = ApplySignature {
//!     document_id: Uuid::new_v4().to_string(),
//!     signature_id: Uuid::new_v4().to_string(),
//!     page_number: 1,
//!     position: Some(Position::new("A1")),
//! };
//!
//! let first = engine.apply(request.clone(), false).await?;
//!
//! // Same triple again: repositioned, not duplicated
//! let mut again = request;
//! again.position = Some(Position::new("B2"));
//! let second = engine.apply(again, false).await?;
//!
//! assert_eq!(first.id, second.id);
//! assert_eq!(engine.len().await, 1);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::cascade::CascadeHook;
use super::error::{Entity, StoreError, StoreResult};
use crate::models::applied_signature::{
    AppliedSignature, ApplySignature, PlacementKey, PlacementRequest, Position,
};

/// In-memory placement engine.
///
/// Every public operation runs under a single lock acquisition, so the
/// match-then-update-or-insert sequence of [`PlacementEngine::apply`] is
/// atomic with respect to other engine calls.
pub struct PlacementEngine {
    inner: RwLock<PlacementIndex>,
}

#[derive(Default)]
struct PlacementIndex {
    /// Records in insertion order.
    records: IndexMap<Uuid, AppliedSignature>,

    /// Composite-key index: triple -> record IDs, oldest first.
    ///
    /// Holds more than one ID only after bulk sweeps.
    slots: HashMap<PlacementKey, Vec<Uuid>>,
}

impl PlacementIndex {
    fn first_in_slot(&self, key: &PlacementKey) -> Option<Uuid> {
        self.slots.get(key).and_then(|ids| ids.first().copied())
    }

    fn insert(&mut self, record: AppliedSignature) {
        self.slots.entry(record.key()).or_default().push(record.id);
        self.records.insert(record.id, record);
    }

    fn unindex(&mut self, key: PlacementKey, id: Uuid) {
        if let Some(ids) = self.slots.get_mut(&key) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                self.slots.remove(&key);
            }
        }
    }

    fn remove(&mut self, id: Uuid) -> Option<AppliedSignature> {
        let record = self.records.shift_remove(&id)?;
        self.unindex(record.key(), id);
        Some(record)
    }

    fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&AppliedSignature) -> bool,
    {
        let doomed: Vec<(Uuid, PlacementKey)> = self
            .records
            .values()
            .filter(|record| predicate(*record))
            .map(|record| (record.id, record.key()))
            .collect();

        if doomed.is_empty() {
            return 0;
        }

        self.records.retain(|_, record| !predicate(record));
        for (id, key) in &doomed {
            self.unindex(*key, *id);
        }

        doomed.len()
    }

    fn reposition(&mut self, id: Uuid, position: Position) -> StoreResult<AppliedSignature> {
        let record = self.records.get_mut(&id).ok_or(StoreError::NotFound {
            entity: Entity::AppliedSignature,
            id,
        })?;
        record.position = position;
        Ok(record.clone())
    }
}

impl PlacementEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PlacementIndex::default()),
        }
    }

    /// Applies a signature to a document page.
    ///
    /// The request is validated in full before anything is touched. When a
    /// placement for the same (document, page, signature) already exists and
    /// `bulk` is false, that placement is repositioned and returned with its
    /// ID and `applied_at` unchanged. Otherwise a new placement is created.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if the request is malformed (see
    /// [`ApplySignature::validate_placement`]).
    pub async fn apply(&self, request: ApplySignature, bulk: bool) -> StoreResult<AppliedSignature> {
        let placement = request.validate_placement()?;
        Ok(self.apply_validated(placement, bulk).await)
    }

    /// Applies an already-validated placement. See [`PlacementEngine::apply`].
    pub async fn apply_validated(&self, placement: PlacementRequest, bulk: bool) -> AppliedSignature {
        let key = placement.key();
        let mut inner = self.inner.write().await;

        if !bulk {
            if let Some(existing) = inner.first_in_slot(&key) {
                debug!(
                    placement_id = %existing,
                    document_id = %key.document_id,
                    page_number = key.page_number,
                    signature_id = %key.signature_id,
                    "Repositioning existing placement"
                );
                // The slot index only holds live IDs
                if let Ok(updated) = inner.reposition(existing, placement.position.clone()) {
                    return updated;
                }
            }
        }

        let record = AppliedSignature {
            id: Uuid::new_v4(),
            document_id: placement.document_id,
            signature_id: placement.signature_id,
            page_number: placement.page_number,
            position: placement.position,
            applied_at: Utc::now(),
        };

        debug!(
            placement_id = %record.id,
            document_id = %record.document_id,
            page_number = record.page_number,
            signature_id = %record.signature_id,
            bulk,
            "Created placement"
        );

        inner.insert(record.clone());
        record
    }

    /// Replaces the position of an existing placement.
    ///
    /// Only `position` changes. The caller is responsible for having checked
    /// the position shape (see [`Position::check`]).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no placement has this ID.
    pub async fn reposition(&self, id: Uuid, position: Position) -> StoreResult<AppliedSignature> {
        self.inner.write().await.reposition(id, position)
    }

    /// Finds a placement by ID.
    pub async fn get(&self, id: Uuid) -> Option<AppliedSignature> {
        self.inner.read().await.records.get(&id).cloned()
    }

    /// Lists the placements on a document, in insertion order.
    pub async fn list_for_document(&self, document_id: Uuid) -> Vec<AppliedSignature> {
        self.inner
            .read()
            .await
            .records
            .values()
            .filter(|record| record.document_id == document_id)
            .cloned()
            .collect()
    }

    /// Removes one placement. Returns false if it was already absent.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.inner.write().await.remove(id).is_some();
        if removed {
            debug!(placement_id = %id, "Removed placement");
        }
        removed
    }

    /// Removes every placement on one page of a document.
    pub async fn remove_page(&self, document_id: Uuid, page_number: u32) -> usize {
        let removed = self.inner.write().await.remove_where(|record| {
            record.document_id == document_id && record.page_number == page_number
        });
        debug!(%document_id, page_number, removed, "Cleared page placements");
        removed
    }

    /// Removes every placement on a document.
    pub async fn remove_document(&self, document_id: Uuid) -> usize {
        let removed = self
            .inner
            .write()
            .await
            .remove_where(|record| record.document_id == document_id);
        debug!(%document_id, removed, "Cleared document placements");
        removed
    }

    /// Removes every placement of a signature profile, across all documents.
    pub async fn remove_signature(&self, signature_id: Uuid) -> usize {
        let removed = self
            .inner
            .write()
            .await
            .remove_where(|record| record.signature_id == signature_id);
        debug!(%signature_id, removed, "Cleared signature placements");
        removed
    }

    /// Number of placements held.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CascadeHook for PlacementEngine {
    async fn on_document_deleted(&self, document_id: Uuid) -> usize {
        let removed = self.remove_document(document_id).await;
        info!(%document_id, removed, "Cascaded document deletion to placements");
        removed
    }

    async fn on_signature_deleted(&self, signature_id: Uuid) -> usize {
        let removed = self.remove_signature(signature_id).await;
        info!(%signature_id, removed, "Cascaded signature deletion to placements");
        removed
    }
}
