//! Document store.
//!
//! Holds metadata for uploaded PDFs. Deleting a document cascades to its
//! applied signatures through the store's [`CascadeHook`].

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::cascade::CascadeHook;
use super::error::{FieldError, StoreError, StoreResult};
use crate::models::document::{CreateDocument, Document, UpdateDocumentStatus};

/// In-memory document store
pub struct DocumentStore {
    documents: RwLock<IndexMap<Uuid, Document>>,
    cascade: Arc<dyn CascadeHook>,
}

impl DocumentStore {
    /// Creates an empty store that reports deletions to `cascade`
    pub fn new(cascade: Arc<dyn CascadeHook>) -> Self {
        Self {
            documents: RwLock::new(IndexMap::new()),
            cascade,
        }
    }

    /// Registers an uploaded document
    ///
    /// The owning user is not checked here; see
    /// [`crate::store::Storage::create_document`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if a required field is empty
    pub async fn create(&self, data: CreateDocument) -> StoreResult<Document> {
        data.validate()
            .map_err(|e| StoreError::Validation(FieldError::collect(&e, None)))?;

        let document = Document {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            file_name: data.file_name,
            original_name: data.original_name,
            file_size: data.file_size,
            file_path: data.file_path,
            page_count: data.page_count,
            page_sizes: data.page_sizes,
            status: data.status,
            uploaded_at: Utc::now(),
        };

        self.documents
            .write()
            .await
            .insert(document.id, document.clone());

        info!(
            document_id = %document.id,
            user_id = %document.user_id,
            page_count = document.page_count,
            "Document registered"
        );

        Ok(document)
    }

    /// Finds a document by ID
    pub async fn find_by_id(&self, id: Uuid) -> Option<Document> {
        self.documents.read().await.get(&id).cloned()
    }

    /// Lists a user's documents in upload order
    pub async fn list_by_user(&self, user_id: Uuid) -> Vec<Document> {
        self.documents
            .read()
            .await
            .values()
            .filter(|doc| doc.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Whether a document with this ID exists
    pub async fn exists(&self, id: Uuid) -> bool {
        self.documents.read().await.contains_key(&id)
    }

    /// Holds a shared lock on a live document
    ///
    /// While the guard is alive the document cannot be deleted. Returns
    /// `None` if the document does not exist.
    pub async fn pin(&self, id: Uuid) -> Option<RwLockReadGuard<'_, Document>> {
        let documents = self.documents.read().await;
        RwLockReadGuard::try_map(documents, |documents| documents.get(&id)).ok()
    }

    /// Records the outcome of document processing
    ///
    /// `page_count` and `page_sizes` keep their current values when not
    /// supplied. Returns `Ok(None)` if the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if `page_count` exceeds
    /// [`MAX_PAGE_COUNT`](crate::models::document::MAX_PAGE_COUNT)
    pub async fn update_status(
        &self,
        id: Uuid,
        update: UpdateDocumentStatus,
    ) -> StoreResult<Option<Document>> {
        update
            .validate()
            .map_err(|e| StoreError::Validation(FieldError::collect(&e, None)))?;

        let mut documents = self.documents.write().await;
        let Some(document) = documents.get_mut(&id) else {
            return Ok(None);
        };

        document.status = update.status;
        if let Some(page_count) = update.page_count {
            document.page_count = page_count;
        }
        if let Some(page_sizes) = update.page_sizes {
            document.page_sizes = Some(page_sizes);
        }

        info!(
            document_id = %id,
            status = document.status.as_str(),
            page_count = document.page_count,
            "Document status updated"
        );

        Ok(Some(document.clone()))
    }

    /// Deletes a document and every placement on it
    ///
    /// The cascade runs while this store's write lock is held, so no
    /// placement can be added for the document in between. Returns false if
    /// the document did not exist.
    pub async fn delete(&self, id: Uuid) -> bool {
        let mut documents = self.documents.write().await;
        let placements = self.cascade.on_document_deleted(id).await;
        let deleted = documents.shift_remove(&id).is_some();

        if deleted {
            info!(document_id = %id, placements, "Document deleted");
        }

        deleted
    }
}
