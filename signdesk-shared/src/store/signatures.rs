//! Signature profile store.
//!
//! Deleting a profile cascades to every applied signature that references
//! it, across all documents.

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::cascade::CascadeHook;
use super::error::{FieldError, StoreError, StoreResult};
use crate::models::signature::{CreateSignatureProfile, SignatureProfile};

/// In-memory signature profile store
pub struct SignatureProfileStore {
    profiles: RwLock<IndexMap<Uuid, SignatureProfile>>,
    cascade: Arc<dyn CascadeHook>,
}

impl SignatureProfileStore {
    pub fn new(cascade: Arc<dyn CascadeHook>) -> Self {
        Self {
            profiles: RwLock::new(IndexMap::new()),
            cascade,
        }
    }

    /// Stores a new signature profile
    ///
    /// Certificate and key material are produced by the certificate service
    /// and stored as given.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if a required field is empty
    pub async fn create(&self, data: CreateSignatureProfile) -> StoreResult<SignatureProfile> {
        data.validate()
            .map_err(|e| StoreError::Validation(FieldError::collect(&e, None)))?;

        let profile = SignatureProfile {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            full_name: data.full_name,
            company_name: data.company_name,
            location: data.location,
            time_zone: data.time_zone,
            certificate: data.certificate,
            private_key: data.private_key,
            signature_image: data.signature_image,
            password: data.password,
            created_at: Utc::now(),
        };

        self.profiles
            .write()
            .await
            .insert(profile.id, profile.clone());

        info!(
            signature_id = %profile.id,
            user_id = %profile.user_id,
            "Signature profile created"
        );

        Ok(profile)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<SignatureProfile> {
        self.profiles.read().await.get(&id).cloned()
    }

    /// Lists a user's profiles in creation order
    pub async fn list_by_user(&self, user_id: Uuid) -> Vec<SignatureProfile> {
        self.profiles
            .read()
            .await
            .values()
            .filter(|profile| profile.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn exists(&self, id: Uuid) -> bool {
        self.profiles.read().await.contains_key(&id)
    }

    /// Holds a shared lock on a live profile; it cannot be deleted meanwhile
    pub async fn pin(&self, id: Uuid) -> Option<RwLockReadGuard<'_, SignatureProfile>> {
        let profiles = self.profiles.read().await;
        RwLockReadGuard::try_map(profiles, |profiles| profiles.get(&id)).ok()
    }

    /// Deletes a profile and every placement of it
    ///
    /// Returns false if the profile did not exist.
    pub async fn delete(&self, id: Uuid) -> bool {
        let mut profiles = self.profiles.write().await;
        let placements = self.cascade.on_signature_deleted(id).await;
        let deleted = profiles.shift_remove(&id).is_some();

        if deleted {
            info!(signature_id = %id, placements, "Signature profile deleted");
        }

        deleted
    }
}
