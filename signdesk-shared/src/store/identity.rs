//! Identity store.
//!
//! Holds user accounts and keeps two uniqueness indexes: email (compared
//! case-insensitively) and pending verification token.

use std::collections::HashMap;

use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::error::{FieldError, StoreError, StoreResult};
use crate::models::user::{normalize_email, CreateUser, UpdateUser, User};

/// In-memory identity store
#[derive(Default)]
pub struct IdentityStore {
    inner: RwLock<IdentityIndex>,
}

#[derive(Default)]
struct IdentityIndex {
    users: IndexMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
    by_token: HashMap<String, Uuid>,
}

impl IdentityIndex {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        matches!(self.by_email.get(email), Some(owner) if Some(*owner) != except)
    }

    fn token_taken(&self, token: &str, except: Option<Uuid>) -> bool {
        matches!(self.by_token.get(token), Some(owner) if Some(*owner) != except)
    }
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new user
    ///
    /// # Arguments
    ///
    /// * `data` - User creation data
    /// * `verification_token` - Token issued by the verification flow, if any
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A field fails validation
    /// - The email is already registered
    /// - The verification token is already assigned to another user
    pub async fn create(
        &self,
        data: CreateUser,
        verification_token: Option<String>,
    ) -> StoreResult<User> {
        data.validate()
            .map_err(|e| StoreError::Validation(FieldError::collect(&e, None)))?;

        let email = normalize_email(&data.email);
        let mut inner = self.inner.write().await;

        if inner.email_taken(&email, None) {
            return Err(StoreError::Conflict("Email already exists".to_string()));
        }
        if let Some(token) = &verification_token {
            if inner.token_taken(token, None) {
                return Err(StoreError::Conflict(
                    "Verification token already in use".to_string(),
                ));
            }
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: data.password_hash,
            full_name: data.full_name,
            company_name: data.company_name,
            is_verified: data.is_verified,
            verification_token,
            created_at: Utc::now(),
        };

        inner.by_email.insert(user.email.clone(), user.id);
        if let Some(token) = &user.verification_token {
            inner.by_token.insert(token.clone(), user.id);
        }
        inner.users.insert(user.id, user.clone());

        info!(user_id = %user.id, "User created");

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().await;
        let id = inner.by_email.get(&normalize_email(email))?;
        inner.users.get(id).cloned()
    }

    /// Finds the user a verification token was issued to
    pub async fn find_by_verification_token(&self, token: &str) -> Option<User> {
        let inner = self.inner.read().await;
        let id = inner.by_token.get(token)?;
        inner.users.get(id).cloned()
    }

    pub async fn exists(&self, id: Uuid) -> bool {
        self.inner.read().await.users.contains_key(&id)
    }

    /// Lists all users in creation order
    pub async fn list(&self) -> Vec<User> {
        self.inner.read().await.users.values().cloned().collect()
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` are applied. A replaced verification
    /// token is released and can be issued again.
    ///
    /// # Returns
    ///
    /// The updated user, or `None` if the user doesn't exist
    ///
    /// # Errors
    ///
    /// - `StoreError::Validation` if a supplied field is malformed
    /// - `StoreError::Conflict` if the new email or verification token
    ///   belongs to another user
    ///
    /// Nothing is changed when an error is returned.
    pub async fn update(&self, id: Uuid, data: UpdateUser) -> StoreResult<Option<User>> {
        data.validate()
            .map_err(|e| StoreError::Validation(FieldError::collect(&e, None)))?;

        let mut inner = self.inner.write().await;

        if !inner.users.contains_key(&id) {
            return Ok(None);
        }

        let new_email = data.email.as_deref().map(normalize_email);
        if let Some(email) = &new_email {
            if inner.email_taken(email, Some(id)) {
                return Err(StoreError::Conflict("Email already exists".to_string()));
            }
        }
        if let Some(Some(token)) = &data.verification_token {
            if inner.token_taken(token, Some(id)) {
                return Err(StoreError::Conflict(
                    "Verification token already in use".to_string(),
                ));
            }
        }

        let IdentityIndex {
            users,
            by_email,
            by_token,
        } = &mut *inner;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = new_email {
            by_email.remove(&user.email);
            by_email.insert(email.clone(), id);
            user.email = email;
        }
        if let Some(password_hash) = data.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(full_name) = data.full_name {
            user.full_name = full_name;
        }
        if let Some(company_name) = data.company_name {
            user.company_name = company_name;
        }
        if let Some(is_verified) = data.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(token) = data.verification_token {
            if let Some(old) = user.verification_token.take() {
                by_token.remove(&old);
            }
            if let Some(new) = &token {
                by_token.insert(new.clone(), id);
            }
            user.verification_token = token;
        }

        Ok(Some(user.clone()))
    }
}
