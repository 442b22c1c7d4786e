//! User Store
//!
//! Concurrency-safe in-memory store of user records, process-lifetime only.
//! Kept behind a single `RwLock<Vec<_>>`: the vector preserves insertion
//! order (which pagination relies on) and the write lock makes the
//! check-then-insert of email uniqueness atomic.

use super::types::{User, UserId};

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum UserStoreError {
    /// The email is already attached to a live record. Comparison is
    /// case-insensitive.
    #[error("email already in use: {0}")]
    DuplicateEmail(String),
}

pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    /// Creates a new, empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            users: RwLock::new(Vec::new()),
        })
    }

    /// Inserts a new active user, rejecting duplicate emails.
    ///
    /// Input syntax (name length, email shape) is validated at the HTTP
    /// boundary; the store only guards the uniqueness invariant.
    pub async fn create(&self, name: &str, email: &str) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;

        if users
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(email))
        {
            return Err(UserStoreError::DuplicateEmail(email.to_string()));
        }

        let user = User::new(name.to_string(), email.to_string());
        users.push(user.clone());

        tracing::info!("User {} created ({})", user.id, user.email);
        Ok(user)
    }

    /// Returns one page of users in insertion order, plus the total count.
    /// `page` is 1-based; a page past the end yields an empty slice.
    pub async fn page(&self, page: u64, limit: u64) -> (Vec<User>, u64) {
        let users = self.users.read().await;
        let total = users.len() as u64;

        let offset = page.saturating_sub(1).saturating_mul(limit);
        let data = users
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        (data, total)
    }

    /// Snapshot of a single record.
    pub async fn get(&self, id: &UserId) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|user| user.id == *id).cloned()
    }

    /// Removes a record; returns whether anything was deleted. The email of
    /// a deleted user becomes available again.
    pub async fn delete(&self, id: &UserId) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|user| user.id != *id);

        let deleted = users.len() != before;
        if deleted {
            tracing::info!("User {} deleted", id);
        }
        deleted
    }

    /// All users currently flagged active, in insertion order.
    pub async fn active(&self) -> Vec<User> {
        let users = self.users.read().await;
        users.iter().filter(|user| user.is_active).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}
