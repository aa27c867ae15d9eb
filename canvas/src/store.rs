//! Persistence boundary: load and save element lists by document id.
//!
//! DESIGN
//! ======
//! The editing core never talks to a database. It consumes a
//! [`DocumentStore`] implementation handed in by the host. `MemoryStore` is
//! the reference implementation used by tests and by hosts that keep
//! documents in process; the CLI ships a JSON-file backed one.
//!
//! ERROR HANDLING
//! ==============
//! A document owned by someone else is reported as `NotFound`, exactly like
//! a missing one, so callers cannot discover other users' document ids.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::element::Element;

/// Unique identifier for a stored document or template.
pub type DocumentId = Uuid;

/// Unique identifier for a user.
pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document not found or not accessible: {0}")]
    NotFound(DocumentId),
    #[error("document already exists: {0}")]
    AlreadyExists(DocumentId),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// The authenticated user on whose behalf a store call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub fn user(user_id: UserId) -> Self {
        Self { user_id, role: Role::User }
    }

    /// Owners and admins may read and write a document.
    #[must_use]
    pub fn can_access(&self, owner_id: UserId) -> bool {
        self.role == Role::Admin || self.user_id == owner_id
    }
}

/// A persisted document with its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub owner_id: UserId,
    pub title: String,
    pub elements: Vec<Element>,
}

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the element list of `id`.
    async fn load(&self, principal: &Principal, id: DocumentId) -> Result<Vec<Element>, StoreError>;

    /// Overwrite the element list of an existing document `id`.
    async fn save(&self, principal: &Principal, id: DocumentId, elements: Vec<Element>) -> Result<(), StoreError>;
}

/// In-process document store keyed by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DocumentId, StoredDocument>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document owned by `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if `id` is taken.
    pub async fn create(
        &self,
        principal: &Principal,
        id: DocumentId,
        title: &str,
        elements: Vec<Element>,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        documents.insert(
            id,
            StoredDocument { id, owner_id: principal.user_id, title: title.to_owned(), elements },
        );
        info!(%id, owner = %principal.user_id, "document created");
        Ok(())
    }

    /// Documents visible to `principal`, sorted by title.
    pub async fn list(&self, principal: &Principal) -> Vec<StoredDocument> {
        let documents = self.documents.read().await;
        let mut out: Vec<StoredDocument> =
            documents.values().filter(|d| principal.can_access(d.owner_id)).cloned().collect();
        out.sort_by(|a, b| a.title.cmp(&b.title));
        out
    }

    /// Remove a document owned by `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when missing or not accessible.
    pub async fn delete(&self, principal: &Principal, id: DocumentId) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        match documents.get(&id) {
            Some(doc) if principal.can_access(doc.owner_id) => {
                documents.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::NotFound(id)),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self, principal: &Principal, id: DocumentId) -> Result<Vec<Element>, StoreError> {
        let documents = self.documents.read().await;
        documents
            .get(&id)
            .filter(|doc| principal.can_access(doc.owner_id))
            .map(|doc| doc.elements.clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn save(&self, principal: &Principal, id: DocumentId, elements: Vec<Element>) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let Some(doc) = documents.get_mut(&id).filter(|doc| principal.can_access(doc.owner_id)) else {
            return Err(StoreError::NotFound(id));
        };
        doc.elements = elements;
        info!(%id, count = doc.elements.len(), "document saved");
        Ok(())
    }
}
