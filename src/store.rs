//! JSON-file document store: one `<id>.json` per document under a data directory.
//!
//! DESIGN
//! ======
//! Each file holds a full `StoredDocument` (id, owner, title, elements).
//! Writes go to a sibling `.tmp` file first and are renamed into place, so a
//! crash mid-write never leaves a truncated document behind.
//!
//! ERROR HANDLING
//! ==============
//! A missing file and a file owned by someone else both surface as
//! `StoreError::NotFound`. I/O and JSON failures become `StoreError::Backend`.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::io;
use std::path::{Path, PathBuf};

use cv_canvas::element::Element;
use cv_canvas::store::{DocumentId, DocumentStore, Principal, StoreError, StoredDocument};
use tracing::{debug, info};

pub struct FileStore {
    root: PathBuf,
}

fn backend(e: io::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: DocumentId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Create a document owned by `principal`, seeded with `elements`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if `id` is taken and
    /// [`StoreError::Backend`] on I/O failure.
    pub async fn create(
        &self,
        principal: &Principal,
        id: DocumentId,
        title: &str,
        elements: Vec<Element>,
    ) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(backend)?;
        if tokio::fs::try_exists(self.path_for(id)).await.map_err(backend)? {
            return Err(StoreError::AlreadyExists(id));
        }
        let doc = StoredDocument { id, owner_id: principal.user_id, title: title.to_owned(), elements };
        self.write(&doc).await?;
        info!(%id, owner = %principal.user_id, "document created");
        Ok(())
    }

    /// The full stored record, owner and title included.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when missing or not accessible.
    pub async fn document(&self, principal: &Principal, id: DocumentId) -> Result<StoredDocument, StoreError> {
        let doc = self.read(id).await?;
        if !principal.can_access(doc.owner_id) {
            debug!(%id, user = %principal.user_id, "access denied; reporting not found");
            return Err(StoreError::NotFound(id));
        }
        Ok(doc)
    }

    async fn read(&self, id: DocumentId) -> Result<StoredDocument, StoreError> {
        let raw = match tokio::fs::read_to_string(self.path_for(id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound(id)),
            Err(e) => return Err(backend(e)),
        };
        serde_json::from_str(&raw).map_err(|e| StoreError::Backend(format!("corrupt document {id}: {e}")))
    }

    async fn write(&self, doc: &StoredDocument) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(doc).map_err(|e| StoreError::Backend(e.to_string()))?;
        let path = self.path_for(doc.id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await.map_err(backend)?;
        tokio::fs::rename(&tmp, &path).await.map_err(backend)?;
        debug!(id = %doc.id, path = %path.display(), "document written");
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for FileStore {
    async fn load(&self, principal: &Principal, id: DocumentId) -> Result<Vec<Element>, StoreError> {
        Ok(self.document(principal, id).await?.elements)
    }

    async fn save(&self, principal: &Principal, id: DocumentId, elements: Vec<Element>) -> Result<(), StoreError> {
        let mut doc = self.document(principal, id).await?;
        doc.elements = elements;
        self.write(&doc).await?;
        info!(%id, count = doc.elements.len(), "document saved");
        Ok(())
    }
}
