use std::{path::PathBuf, sync::Arc};

use models::contact::{Contact, ContactPatch};
use tracing::{debug, instrument};

use super::repository::ContactRepository;
use crate::storage::{JsonListStore, StoreError};

/// Durable CRUD over the contacts document.
///
/// Every operation re-reads the file; mutations write the whole sequence back
/// before returning. Identifiers are compared as strings on every path.
pub struct ContactStore {
    store: JsonListStore<Contact>,
}

impl ContactStore {
    /// Wrap an existing contacts file. The file is not created here.
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self { store: JsonListStore::new(path) })
    }

    /// All contacts in insertion order.
    pub async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        self.store.load().await
    }

    /// First contact with the given id, `None` when absent.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        self.store.read(|contacts| contacts.iter().find(|c| c.id == id).cloned()).await
    }

    /// Append a contact. Ids already present are rejected with [`StoreError::Duplicate`].
    #[instrument(skip(self, record), fields(id = %record.id))]
    pub async fn add(&self, record: Contact) -> Result<(), StoreError> {
        self.store
            .mutate(move |contacts| {
                if contacts.iter().any(|c| c.id == record.id) {
                    return Err(StoreError::Duplicate(record.id));
                }
                contacts.push(record);
                Ok(())
            })
            .await?;
        debug!("contact added");
        Ok(())
    }

    /// Merge `patch` into the first contact with `id` in place and return it.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: ContactPatch) -> Result<Contact, StoreError> {
        let updated = self
            .store
            .mutate(|contacts| {
                let existing = contacts
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                existing.merge(patch);
                Ok(existing.clone())
            })
            .await?;
        debug!("contact updated");
        Ok(updated)
    }

    /// Drop every contact with `id`; returns whether anything was removed.
    /// The document is rewritten even when nothing matched.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self
            .store
            .mutate(|contacts| {
                let before = contacts.len();
                contacts.retain(|c| c.id != id);
                Ok(before - contacts.len())
            })
            .await?;
        debug!(removed, "contact remove applied");
        Ok(removed > 0)
    }
}

#[async_trait::async_trait]
impl ContactRepository for ContactStore {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        ContactStore::list(self).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        ContactStore::get_by_id(self, id).await
    }

    async fn add(&self, record: Contact) -> Result<(), StoreError> {
        ContactStore::add(self, record).await
    }

    async fn update(&self, id: &str, patch: ContactPatch) -> Result<Contact, StoreError> {
        ContactStore::update(self, id, patch).await
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        ContactStore::remove(self, id).await
    }
}
