use async_trait::async_trait;
use models::contact::{Contact, ContactPatch};

use crate::storage::StoreError;

/// Trait abstraction for contact persistence.
/// Implementations can be file-backed, database-backed, or remote.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Contact>, StoreError>;
    async fn get_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError>;
    async fn add(&self, record: Contact) -> Result<(), StoreError>;
    async fn update(&self, id: &str, patch: ContactPatch) -> Result<Contact, StoreError>;
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;
}
