use std::sync::Arc;

use models::contact::{generate_contact_id, Contact, ContactInput, ContactPatch};
use serde_json::Value;
use tracing::{info, instrument};

use super::repository::ContactRepository;
use crate::errors::ServiceError;

/// Request-side contact operations: body validation, id minting and the
/// existence checks that sit in front of the store.
#[derive(Clone)]
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Contact>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Contact>, ServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Validate `{name, email, phone}` and store a new contact under a fresh id.
    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value) -> Result<Contact, ServiceError> {
        let input = ContactInput::from_json(body)?;
        let contact = Contact::new(generate_contact_id(), input);
        self.repo.add(contact.clone()).await?;
        info!(id = %contact.id, "contact_created");
        Ok(contact)
    }

    /// Full-body update: every field required, merged over the stored record.
    #[instrument(skip(self, body))]
    pub async fn replace(&self, id: &str, body: &Value) -> Result<Contact, ServiceError> {
        let input = ContactInput::from_json(body)?;
        self.apply(id, input.into()).await
    }

    /// Partial update: only the fields present in the body change.
    #[instrument(skip(self, body))]
    pub async fn patch(&self, id: &str, body: &Value) -> Result<Contact, ServiceError> {
        let patch = ContactPatch::from_json(body)?;
        self.apply(id, patch).await
    }

    /// Delete a contact; `NotFound` when nothing had that id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("contact"));
        }
        self.repo.remove(id).await?;
        info!(%id, "contact_deleted");
        Ok(())
    }

    async fn apply(&self, id: &str, patch: ContactPatch) -> Result<Contact, ServiceError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("contact"));
        }
        let updated = self.repo.update(id, patch).await?;
        info!(%id, "contact_updated");
        Ok(updated)
    }
}
