//! In-memory implementation of ContactRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::contact::{Contact, ContactStatusHistory};
use crate::errors::DomainError;

use super::{ContactQuery, ContactRepository};

#[derive(Clone, Default)]
pub struct MockContactRepository {
    contacts: Arc<RwLock<HashMap<Uuid, Contact>>>,
    history: Arc<RwLock<Vec<ContactStatusHistory>>>,
}

impl MockContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, contact: Contact) {
        self.contacts.write().await.insert(contact.id, contact);
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, DomainError> {
        Ok(self.contacts.read().await.get(&id).cloned())
    }

    async fn list(&self, query: &ContactQuery) -> Result<Vec<Contact>, DomainError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect())
    }

    async fn exists_with_name(
        &self,
        block_id: Uuid,
        full_name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        let contacts = self.contacts.read().await;
        Ok(contacts.values().any(|c| {
            c.is_active
                && c.block_id == block_id
                && c.full_name == full_name
                && Some(c.id) != exclude_id
        }))
    }

    async fn count_active_in_block(&self, block_id: Uuid) -> Result<u64, DomainError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .values()
            .filter(|c| c.is_active && c.block_id == block_id)
            .count() as u64)
    }

    async fn create(
        &self,
        contact: Contact,
        initial_status: Option<ContactStatusHistory>,
    ) -> Result<Contact, DomainError> {
        self.contacts.write().await.insert(contact.id, contact.clone());
        if let Some(entry) = initial_status {
            self.history.write().await.push(entry);
        }
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact, DomainError> {
        let mut contacts = self.contacts.write().await;
        if !contacts.contains_key(&contact.id) {
            return Err(DomainError::not_found("Contact"));
        }
        contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn save_status_change(
        &self,
        contact: Contact,
        entry: ContactStatusHistory,
    ) -> Result<Contact, DomainError> {
        let contact = self.update(contact).await?;
        self.history.write().await.push(entry);
        Ok(contact)
    }

    async fn status_history(
        &self,
        contact_id: Uuid,
    ) -> Result<Vec<ContactStatusHistory>, DomainError> {
        let history = self.history.read().await;
        // Reverse insertion order is newest first even for equal timestamps
        Ok(history
            .iter()
            .rev()
            .filter(|h| h.contact_id == contact_id)
            .cloned()
            .collect())
    }
}
