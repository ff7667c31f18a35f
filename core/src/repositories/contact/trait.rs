//! Contact repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::contact::{Contact, ContactStatusHistory};
use crate::domain::value_objects::access::AccessScope;
use crate::errors::DomainError;

/// Column filters pushed down to storage. Free-text search is applied by
/// the service after decryption.
#[derive(Debug, Clone)]
pub struct ContactQuery {
    pub scope: AccessScope,
    pub block_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
    pub responsible_user_id: Option<Uuid>,
    pub include_inactive: bool,
}

impl ContactQuery {
    pub fn scoped(scope: AccessScope) -> Self {
        Self {
            scope,
            block_id: None,
            status_id: None,
            responsible_user_id: None,
            include_inactive: false,
        }
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        if !self.include_inactive && !contact.is_active {
            return false;
        }
        let in_scope = match &self.scope {
            AccessScope::All => true,
            AccessScope::Restricted { user_id, block_ids } => {
                block_ids.contains(&contact.block_id)
                    || contact.responsible_user_id == Some(*user_id)
            }
        };
        in_scope
            && self.block_id.map_or(true, |id| contact.block_id == id)
            && self
                .status_id
                .map_or(true, |id| contact.influence_status_id == Some(id))
            && self
                .responsible_user_id
                .map_or(true, |id| contact.responsible_user_id == Some(id))
    }
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, DomainError>;

    /// Contacts matching the query, in no particular order
    async fn list(&self, query: &ContactQuery) -> Result<Vec<Contact>, DomainError>;

    /// Whether an active contact in the block has exactly this full name
    async fn exists_with_name(
        &self,
        block_id: Uuid,
        full_name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError>;

    async fn count_active_in_block(&self, block_id: Uuid) -> Result<u64, DomainError>;

    /// Insert the contact and, if given, its initial status row atomically
    async fn create(
        &self,
        contact: Contact,
        initial_status: Option<ContactStatusHistory>,
    ) -> Result<Contact, DomainError>;

    async fn update(&self, contact: Contact) -> Result<Contact, DomainError>;

    /// Persist the contact and append the history row atomically
    async fn save_status_change(
        &self,
        contact: Contact,
        entry: ContactStatusHistory,
    ) -> Result<Contact, DomainError>;

    /// History rows for a contact, newest first
    async fn status_history(&self, contact_id: Uuid)
        -> Result<Vec<ContactStatusHistory>, DomainError>;
}
