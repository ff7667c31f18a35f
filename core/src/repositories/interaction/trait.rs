//! Interaction repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::interaction::Interaction;
use crate::errors::DomainError;

#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Interaction>, DomainError>;

    /// Interactions of one contact, newest `occurred_at` first
    async fn list_for_contact(
        &self,
        contact_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Interaction>, DomainError>;

    /// Active interactions of the given contacts that occurred at or after
    /// `since` (all of them when `since` is None), newest first, capped at
    /// `limit` rows when one is given
    async fn list_for_contacts(
        &self,
        contact_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<Interaction>, DomainError>;

    /// Number of active interactions of the given contacts at or after `since`
    async fn count_for_contacts(
        &self,
        contact_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
    ) -> Result<u64, DomainError>;

    async fn create(&self, interaction: Interaction) -> Result<Interaction, DomainError>;

    async fn update(&self, interaction: Interaction) -> Result<Interaction, DomainError>;
}
