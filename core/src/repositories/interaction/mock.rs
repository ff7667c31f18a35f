//! In-memory implementation of InteractionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::interaction::Interaction;
use crate::errors::DomainError;

use super::InteractionRepository;

#[derive(Clone, Default)]
pub struct MockInteractionRepository {
    interactions: Arc<RwLock<HashMap<Uuid, Interaction>>>,
}

impl MockInteractionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, interaction: Interaction) {
        self.interactions
            .write()
            .await
            .insert(interaction.id, interaction);
    }
}

fn matches(i: &Interaction, contact_ids: &[Uuid], since: Option<DateTime<Utc>>) -> bool {
    i.is_active && contact_ids.contains(&i.contact_id) && since.map_or(true, |s| i.occurred_at >= s)
}

fn newest_first(items: &mut [Interaction]) {
    items.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
}

#[async_trait]
impl InteractionRepository for MockInteractionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Interaction>, DomainError> {
        Ok(self.interactions.read().await.get(&id).cloned())
    }

    async fn list_for_contact(
        &self,
        contact_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Interaction>, DomainError> {
        let interactions = self.interactions.read().await;
        let mut result: Vec<Interaction> = interactions
            .values()
            .filter(|i| i.contact_id == contact_id && (include_inactive || i.is_active))
            .cloned()
            .collect();
        newest_first(&mut result);
        Ok(result)
    }

    async fn list_for_contacts(
        &self,
        contact_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<Interaction>, DomainError> {
        let interactions = self.interactions.read().await;
        let mut result: Vec<Interaction> = interactions
            .values()
            .filter(|i| matches(i, contact_ids, since))
            .cloned()
            .collect();
        newest_first(&mut result);
        if let Some(limit) = limit {
            result.truncate(limit as usize);
        }
        Ok(result)
    }

    async fn count_for_contacts(
        &self,
        contact_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
    ) -> Result<u64, DomainError> {
        let interactions = self.interactions.read().await;
        Ok(interactions
            .values()
            .filter(|i| matches(i, contact_ids, since))
            .count() as u64)
    }

    async fn create(&self, interaction: Interaction) -> Result<Interaction, DomainError> {
        self.interactions
            .write()
            .await
            .insert(interaction.id, interaction.clone());
        Ok(interaction)
    }

    async fn update(&self, interaction: Interaction) -> Result<Interaction, DomainError> {
        let mut interactions = self.interactions.write().await;
        if !interactions.contains_key(&interaction.id) {
            return Err(DomainError::not_found("Interaction"));
        }
        interactions.insert(interaction.id, interaction.clone());
        Ok(interaction)
    }
}
