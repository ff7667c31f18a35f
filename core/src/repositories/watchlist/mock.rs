//! In-memory implementation of WatchlistRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::watchlist::WatchlistEntry;
use crate::errors::DomainError;

use super::WatchlistRepository;

#[derive(Clone, Default)]
pub struct MockWatchlistRepository {
    entries: Arc<RwLock<HashMap<Uuid, WatchlistEntry>>>,
}

impl MockWatchlistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, entry: WatchlistEntry) {
        self.entries.write().await.insert(entry.id, entry);
    }
}

#[async_trait]
impl WatchlistRepository for MockWatchlistRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WatchlistEntry>, DomainError> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<WatchlistEntry>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|e| include_inactive || e.is_active)
            .cloned()
            .collect())
    }

    async fn exists_with_name(
        &self,
        full_name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .any(|e| e.is_active && e.full_name == full_name && Some(e.id) != exclude_id))
    }

    async fn create(&self, entry: WatchlistEntry) -> Result<WatchlistEntry, DomainError> {
        self.entries.write().await.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update(&self, entry: WatchlistEntry) -> Result<WatchlistEntry, DomainError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&entry.id) {
            return Err(DomainError::not_found("WatchlistEntry"));
        }
        entries.insert(entry.id, entry.clone());
        Ok(entry)
    }
}
