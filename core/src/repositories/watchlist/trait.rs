//! Watchlist repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::watchlist::WatchlistEntry;
use crate::errors::DomainError;

#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WatchlistEntry>, DomainError>;

    /// All entries; filtering and ordering happen after decryption
    async fn list(&self, include_inactive: bool) -> Result<Vec<WatchlistEntry>, DomainError>;

    /// Whether an active entry has exactly this full name
    async fn exists_with_name(
        &self,
        full_name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError>;

    async fn create(&self, entry: WatchlistEntry) -> Result<WatchlistEntry, DomainError>;

    async fn update(&self, entry: WatchlistEntry) -> Result<WatchlistEntry, DomainError>;
}
