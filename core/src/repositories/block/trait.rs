//! Block repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::block::Block;
use crate::errors::DomainError;

#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// Load a block together with its curator assignments
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Block>, DomainError>;

    /// Active block with exactly this name
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Block>, DomainError>;

    /// Blocks ordered by name
    async fn list(&self, include_inactive: bool) -> Result<Vec<Block>, DomainError>;

    async fn create(&self, block: Block) -> Result<Block, DomainError>;

    /// Persist block fields and replace the curator assignment set
    async fn update(&self, block: Block) -> Result<Block, DomainError>;

    /// Ids of active blocks the user is assigned to
    async fn block_ids_for_curator(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError>;
}
