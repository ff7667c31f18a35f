//! In-memory implementation of BlockRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::block::Block;
use crate::errors::DomainError;

use super::BlockRepository;

#[derive(Clone, Default)]
pub struct MockBlockRepository {
    blocks: Arc<RwLock<HashMap<Uuid, Block>>>,
}

impl MockBlockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, block: Block) {
        self.blocks.write().await.insert(block.id, block);
    }
}

#[async_trait]
impl BlockRepository for MockBlockRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Block>, DomainError> {
        Ok(self.blocks.read().await.get(&id).cloned())
    }

    async fn find_active_by_name(&self, name: &str) -> Result<Option<Block>, DomainError> {
        let blocks = self.blocks.read().await;
        Ok(blocks
            .values()
            .find(|b| b.is_active && b.name == name)
            .cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Block>, DomainError> {
        let blocks = self.blocks.read().await;
        let mut result: Vec<Block> = blocks
            .values()
            .filter(|b| include_inactive || b.is_active)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn create(&self, block: Block) -> Result<Block, DomainError> {
        self.blocks.write().await.insert(block.id, block.clone());
        Ok(block)
    }

    async fn update(&self, block: Block) -> Result<Block, DomainError> {
        let mut blocks = self.blocks.write().await;
        if !blocks.contains_key(&block.id) {
            return Err(DomainError::not_found("Block"));
        }
        blocks.insert(block.id, block.clone());
        Ok(block)
    }

    async fn block_ids_for_curator(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let blocks = self.blocks.read().await;
        Ok(blocks
            .values()
            .filter(|b| b.is_active && b.has_curator(user_id))
            .map(|b| b.id)
            .collect())
    }
}
