use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::audit::{AuditAction, AuditEntity};
use crate::domain::entities::block::{Block, BlockUpdate, NewBlock};
use crate::domain::entities::user::UserRole;
use crate::domain::value_objects::access::Access;
use crate::domain::value_objects::actor::Actor;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{BlockRepository, ContactRepository, UserRepository};
use crate::services::access::AccessService;
use crate::services::audit::AuditService;
use crate::services::input::{optional_text, required_text};

const NAME_MAX: usize = 255;
const DESCRIPTION_MAX: usize = 2000;

pub struct BlockService {
    blocks: Arc<dyn BlockRepository>,
    users: Arc<dyn UserRepository>,
    contacts: Arc<dyn ContactRepository>,
    access: Arc<AccessService>,
    audit: Arc<AuditService>,
}

impl BlockService {
    pub fn new(
        blocks: Arc<dyn BlockRepository>,
        users: Arc<dyn UserRepository>,
        contacts: Arc<dyn ContactRepository>,
        access: Arc<AccessService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            blocks,
            users,
            contacts,
            access,
            audit,
        }
    }

    /// Admins see every block, everyone else only the blocks assigned to them
    pub async fn list(&self, actor: &Actor, include_inactive: bool) -> DomainResult<Vec<Block>> {
        let access = self.access.authorize(actor).await?;
        if access.is_admin() {
            return self.blocks.list(include_inactive).await;
        }
        let blocks = self.blocks.list(false).await?;
        Ok(blocks.into_iter().filter(|b| access.has_block(b.id)).collect())
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> DomainResult<Block> {
        let access = self.access.authorize(actor).await?;
        let block = self.load(id).await?;
        if access.is_admin() {
            return Ok(block);
        }
        if !block.is_active {
            return Err(DomainError::not_found("Block"));
        }
        if !access.has_block(id) {
            return Err(self
                .access
                .deny(&access, AuditEntity::Block, Some(id), "block is not assigned to you")
                .await);
        }
        Ok(block)
    }

    pub async fn create(&self, actor: &Actor, input: NewBlock) -> DomainResult<Block> {
        let access = self.admin(actor).await?;

        let name = required_text("name", &input.name, NAME_MAX)?;
        let description = optional_text("description", input.description, DESCRIPTION_MAX)?;
        self.ensure_unique_name(&name, None).await?;

        let block = self.blocks.create(Block::new(name, description)).await?;
        self.audit
            .record_action(&access, AuditAction::Create, AuditEntity::Block, Some(block.id), None)
            .await?;
        info!(block_id = %block.id, "Block created");
        Ok(block)
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, update: BlockUpdate) -> DomainResult<Block> {
        let access = self.admin(actor).await?;
        let mut block = self.load(id).await?;

        let mut changed = Vec::new();
        if let Some(name) = &update.name {
            let name = required_text("name", name, NAME_MAX)?;
            if block.name != name {
                self.ensure_unique_name(&name, Some(id)).await?;
                block.name = name;
                changed.push("name");
            }
        }
        if let Some(description) = update.description {
            let description = optional_text("description", description, DESCRIPTION_MAX)?;
            if block.description != description {
                block.description = description;
                changed.push("description");
            }
        }
        if changed.is_empty() {
            return Ok(block);
        }

        block.updated_at = chrono::Utc::now();
        let block = self.blocks.update(block).await?;
        self.audit
            .record_action(
                &access,
                AuditAction::Update,
                AuditEntity::Block,
                Some(id),
                Some(json!({ "changed_fields": changed })),
            )
            .await?;
        Ok(block)
    }

    /// Replace the curator set. Assignees must be active non-admin users.
    pub async fn assign_curators(
        &self,
        actor: &Actor,
        block_id: Uuid,
        user_ids: Vec<Uuid>,
    ) -> DomainResult<Block> {
        let access = self.admin(actor).await?;
        let mut block = self.load(block_id).await?;
        if !block.is_active {
            return Err(DomainError::rule("cannot assign curators to an inactive block"));
        }

        for user_id in &user_ids {
            match self.users.find_by_id(*user_id).await? {
                Some(user) if user.is_active && user.role != UserRole::Admin => {}
                _ => {
                    return Err(ValidationError::InvalidReference {
                        field: "curator_ids".to_string(),
                    }
                    .into())
                }
            }
        }

        block.assign_curators(user_ids);
        let block = self.blocks.update(block).await?;
        self.audit
            .record_action(
                &access,
                AuditAction::Update,
                AuditEntity::Block,
                Some(block_id),
                Some(json!({ "curator_ids": block.curator_ids })),
            )
            .await?;
        info!(block_id = %block_id, curators = block.curator_ids.len(), "Block curators assigned");
        Ok(block)
    }

    /// Soft delete. Blocks that still hold active contacts stay.
    pub async fn deactivate(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let access = self.admin(actor).await?;
        let mut block = self.load(id).await?;
        if !block.is_active {
            return Ok(());
        }
        if self.contacts.count_active_in_block(id).await? > 0 {
            return Err(DomainError::rule("block still has active contacts"));
        }

        block.is_active = false;
        block.updated_at = chrono::Utc::now();
        self.blocks.update(block).await?;

        self.audit
            .record_action(&access, AuditAction::Delete, AuditEntity::Block, Some(id), None)
            .await
    }

    async fn ensure_unique_name(&self, name: &str, exclude_id: Option<Uuid>) -> DomainResult<()> {
        match self.blocks.find_active_by_name(name).await? {
            Some(existing) if Some(existing.id) != exclude_id => Err(ValidationError::DuplicateValue {
                field: "name".to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }

    async fn admin(&self, actor: &Actor) -> DomainResult<Access> {
        let access = self.access.authorize(actor).await?;
        self.access.require_admin(&access, AuditEntity::Block).await?;
        Ok(access)
    }

    async fn load(&self, id: Uuid) -> DomainResult<Block> {
        self.blocks
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Block"))
    }
}
