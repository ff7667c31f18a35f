use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::audit::{AuditAction, AuditEntity};
use crate::domain::entities::user::UserRole;
use crate::domain::value_objects::access::{Access, AccessScope};
use crate::domain::value_objects::actor::Actor;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{BlockRepository, UserRepository};
use crate::services::audit::AuditService;

/// Turns a token-derived `Actor` into an `Access` checked against the store
pub struct AccessService {
    users: Arc<dyn UserRepository>,
    blocks: Arc<dyn BlockRepository>,
    audit: Arc<AuditService>,
}

impl AccessService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        blocks: Arc<dyn BlockRepository>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            users,
            blocks,
            audit,
        }
    }

    /// Reload the user and compute their scope. The stored role wins over
    /// the role carried in the token.
    pub async fn authorize(&self, actor: &Actor) -> DomainResult<Access> {
        let user = match self.users.find_by_id(actor.user_id).await? {
            Some(user) if user.is_active => user,
            _ => {
                debug!(user_id = %actor.user_id, "Rejecting token for missing or inactive user");
                return Err(DomainError::Unauthorized);
            }
        };

        let scope = match user.role {
            UserRole::Admin => AccessScope::All,
            UserRole::Curator | UserRole::Viewer => AccessScope::Restricted {
                user_id: user.id,
                block_ids: self.blocks.block_ids_for_curator(user.id).await?,
            },
        };

        Ok(Access {
            user_id: user.id,
            role: user.role,
            scope,
            origin: actor.origin.clone(),
        })
    }

    pub async fn require_admin(&self, access: &Access, entity: AuditEntity) -> DomainResult<()> {
        if access.is_admin() {
            return Ok(());
        }
        Err(self
            .deny(access, entity, None, "administrator role required")
            .await)
    }

    pub async fn require_writer(&self, access: &Access, entity: AuditEntity) -> DomainResult<()> {
        if access.can_write() {
            return Ok(());
        }
        Err(self.deny(access, entity, None, "read-only role").await)
    }

    /// Record an `AccessDenied` entry and return the matching error
    pub async fn deny(
        &self,
        access: &Access,
        entity: AuditEntity,
        entity_id: Option<Uuid>,
        reason: &str,
    ) -> DomainError {
        let entry = AuditService::entry(
            access,
            AuditAction::AccessDenied,
            entity,
            entity_id,
            Some(json!({ "reason": reason })),
        );
        if let Err(e) = self.audit.record(entry).await {
            warn!(user_id = %access.user_id, error = %e, "Failed to record access denial");
        }
        DomainError::forbidden(reason)
    }
}
