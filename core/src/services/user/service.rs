use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use kurator_shared::validation::validators;

use crate::domain::entities::audit::{AuditAction, AuditEntity};
use crate::domain::entities::user::{NewUser, User, UserRole, UserUpdate};
use crate::domain::value_objects::access::Access;
use crate::domain::value_objects::actor::Actor;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::access::AccessService;
use crate::services::audit::AuditService;
use crate::services::encryption::PasswordHasher;
use crate::services::input::required_text;

const DISPLAY_NAME_MAX: usize = 255;

/// Account management. Every operation requires the Admin role.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    access: Arc<AccessService>,
    audit: Arc<AuditService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        access: Arc<AccessService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            users,
            hasher,
            access,
            audit,
        }
    }

    pub async fn list(&self, actor: &Actor, include_inactive: bool) -> DomainResult<Vec<User>> {
        self.admin(actor).await?;
        self.users.list(include_inactive).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> DomainResult<User> {
        self.admin(actor).await?;
        self.load(id).await
    }

    pub async fn create(&self, actor: &Actor, input: NewUser) -> DomainResult<User> {
        let access = self.admin(actor).await?;

        let login = input.login.trim().to_string();
        if !validators::is_valid_login(&login) {
            return Err(ValidationError::InvalidFormat {
                field: "login".to_string(),
            }
            .into());
        }
        let display_name = required_text("display_name", &input.display_name, DISPLAY_NAME_MAX)?;
        if self.users.find_by_login(&login).await?.is_some() {
            return Err(ValidationError::DuplicateValue {
                field: "login".to_string(),
            }
            .into());
        }
        let password_hash = self.hasher.hash(&input.password)?;

        let user = self
            .users
            .create(User::new(login, display_name, password_hash, input.role))
            .await?;

        self.audit
            .record_action(
                &access,
                AuditAction::Create,
                AuditEntity::User,
                Some(user.id),
                Some(json!({ "login": user.login, "role": user.role.as_str() })),
            )
            .await?;
        info!(user_id = %user.id, role = user.role.as_str(), "User created");
        Ok(user)
    }

    /// An admin cannot demote or deactivate their own account
    pub async fn update(&self, actor: &Actor, id: Uuid, update: UserUpdate) -> DomainResult<User> {
        let access = self.admin(actor).await?;
        let mut user = self.load(id).await?;

        if id == access.user_id {
            if update.role.map_or(false, |role| role != UserRole::Admin) {
                return Err(DomainError::rule("administrators cannot change their own role"));
            }
            if update.is_active == Some(false) {
                return Err(DomainError::rule("administrators cannot deactivate themselves"));
            }
        }

        let mut changed = Vec::new();
        if let Some(display_name) = &update.display_name {
            let display_name = required_text("display_name", display_name, DISPLAY_NAME_MAX)?;
            if user.display_name != display_name {
                user.display_name = display_name;
                changed.push("display_name");
            }
        }
        if let Some(role) = update.role {
            if user.role != role {
                user.role = role;
                changed.push("role");
            }
        }
        if let Some(is_active) = update.is_active {
            if user.is_active != is_active {
                user.is_active = is_active;
                changed.push("is_active");
            }
        }
        if changed.is_empty() {
            return Ok(user);
        }

        user.updated_at = chrono::Utc::now();
        let user = self.users.update(user).await?;
        self.audit
            .record_action(
                &access,
                AuditAction::Update,
                AuditEntity::User,
                Some(id),
                Some(json!({ "changed_fields": changed })),
            )
            .await?;
        Ok(user)
    }

    pub async fn deactivate(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let access = self.admin(actor).await?;
        if id == access.user_id {
            return Err(DomainError::rule("administrators cannot deactivate themselves"));
        }

        let mut user = self.load(id).await?;
        if !user.is_active {
            return Ok(());
        }
        user.deactivate();
        self.users.update(user).await?;

        self.audit
            .record_action(&access, AuditAction::Delete, AuditEntity::User, Some(id), None)
            .await?;
        info!(user_id = %id, "User deactivated");
        Ok(())
    }

    /// Set a new password chosen by an administrator
    pub async fn reset_password(&self, actor: &Actor, id: Uuid, new_password: &str) -> DomainResult<()> {
        let access = self.admin(actor).await?;
        let mut user = self.load(id).await?;

        user.set_password_hash(self.hasher.hash(new_password)?);
        self.users.update(user).await?;

        self.audit
            .record_action(
                &access,
                AuditAction::PasswordChanged,
                AuditEntity::User,
                Some(id),
                Some(json!({ "reset_by_admin": true })),
            )
            .await
    }

    /// Clear failed attempts and any lock
    pub async fn unlock(&self, actor: &Actor, id: Uuid) -> DomainResult<User> {
        let access = self.admin(actor).await?;
        let mut user = self.load(id).await?;

        user.unlock();
        let user = self.users.update(user).await?;

        self.audit
            .record_action(
                &access,
                AuditAction::Update,
                AuditEntity::User,
                Some(id),
                Some(json!({ "unlocked": true })),
            )
            .await?;
        Ok(user)
    }

    async fn admin(&self, actor: &Actor) -> DomainResult<Access> {
        let access = self.access.authorize(actor).await?;
        self.access.require_admin(&access, AuditEntity::User).await?;
        Ok(access)
    }

    async fn load(&self, id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))
    }
}
