use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use kurator_shared::validation::validators;

use crate::domain::entities::audit::{AuditAction, AuditEntity};
use crate::domain::entities::reference::{
    NewReferenceValue, ReferenceCategory, ReferenceUpdate, ReferenceValue,
};
use crate::domain::value_objects::actor::Actor;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::ReferenceRepository;
use crate::services::access::AccessService;
use crate::services::audit::AuditService;
use crate::services::input::required_text;

const LABEL_MAX: usize = 255;

pub struct ReferenceService {
    references: Arc<dyn ReferenceRepository>,
    access: Arc<AccessService>,
    audit: Arc<AuditService>,
}

impl ReferenceService {
    pub fn new(
        references: Arc<dyn ReferenceRepository>,
        access: Arc<AccessService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            references,
            access,
            audit,
        }
    }

    /// Values ordered by sort order then label. Inactive values are listed
    /// for admins only.
    pub async fn list(
        &self,
        actor: &Actor,
        category: Option<ReferenceCategory>,
        include_inactive: bool,
    ) -> DomainResult<Vec<ReferenceValue>> {
        let access = self.access.authorize(actor).await?;
        self.references
            .list(category, include_inactive && access.is_admin())
            .await
    }

    pub async fn create(&self, actor: &Actor, input: NewReferenceValue) -> DomainResult<ReferenceValue> {
        let access = self.access.authorize(actor).await?;
        self.access
            .require_admin(&access, AuditEntity::ReferenceValue)
            .await?;

        let code = input.code.trim().to_string();
        if !validators::is_valid_reference_code(&code) {
            return Err(ValidationError::InvalidFormat {
                field: "code".to_string(),
            }
            .into());
        }
        let label = required_text("label", &input.label, LABEL_MAX)?;
        if self
            .references
            .find_by_code(input.category, &code)
            .await?
            .is_some()
        {
            return Err(ValidationError::DuplicateValue {
                field: "code".to_string(),
            }
            .into());
        }

        let value = self
            .references
            .create(ReferenceValue::new(input.category, code, label, input.sort_order))
            .await?;

        self.audit
            .record_action(
                &access,
                AuditAction::Create,
                AuditEntity::ReferenceValue,
                Some(value.id),
                Some(json!({ "category": value.category.as_str(), "code": value.code })),
            )
            .await?;
        info!(reference_id = %value.id, category = value.category.as_str(), "Reference value created");
        Ok(value)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        update: ReferenceUpdate,
    ) -> DomainResult<ReferenceValue> {
        let access = self.access.authorize(actor).await?;
        self.access
            .require_admin(&access, AuditEntity::ReferenceValue)
            .await?;

        let mut value = self.load(id).await?;
        let mut changed = Vec::new();
        if let Some(label) = &update.label {
            let label = required_text("label", label, LABEL_MAX)?;
            if value.label != label {
                value.label = label;
                changed.push("label");
            }
        }
        if let Some(sort_order) = update.sort_order {
            if value.sort_order != sort_order {
                value.sort_order = sort_order;
                changed.push("sort_order");
            }
        }
        if let Some(is_active) = update.is_active {
            if value.is_active != is_active {
                value.is_active = is_active;
                changed.push("is_active");
            }
        }
        if changed.is_empty() {
            return Ok(value);
        }

        value.updated_at = chrono::Utc::now();
        let value = self.references.update(value).await?;
        self.audit
            .record_action(
                &access,
                AuditAction::Update,
                AuditEntity::ReferenceValue,
                Some(value.id),
                Some(json!({ "changed_fields": changed })),
            )
            .await?;
        Ok(value)
    }

    /// Soft delete
    pub async fn deactivate(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let access = self.access.authorize(actor).await?;
        self.access
            .require_admin(&access, AuditEntity::ReferenceValue)
            .await?;

        let mut value = self.load(id).await?;
        if !value.is_active {
            return Ok(());
        }
        value.is_active = false;
        value.updated_at = chrono::Utc::now();
        self.references.update(value).await?;

        self.audit
            .record_action(&access, AuditAction::Delete, AuditEntity::ReferenceValue, Some(id), None)
            .await
    }

    /// The value must exist, be active and belong to `category`
    pub async fn require_active(
        &self,
        id: Uuid,
        category: ReferenceCategory,
    ) -> DomainResult<ReferenceValue> {
        match self.references.find_by_id(id).await? {
            Some(value) if value.is_active && value.category == category => Ok(value),
            _ => Err(ValidationError::InvalidReference {
                field: format!("{}_id", category.as_str()),
            }
            .into()),
        }
    }

    async fn load(&self, id: Uuid) -> DomainResult<ReferenceValue> {
        self.references
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ReferenceValue"))
    }
}
