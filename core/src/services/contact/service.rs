use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use kurator_shared::PaginatedResponse;

use crate::domain::entities::audit::{AuditAction, AuditEntity};
use crate::domain::entities::contact::{
    Contact, ContactFilter, ContactStatusHistory, ContactUpdate, NewContact,
};
use crate::domain::entities::reference::ReferenceCategory;
use crate::domain::entities::user::UserRole;
use crate::domain::value_objects::access::Access;
use crate::domain::value_objects::actor::Actor;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{BlockRepository, ContactQuery, ContactRepository, UserRepository};
use crate::services::access::AccessService;
use crate::services::audit::AuditService;
use crate::services::input::{clearable, optional_email, optional_phone, optional_text, required_text};
use crate::services::reference::ReferenceService;

const NAME_MAX: usize = 255;
const NOTES_MAX: usize = 4000;

pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
    blocks: Arc<dyn BlockRepository>,
    users: Arc<dyn UserRepository>,
    references: Arc<ReferenceService>,
    access: Arc<AccessService>,
    audit: Arc<AuditService>,
}

impl ContactService {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        blocks: Arc<dyn BlockRepository>,
        users: Arc<dyn UserRepository>,
        references: Arc<ReferenceService>,
        access: Arc<AccessService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            contacts,
            blocks,
            users,
            references,
            access,
            audit,
        }
    }

    /// Visible contacts ordered by full name. Search runs on decrypted
    /// values, so it happens here rather than in storage.
    pub async fn list(
        &self,
        actor: &Actor,
        filter: ContactFilter,
    ) -> DomainResult<PaginatedResponse<Contact>> {
        let access = self.access.authorize(actor).await?;
        let query = ContactQuery {
            scope: access.scope.clone(),
            block_id: filter.block_id,
            status_id: filter.status_id,
            responsible_user_id: filter.responsible_user_id,
            include_inactive: filter.include_inactive && access.is_admin(),
        };

        let mut contacts: Vec<Contact> = self
            .contacts
            .list(&query)
            .await?
            .into_iter()
            .filter(|c| filter.matches_search(c))
            .collect();
        contacts.sort_by(|a, b| {
            a.full_name
                .to_lowercase()
                .cmp(&b.full_name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });

        Ok(filter.pagination.apply(contacts))
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> DomainResult<Contact> {
        let access = self.access.authorize(actor).await?;
        self.visible(&access, id).await
    }

    pub async fn create(&self, actor: &Actor, input: NewContact) -> DomainResult<Contact> {
        let access = self.access.authorize(actor).await?;
        self.access
            .require_writer(&access, AuditEntity::Contact)
            .await?;
        self.require_block(&access, input.block_id).await?;

        let responsible_user_id = match input.responsible_user_id {
            Some(user_id) => Some(self.require_active_user(user_id).await?),
            None if access.role == UserRole::Curator => Some(access.user_id),
            None => None,
        };
        if let Some(status_id) = input.influence_status_id {
            self.references
                .require_active(status_id, ReferenceCategory::InfluenceStatus)
                .await?;
        }

        let input = NewContact {
            full_name: required_text("full_name", &input.full_name, NAME_MAX)?,
            position: optional_text("position", input.position, NAME_MAX)?,
            organization: optional_text("organization", input.organization, NAME_MAX)?,
            phone: optional_phone(input.phone)?,
            email: optional_email(input.email)?,
            notes: optional_text("notes", input.notes, NOTES_MAX)?,
            responsible_user_id,
            ..input
        };
        self.ensure_unique_name(input.block_id, &input.full_name, None)
            .await?;

        let contact = Contact::new(input, access.user_id);
        let initial_status = contact.influence_status_id.map(|status_id| {
            ContactStatusHistory::new(contact.id, None, status_id, access.user_id, None, None)
        });
        let contact = self.contacts.create(contact, initial_status).await?;

        self.audit
            .record_action(
                &access,
                AuditAction::Create,
                AuditEntity::Contact,
                Some(contact.id),
                Some(json!({
                    "block_id": contact.block_id,
                    "influence_status_id": contact.influence_status_id,
                })),
            )
            .await?;
        info!(contact_id = %contact.id, block_id = %contact.block_id, "Contact created");
        Ok(contact)
    }

    /// Partial update. A status change here is recorded in the history
    /// like any other transition.
    pub async fn update(&self, actor: &Actor, id: Uuid, update: ContactUpdate) -> DomainResult<Contact> {
        let access = self.access.authorize(actor).await?;
        let mut contact = self.editable(&access, id).await?;

        let update = ContactUpdate {
            full_name: update
                .full_name
                .map(|name| required_text("full_name", &name, NAME_MAX))
                .transpose()?,
            position: clearable(update.position, |v| optional_text("position", v, NAME_MAX))?,
            organization: clearable(update.organization, |v| {
                optional_text("organization", v, NAME_MAX)
            })?,
            phone: clearable(update.phone, optional_phone)?,
            email: clearable(update.email, optional_email)?,
            notes: clearable(update.notes, |v| optional_text("notes", v, NOTES_MAX))?,
            ..update
        };

        if let Some(block_id) = update.block_id {
            if block_id != contact.block_id {
                self.require_block(&access, block_id).await?;
            }
        }
        if let Some(Some(user_id)) = update.responsible_user_id {
            if contact.responsible_user_id != Some(user_id) {
                self.require_active_user(user_id).await?;
            }
        }
        let new_status = match update.influence_status_id {
            Some(status_id) if contact.influence_status_id != Some(status_id) => {
                self.references
                    .require_active(status_id, ReferenceCategory::InfluenceStatus)
                    .await?;
                Some(status_id)
            }
            _ => None,
        };

        let previous_status = contact.influence_status_id;
        let mut changed = contact.apply_update(&update, access.user_id);
        if changed.contains(&"full_name") || changed.contains(&"block_id") {
            self.ensure_unique_name(contact.block_id, &contact.full_name, Some(id))
                .await?;
        }

        let contact = match new_status {
            Some(status_id) => {
                let entry = contact.change_status(status_id, access.user_id, None, None);
                changed.push("influence_status_id");
                self.contacts.save_status_change(contact, entry).await?
            }
            None if changed.is_empty() => return Ok(contact),
            None => self.contacts.update(contact).await?,
        };

        self.audit
            .record_action(
                &access,
                AuditAction::Update,
                AuditEntity::Contact,
                Some(id),
                Some(json!({ "changed_fields": changed })),
            )
            .await?;
        if let Some(status_id) = new_status {
            self.audit
                .record_action(
                    &access,
                    AuditAction::StatusChange,
                    AuditEntity::Contact,
                    Some(id),
                    Some(json!({ "from": previous_status, "to": status_id })),
                )
                .await?;
        }
        Ok(contact)
    }

    pub async fn change_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status_id: Uuid,
        reason: Option<String>,
    ) -> DomainResult<Contact> {
        let access = self.access.authorize(actor).await?;
        let mut contact = self.editable(&access, id).await?;

        if contact.influence_status_id == Some(status_id) {
            return Err(DomainError::rule("contact already has this status"));
        }
        self.references
            .require_active(status_id, ReferenceCategory::InfluenceStatus)
            .await?;
        let reason = optional_text("reason", reason, NOTES_MAX)?;

        let previous = contact.influence_status_id;
        let entry = contact.change_status(status_id, access.user_id, None, reason);
        let contact = self.contacts.save_status_change(contact, entry).await?;

        self.audit
            .record_action(
                &access,
                AuditAction::StatusChange,
                AuditEntity::Contact,
                Some(id),
                Some(json!({ "from": previous, "to": status_id })),
            )
            .await?;
        debug!(contact_id = %id, "Contact status changed");
        Ok(contact)
    }

    /// Newest first
    pub async fn status_history(
        &self,
        actor: &Actor,
        id: Uuid,
    ) -> DomainResult<Vec<ContactStatusHistory>> {
        let access = self.access.authorize(actor).await?;
        self.visible(&access, id).await?;
        self.contacts.status_history(id).await
    }

    /// Soft delete
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let access = self.access.authorize(actor).await?;
        let mut contact = self.editable(&access, id).await?;
        if !contact.is_active {
            return Ok(());
        }

        contact.soft_delete(access.user_id);
        self.contacts.update(contact).await?;

        self.audit
            .record_action(&access, AuditAction::Delete, AuditEntity::Contact, Some(id), None)
            .await?;
        info!(contact_id = %id, "Contact deleted");
        Ok(())
    }

    /// Admin only. Fails if an active namesake now occupies the block.
    pub async fn restore(&self, actor: &Actor, id: Uuid) -> DomainResult<Contact> {
        let access = self.access.authorize(actor).await?;
        self.access
            .require_admin(&access, AuditEntity::Contact)
            .await?;

        let mut contact = self.load(id).await?;
        if contact.is_active {
            return Ok(contact);
        }
        self.ensure_unique_name(contact.block_id, &contact.full_name, Some(id))
            .await?;

        contact.restore(access.user_id);
        let contact = self.contacts.update(contact).await?;

        self.audit
            .record_action(&access, AuditAction::Restore, AuditEntity::Contact, Some(id), None)
            .await?;
        Ok(contact)
    }

    /// Load a contact the caller may read. Soft-deleted contacts do not
    /// exist for non-admins; out-of-scope reads are denied and audited.
    pub(crate) async fn visible(&self, access: &Access, id: Uuid) -> DomainResult<Contact> {
        let contact = self.load(id).await?;
        if !contact.is_active && !access.is_admin() {
            return Err(DomainError::not_found("Contact"));
        }
        if !access.can_see_contact(&contact) {
            return Err(self
                .access
                .deny(access, AuditEntity::Contact, Some(id), "contact is outside your blocks")
                .await);
        }
        Ok(contact)
    }

    /// Load a contact the caller may modify
    pub(crate) async fn editable(&self, access: &Access, id: Uuid) -> DomainResult<Contact> {
        self.access
            .require_writer(access, AuditEntity::Contact)
            .await?;
        let contact = self.visible(access, id).await?;
        if !access.can_edit_contact(&contact) {
            return Err(self
                .access
                .deny(access, AuditEntity::Contact, Some(id), "contact is read-only for you")
                .await);
        }
        Ok(contact)
    }

    async fn load(&self, id: Uuid) -> DomainResult<Contact> {
        self.contacts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Contact"))
    }

    /// Target block must be active and reachable by the caller
    async fn require_block(&self, access: &Access, block_id: Uuid) -> DomainResult<()> {
        match self.blocks.find_by_id(block_id).await? {
            Some(block) if block.is_active => {}
            _ => {
                return Err(ValidationError::InvalidReference {
                    field: "block_id".to_string(),
                }
                .into())
            }
        }
        if !access.has_block(block_id) {
            return Err(self
                .access
                .deny(access, AuditEntity::Block, Some(block_id), "block is not assigned to you")
                .await);
        }
        Ok(())
    }

    async fn require_active_user(&self, user_id: Uuid) -> DomainResult<Uuid> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user.id),
            _ => Err(ValidationError::InvalidReference {
                field: "responsible_user_id".to_string(),
            }
            .into()),
        }
    }

    async fn ensure_unique_name(
        &self,
        block_id: Uuid,
        full_name: &str,
        exclude_id: Option<Uuid>,
    ) -> DomainResult<()> {
        if self
            .contacts
            .exists_with_name(block_id, full_name, exclude_id)
            .await?
        {
            return Err(ValidationError::DuplicateValue {
                field: "full_name".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
