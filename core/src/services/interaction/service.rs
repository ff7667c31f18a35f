use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::audit::{AuditAction, AuditEntity};
use crate::domain::entities::interaction::{
    Interaction, InteractionUpdate, NewInteraction, StatusChange,
};
use crate::domain::entities::reference::ReferenceCategory;
use crate::domain::value_objects::access::Access;
use crate::domain::value_objects::actor::Actor;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{ContactRepository, InteractionRepository};
use crate::services::access::AccessService;
use crate::services::audit::AuditService;
use crate::services::contact::ContactService;
use crate::services::input::{clearable, optional_text};
use crate::services::reference::ReferenceService;

/// How far in the future `occurred_at` may lie, for clock drift
pub const MAX_FUTURE_SKEW_MINUTES: i64 = 5;

const COMMENT_MAX: usize = 4000;

pub struct InteractionService {
    interactions: Arc<dyn InteractionRepository>,
    contacts: Arc<dyn ContactRepository>,
    contact_service: Arc<ContactService>,
    references: Arc<ReferenceService>,
    access: Arc<AccessService>,
    audit: Arc<AuditService>,
}

impl InteractionService {
    pub fn new(
        interactions: Arc<dyn InteractionRepository>,
        contacts: Arc<dyn ContactRepository>,
        contact_service: Arc<ContactService>,
        references: Arc<ReferenceService>,
        access: Arc<AccessService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            interactions,
            contacts,
            contact_service,
            references,
            access,
            audit,
        }
    }

    /// Active interactions of a visible contact, newest first
    pub async fn list_for_contact(&self, actor: &Actor, contact_id: Uuid) -> DomainResult<Vec<Interaction>> {
        let access = self.access.authorize(actor).await?;
        self.contact_service.visible(&access, contact_id).await?;
        self.interactions.list_for_contact(contact_id, false).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> DomainResult<Interaction> {
        let access = self.access.authorize(actor).await?;
        let interaction = self.load(&access, id).await?;
        self.contact_service
            .visible(&access, interaction.contact_id)
            .await?;
        Ok(interaction)
    }

    /// Log an interaction and carry its effects over to the contact:
    /// last interaction time, next touch date and an optional status change.
    pub async fn create(&self, actor: &Actor, input: NewInteraction) -> DomainResult<Interaction> {
        let access = self.access.authorize(actor).await?;
        let mut contact = self.contact_service.editable(&access, input.contact_id).await?;
        if !contact.is_active {
            return Err(DomainError::rule("cannot log interactions for a deleted contact"));
        }

        let now = Utc::now();
        let occurred_at = input.occurred_at.unwrap_or(now);
        check_not_in_future(occurred_at, now)?;
        self.check_references(input.interaction_type_id, input.channel_id)
            .await?;
        let status_change = match input.new_status_id {
            Some(status_id) if contact.influence_status_id != Some(status_id) => {
                self.references
                    .require_active(status_id, ReferenceCategory::InfluenceStatus)
                    .await?;
                Some(StatusChange {
                    from_status_id: contact.influence_status_id,
                    to_status_id: status_id,
                })
            }
            _ => None,
        };
        let comment = optional_text("comment", input.comment, COMMENT_MAX)?;
        let reason = optional_text("reason", input.status_reason, COMMENT_MAX)?;

        let mut interaction = Interaction::new(contact.id, access.user_id, occurred_at);
        interaction.interaction_type_id = input.interaction_type_id;
        interaction.channel_id = input.channel_id;
        interaction.comment = comment;
        interaction.next_touch_date = input.next_touch_date;
        interaction.status_change = status_change;
        let interaction = self.interactions.create(interaction).await?;

        contact.record_interaction(occurred_at);
        if let Some(date) = input.next_touch_date {
            contact.next_touch_date = Some(date);
        }
        contact.updated_by = access.user_id;
        contact.updated_at = now;
        match status_change {
            Some(change) => {
                let entry = contact.change_status(
                    change.to_status_id,
                    access.user_id,
                    Some(interaction.id),
                    reason,
                );
                self.contacts.save_status_change(contact, entry).await?;
            }
            None => {
                self.contacts.update(contact).await?;
            }
        }

        self.audit
            .record_action(
                &access,
                AuditAction::Create,
                AuditEntity::Interaction,
                Some(interaction.id),
                Some(json!({ "contact_id": interaction.contact_id })),
            )
            .await?;
        if let Some(change) = status_change {
            self.audit
                .record_action(
                    &access,
                    AuditAction::StatusChange,
                    AuditEntity::Contact,
                    Some(interaction.contact_id),
                    Some(json!({
                        "from": change.from_status_id,
                        "to": change.to_status_id,
                        "interaction_id": interaction.id,
                    })),
                )
                .await?;
        }
        info!(interaction_id = %interaction.id, contact_id = %interaction.contact_id, "Interaction logged");
        Ok(interaction)
    }

    /// Author or admin. The status payload cannot be edited.
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        update: InteractionUpdate,
    ) -> DomainResult<Interaction> {
        let access = self.access.authorize(actor).await?;
        let mut interaction = self.owned(&access, id).await?;

        if let Some(at) = update.occurred_at {
            check_not_in_future(at, Utc::now())?;
        }
        self.check_references(
            update.interaction_type_id.flatten(),
            update.channel_id.flatten(),
        )
        .await?;
        let update = InteractionUpdate {
            comment: clearable(update.comment, |v| optional_text("comment", v, COMMENT_MAX))?,
            ..update
        };

        let changed = interaction.apply_update(&update);
        if changed.is_empty() {
            return Ok(interaction);
        }
        let interaction = self.interactions.update(interaction).await?;
        if changed.contains(&"occurred_at") {
            self.refresh_last_interaction(interaction.contact_id, access.user_id)
                .await?;
        }

        self.audit
            .record_action(
                &access,
                AuditAction::Update,
                AuditEntity::Interaction,
                Some(id),
                Some(json!({ "changed_fields": changed })),
            )
            .await?;
        Ok(interaction)
    }

    /// Author or admin; soft delete
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let access = self.access.authorize(actor).await?;
        let mut interaction = self.owned(&access, id).await?;
        if !interaction.is_active {
            return Ok(());
        }

        interaction.is_active = false;
        interaction.updated_at = Utc::now();
        let interaction = self.interactions.update(interaction).await?;
        self.refresh_last_interaction(interaction.contact_id, access.user_id)
            .await?;

        self.audit
            .record_action(&access, AuditAction::Delete, AuditEntity::Interaction, Some(id), None)
            .await
    }

    async fn load(&self, access: &Access, id: Uuid) -> DomainResult<Interaction> {
        match self.interactions.find_by_id(id).await? {
            Some(interaction) if interaction.is_active || access.is_admin() => Ok(interaction),
            _ => Err(DomainError::not_found("Interaction")),
        }
    }

    /// Interaction the caller may modify
    async fn owned(&self, access: &Access, id: Uuid) -> DomainResult<Interaction> {
        self.access
            .require_writer(access, AuditEntity::Interaction)
            .await?;
        let interaction = self.load(access, id).await?;
        self.contact_service
            .visible(access, interaction.contact_id)
            .await?;
        if !access.is_admin() && !interaction.is_authored_by(access.user_id) {
            return Err(self
                .access
                .deny(access, AuditEntity::Interaction, Some(id), "only the author can change an interaction")
                .await);
        }
        Ok(interaction)
    }

    async fn check_references(&self, type_id: Option<Uuid>, channel_id: Option<Uuid>) -> DomainResult<()> {
        if let Some(type_id) = type_id {
            self.references
                .require_active(type_id, ReferenceCategory::InteractionType)
                .await?;
        }
        if let Some(channel_id) = channel_id {
            self.references
                .require_active(channel_id, ReferenceCategory::InteractionChannel)
                .await?;
        }
        Ok(())
    }

    /// Recompute the contact's last interaction time from what remains active
    async fn refresh_last_interaction(&self, contact_id: Uuid, by: Uuid) -> DomainResult<()> {
        let Some(mut contact) = self.contacts.find_by_id(contact_id).await? else {
            return Ok(());
        };
        let latest = self
            .interactions
            .list_for_contact(contact_id, false)
            .await?
            .iter()
            .map(|i| i.occurred_at)
            .max();
        if contact.last_interaction_at != latest {
            contact.last_interaction_at = latest;
            contact.updated_by = by;
            contact.updated_at = Utc::now();
            self.contacts.update(contact).await?;
        }
        Ok(())
    }
}

fn check_not_in_future(occurred_at: DateTime<Utc>, now: DateTime<Utc>) -> DomainResult<()> {
    if occurred_at > now + Duration::minutes(MAX_FUTURE_SKEW_MINUTES) {
        return Err(ValidationError::InvalidDate {
            field: "occurred_at".to_string(),
        }
        .into());
    }
    Ok(())
}
