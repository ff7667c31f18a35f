//! The watchlist is shared across blocks: every authenticated user can read
//! it, curators and admins maintain it.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use kurator_shared::PaginatedResponse;

use crate::domain::entities::audit::{AuditAction, AuditEntity};
use crate::domain::entities::reference::ReferenceCategory;
use crate::domain::entities::watchlist::{
    NewWatchlistEntry, WatchlistEntry, WatchlistFilter, WatchlistUpdate,
};
use crate::domain::value_objects::access::Access;
use crate::domain::value_objects::actor::Actor;
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::{UserRepository, WatchlistRepository};
use crate::services::access::AccessService;
use crate::services::audit::AuditService;
use crate::services::input::{clearable, optional_text, required_text};
use crate::services::reference::ReferenceService;

const NAME_MAX: usize = 255;
const NOTES_MAX: usize = 4000;

pub struct WatchlistService {
    watchlist: Arc<dyn WatchlistRepository>,
    users: Arc<dyn UserRepository>,
    references: Arc<ReferenceService>,
    access: Arc<AccessService>,
    audit: Arc<AuditService>,
}

impl WatchlistService {
    pub fn new(
        watchlist: Arc<dyn WatchlistRepository>,
        users: Arc<dyn UserRepository>,
        references: Arc<ReferenceService>,
        access: Arc<AccessService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            watchlist,
            users,
            references,
            access,
            audit,
        }
    }

    /// Ordered by risk, critical first, then by name
    pub async fn list(
        &self,
        actor: &Actor,
        filter: WatchlistFilter,
    ) -> DomainResult<PaginatedResponse<WatchlistEntry>> {
        let access = self.access.authorize(actor).await?;
        let filter = WatchlistFilter {
            include_inactive: filter.include_inactive && access.is_admin(),
            ..filter
        };

        let mut entries: Vec<WatchlistEntry> = self
            .watchlist
            .list(filter.include_inactive)
            .await?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        entries.sort_by(|a, b| {
            a.risk_level
                .priority()
                .cmp(&b.risk_level.priority())
                .then_with(|| a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()))
        });

        Ok(filter.pagination.apply(entries))
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> DomainResult<WatchlistEntry> {
        let access = self.access.authorize(actor).await?;
        self.load(&access, id).await
    }

    pub async fn create(&self, actor: &Actor, input: NewWatchlistEntry) -> DomainResult<WatchlistEntry> {
        let access = self.writer(actor).await?;

        let full_name = required_text("full_name", &input.full_name, NAME_MAX)?;
        if let Some(sphere_id) = input.sphere_id {
            self.references
                .require_active(sphere_id, ReferenceCategory::RiskSphere)
                .await?;
        }
        if let Some(owner_id) = input.owner_id {
            self.require_active_user(owner_id).await?;
        }
        self.ensure_unique_name(&full_name, None).await?;

        let input = NewWatchlistEntry {
            full_name,
            source: optional_text("source", input.source, NAME_MAX)?,
            notes: optional_text("notes", input.notes, NOTES_MAX)?,
            ..input
        };
        let entry = WatchlistEntry::new(input, access.user_id, Utc::now().date_naive());
        let entry = self.watchlist.create(entry).await?;

        self.audit
            .record_action(
                &access,
                AuditAction::Create,
                AuditEntity::Watchlist,
                Some(entry.id),
                Some(json!({
                    "risk_level": entry.risk_level.as_str(),
                    "next_check_date": entry.next_check_date,
                })),
            )
            .await?;
        info!(entry_id = %entry.id, risk_level = entry.risk_level.as_str(), "Watchlist entry created");
        Ok(entry)
    }

    /// A frequency change reschedules the next check from the last check,
    /// or from today if the entry was never checked
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        update: WatchlistUpdate,
    ) -> DomainResult<WatchlistEntry> {
        let access = self.writer(actor).await?;
        let mut entry = self.load(&access, id).await?;

        let update = WatchlistUpdate {
            full_name: update
                .full_name
                .map(|name| required_text("full_name", &name, NAME_MAX))
                .transpose()?,
            source: clearable(update.source, |v| optional_text("source", v, NAME_MAX))?,
            notes: clearable(update.notes, |v| optional_text("notes", v, NOTES_MAX))?,
            ..update
        };
        if let Some(Some(sphere_id)) = update.sphere_id {
            if entry.sphere_id != Some(sphere_id) {
                self.references
                    .require_active(sphere_id, ReferenceCategory::RiskSphere)
                    .await?;
            }
        }
        if let Some(owner_id) = update.owner_id {
            if entry.owner_id != owner_id {
                self.require_active_user(owner_id).await?;
            }
        }

        let changed = entry.apply_update(&update, Utc::now().date_naive());
        if changed.is_empty() {
            return Ok(entry);
        }
        if changed.contains(&"full_name") {
            self.ensure_unique_name(&entry.full_name, Some(id)).await?;
        }
        let entry = self.watchlist.update(entry).await?;

        self.audit
            .record_action(
                &access,
                AuditAction::Update,
                AuditEntity::Watchlist,
                Some(id),
                Some(json!({ "changed_fields": changed })),
            )
            .await?;
        Ok(entry)
    }

    /// Soft delete
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> DomainResult<()> {
        let access = self.writer(actor).await?;
        let mut entry = self.load(&access, id).await?;
        if !entry.is_active {
            return Ok(());
        }

        entry.is_active = false;
        entry.updated_at = Utc::now();
        self.watchlist.update(entry).await?;

        self.audit
            .record_action(&access, AuditAction::Delete, AuditEntity::Watchlist, Some(id), None)
            .await
    }

    /// Record a completed check and schedule the next one. A note is
    /// appended to the entry's notes with the check date.
    pub async fn mark_checked(
        &self,
        actor: &Actor,
        id: Uuid,
        note: Option<String>,
    ) -> DomainResult<WatchlistEntry> {
        let access = self.writer(actor).await?;
        let mut entry = self.load(&access, id).await?;
        if !entry.is_active {
            return Err(DomainError::rule("cannot check an inactive watchlist entry"));
        }
        let note = optional_text("note", note, NOTES_MAX)?;

        let now = Utc::now();
        entry.mark_checked(now);
        if let Some(note) = &note {
            let line = format!("[{}] {}", now.date_naive(), note);
            let notes = match entry.notes.take() {
                Some(existing) => format!("{}\n{}", existing, line),
                None => line,
            };
            if notes.chars().count() > NOTES_MAX {
                return Err(ValidationError::InvalidLength {
                    field: "notes".to_string(),
                    min: 0,
                    max: NOTES_MAX,
                }
                .into());
            }
            entry.notes = Some(notes);
        }
        let entry = self.watchlist.update(entry).await?;

        self.audit
            .record_action(
                &access,
                AuditAction::Check,
                AuditEntity::Watchlist,
                Some(id),
                Some(json!({
                    "next_check_date": entry.next_check_date,
                    "note_added": note.is_some(),
                })),
            )
            .await?;
        Ok(entry)
    }

    /// Active entries due on or before `today`, earliest first
    pub async fn due(&self, actor: &Actor, today: NaiveDate) -> DomainResult<Vec<WatchlistEntry>> {
        self.access.authorize(actor).await?;
        let mut entries: Vec<WatchlistEntry> = self
            .watchlist
            .list(false)
            .await?
            .into_iter()
            .filter(|e| e.is_due(today))
            .collect();
        entries.sort_by(|a, b| {
            a.next_check_date
                .cmp(&b.next_check_date)
                .then_with(|| a.risk_level.priority().cmp(&b.risk_level.priority()))
        });
        Ok(entries)
    }

    async fn writer(&self, actor: &Actor) -> DomainResult<Access> {
        let access = self.access.authorize(actor).await?;
        self.access
            .require_writer(&access, AuditEntity::Watchlist)
            .await?;
        Ok(access)
    }

    async fn load(&self, access: &Access, id: Uuid) -> DomainResult<WatchlistEntry> {
        match self.watchlist.find_by_id(id).await? {
            Some(entry) if entry.is_active || access.is_admin() => Ok(entry),
            _ => Err(DomainError::not_found("WatchlistEntry")),
        }
    }

    async fn require_active_user(&self, user_id: Uuid) -> DomainResult<()> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(()),
            _ => Err(ValidationError::InvalidReference {
                field: "owner_id".to_string(),
            }
            .into()),
        }
    }

    async fn ensure_unique_name(&self, full_name: &str, exclude_id: Option<Uuid>) -> DomainResult<()> {
        if self.watchlist.exists_with_name(full_name, exclude_id).await? {
            return Err(ValidationError::DuplicateValue {
                field: "full_name".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
