//! Curated contacts and their status history.
//!
//! `full_name`, `phone`, `email` and `notes` hold PII. Entities carry
//! plaintext; the storage layer encrypts these columns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kurator_shared::Pagination;

/// Field names whose values must never reach logs or audit details
pub const CONTACT_PII_FIELDS: [&str; 4] = ["full_name", "phone", "email", "notes"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub full_name: String,
    pub position: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub block_id: Uuid,
    pub responsible_user_id: Option<Uuid>,
    pub influence_status_id: Option<Uuid>,
    pub next_touch_date: Option<NaiveDate>,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(input: NewContact, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            full_name: input.full_name.trim().to_string(),
            position: input.position,
            organization: input.organization,
            phone: input.phone,
            email: input.email,
            notes: input.notes,
            block_id: input.block_id,
            responsible_user_id: input.responsible_user_id,
            influence_status_id: input.influence_status_id,
            next_touch_date: input.next_touch_date,
            last_interaction_at: None,
            is_active: true,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the non-status fields of an update and return the names of
    /// fields whose value actually changed.
    pub fn apply_update(&mut self, update: &ContactUpdate, updated_by: Uuid) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if let Some(name) = &update.full_name {
            let name = name.trim();
            if self.full_name != name {
                self.full_name = name.to_string();
                changed.push("full_name");
            }
        }
        set_field(&mut self.position, &update.position, "position", &mut changed);
        set_field(&mut self.organization, &update.organization, "organization", &mut changed);
        set_field(&mut self.phone, &update.phone, "phone", &mut changed);
        set_field(&mut self.email, &update.email, "email", &mut changed);
        set_field(&mut self.notes, &update.notes, "notes", &mut changed);
        if let Some(block_id) = update.block_id {
            if self.block_id != block_id {
                self.block_id = block_id;
                changed.push("block_id");
            }
        }
        set_field(
            &mut self.responsible_user_id,
            &update.responsible_user_id,
            "responsible_user_id",
            &mut changed,
        );
        set_field(
            &mut self.next_touch_date,
            &update.next_touch_date,
            "next_touch_date",
            &mut changed,
        );

        if !changed.is_empty() {
            self.touch(updated_by);
        }
        changed
    }

    /// Move to a new status; returns the history row to persist
    pub fn change_status(
        &mut self,
        new_status_id: Uuid,
        changed_by: Uuid,
        interaction_id: Option<Uuid>,
        reason: Option<String>,
    ) -> ContactStatusHistory {
        let entry = ContactStatusHistory::new(
            self.id,
            self.influence_status_id,
            new_status_id,
            changed_by,
            interaction_id,
            reason,
        );
        self.influence_status_id = Some(new_status_id);
        self.touch(changed_by);
        entry
    }

    /// Keep the latest interaction time; older interactions never move it back
    pub fn record_interaction(&mut self, occurred_at: DateTime<Utc>) {
        if self.last_interaction_at.map_or(true, |last| occurred_at > last) {
            self.last_interaction_at = Some(occurred_at);
        }
    }

    pub fn soft_delete(&mut self, by: Uuid) {
        self.is_active = false;
        self.touch(by);
    }

    pub fn restore(&mut self, by: Uuid) {
        self.is_active = true;
        self.touch(by);
    }

    pub fn is_touch_overdue(&self, today: NaiveDate) -> bool {
        self.next_touch_date.map_or(false, |date| date < today)
    }

    fn touch(&mut self, by: Uuid) {
        self.updated_by = by;
        self.updated_at = Utc::now();
    }
}

fn set_field<T: PartialEq + Clone>(
    target: &mut Option<T>,
    update: &Option<Option<T>>,
    name: &'static str,
    changed: &mut Vec<&'static str>,
) {
    if let Some(value) = update {
        if target != value {
            *target = value.clone();
            changed.push(name);
        }
    }
}

/// Append-only record of an influence status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactStatusHistory {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub old_status_id: Option<Uuid>,
    pub new_status_id: Uuid,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
    pub interaction_id: Option<Uuid>,
    pub reason: Option<String>,
}

impl ContactStatusHistory {
    pub fn new(
        contact_id: Uuid,
        old_status_id: Option<Uuid>,
        new_status_id: Uuid,
        changed_by: Uuid,
        interaction_id: Option<Uuid>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact_id,
            old_status_id,
            new_status_id,
            changed_by,
            changed_at: Utc::now(),
            interaction_id,
            reason,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub full_name: String,
    pub position: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub block_id: Uuid,
    pub responsible_user_id: Option<Uuid>,
    pub influence_status_id: Option<Uuid>,
    pub next_touch_date: Option<NaiveDate>,
}

/// Partial contact update. For `Option<Option<T>>` fields the outer `None`
/// leaves the value alone and `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub full_name: Option<String>,
    pub position: Option<Option<String>>,
    pub organization: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub block_id: Option<Uuid>,
    pub responsible_user_id: Option<Option<Uuid>>,
    pub influence_status_id: Option<Uuid>,
    pub next_touch_date: Option<Option<NaiveDate>>,
}

/// List parameters for contacts
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub block_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
    pub responsible_user_id: Option<Uuid>,
    /// Case-insensitive substring over name, organization and position
    pub search: Option<String>,
    pub include_inactive: bool,
    pub pagination: Pagination,
}

impl ContactFilter {
    pub fn matches_search(&self, contact: &Contact) -> bool {
        let needle = match self.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return true,
        };
        let haystacks = [
            Some(contact.full_name.as_str()),
            contact.organization.as_deref(),
            contact.position.as_deref(),
        ];
        haystacks
            .iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn contact() -> Contact {
        Contact::new(
            NewContact {
                full_name: "  Anna Sokolova ".to_string(),
                position: Some("Director".to_string()),
                organization: Some("Nord Logistics".to_string()),
                phone: None,
                email: None,
                notes: None,
                block_id: Uuid::new_v4(),
                responsible_user_id: None,
                influence_status_id: None,
                next_touch_date: None,
            },
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_new_contact_trims_name() {
        let c = contact();
        assert_eq!(c.full_name, "Anna Sokolova");
        assert!(c.is_active);
        assert_eq!(c.created_by, c.updated_by);
    }

    #[test]
    fn test_apply_update_reports_only_changed_fields() {
        let mut c = contact();
        let editor = Uuid::new_v4();
        let update = ContactUpdate {
            full_name: Some("Anna Sokolova".to_string()),
            position: Some(Some("Director".to_string())),
            phone: Some(Some("+7 495 000-00-00".to_string())),
            organization: Some(None),
            ..Default::default()
        };

        let changed = c.apply_update(&update, editor);
        assert_eq!(changed, vec!["organization", "phone"]);
        assert!(c.organization.is_none());
        assert_eq!(c.updated_by, editor);
    }

    #[test]
    fn test_noop_update_keeps_editor() {
        let mut c = contact();
        let creator = c.created_by;
        let changed = c.apply_update(&ContactUpdate::default(), Uuid::new_v4());
        assert!(changed.is_empty());
        assert_eq!(c.updated_by, creator);
    }

    #[test]
    fn test_change_status_returns_history() {
        let mut c = contact();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let by = Uuid::new_v4();

        let entry = c.change_status(first, by, None, None);
        assert_eq!(entry.old_status_id, None);
        let entry = c.change_status(second, by, None, Some("met in person".to_string()));
        assert_eq!(entry.old_status_id, Some(first));
        assert_eq!(entry.new_status_id, second);
        assert_eq!(c.influence_status_id, Some(second));
    }

    #[test]
    fn test_record_interaction_keeps_latest() {
        let mut c = contact();
        let now = Utc::now();
        c.record_interaction(now);
        c.record_interaction(now - Duration::days(3));
        assert_eq!(c.last_interaction_at, Some(now));
    }

    #[test]
    fn test_search_matches_name_org_and_position() {
        let c = contact();
        let mut filter = ContactFilter {
            search: Some("sokol".to_string()),
            ..Default::default()
        };
        assert!(filter.matches_search(&c));
        filter.search = Some("LOGISTICS".to_string());
        assert!(filter.matches_search(&c));
        filter.search = Some("direct".to_string());
        assert!(filter.matches_search(&c));
        filter.search = Some("ivanov".to_string());
        assert!(!filter.matches_search(&c));
        filter.search = Some("   ".to_string());
        assert!(filter.matches_search(&c));
    }
}
