//! Interactions (touches) with contacts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status transition performed together with an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from_status_id: Option<Uuid>,
    pub to_status_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub author_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub interaction_type_id: Option<Uuid>,
    pub channel_id: Option<Uuid>,
    /// PII, encrypted at rest
    pub comment: Option<String>,
    pub status_change: Option<StatusChange>,
    pub next_touch_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(contact_id: Uuid, author_id: Uuid, occurred_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            contact_id,
            author_id,
            occurred_at,
            interaction_type_id: None,
            channel_id: None,
            comment: None,
            status_change: None,
            next_touch_date: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Apply an update; the status payload is never touched
    pub fn apply_update(&mut self, update: &InteractionUpdate) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if let Some(at) = update.occurred_at {
            if self.occurred_at != at {
                self.occurred_at = at;
                changed.push("occurred_at");
            }
        }
        if let Some(value) = update.interaction_type_id {
            if self.interaction_type_id != value {
                self.interaction_type_id = value;
                changed.push("interaction_type_id");
            }
        }
        if let Some(value) = update.channel_id {
            if self.channel_id != value {
                self.channel_id = value;
                changed.push("channel_id");
            }
        }
        if let Some(value) = &update.comment {
            if &self.comment != value {
                self.comment = value.clone();
                changed.push("comment");
            }
        }
        if let Some(value) = update.next_touch_date {
            if self.next_touch_date != value {
                self.next_touch_date = value;
                changed.push("next_touch_date");
            }
        }
        if !changed.is_empty() {
            self.updated_at = Utc::now();
        }
        changed
    }
}

#[derive(Debug, Clone)]
pub struct NewInteraction {
    pub contact_id: Uuid,
    /// Defaults to now
    pub occurred_at: Option<DateTime<Utc>>,
    pub interaction_type_id: Option<Uuid>,
    pub channel_id: Option<Uuid>,
    pub comment: Option<String>,
    pub new_status_id: Option<Uuid>,
    pub status_reason: Option<String>,
    pub next_touch_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionUpdate {
    pub occurred_at: Option<DateTime<Utc>>,
    pub interaction_type_id: Option<Option<Uuid>>,
    pub channel_id: Option<Option<Uuid>>,
    pub comment: Option<Option<String>>,
    pub next_touch_date: Option<Option<NaiveDate>>,
}
