//! Blocks group contacts and carry curator assignments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// Users assigned to work with the block's contacts
    pub curator_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Block {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            is_active: true,
            curator_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_curator(&self, user_id: Uuid) -> bool {
        self.curator_ids.contains(&user_id)
    }

    /// Replace assignments, dropping duplicates while keeping order
    pub fn assign_curators(&mut self, user_ids: Vec<Uuid>) {
        let mut unique = Vec::with_capacity(user_ids.len());
        for id in user_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.curator_ids = unique;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone)]
pub struct NewBlock {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BlockUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}
