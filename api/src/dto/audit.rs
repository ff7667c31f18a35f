use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use kurator_core::{AuditAction, AuditEntity, AuditFilter};

use super::common::pagination;

/// Query string of `GET /audit-logs`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    pub user_id: Option<Uuid>,
    /// e.g. `contact`, `watchlist`
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    /// e.g. `UPDATE`, `ACCESS_DENIED`
    pub action: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl AuditLogQuery {
    /// Unknown action or entity names are reported by name
    pub fn into_filter(self) -> Result<AuditFilter, String> {
        let entity_type = match self.entity_type.as_deref() {
            Some(name) => Some(
                AuditEntity::parse(name).ok_or_else(|| format!("Unknown entity_type: {}", name))?,
            ),
            None => None,
        };
        let action = match self.action.as_deref() {
            Some(name) => {
                Some(AuditAction::parse(name).ok_or_else(|| format!("Unknown action: {}", name))?)
            }
            None => None,
        };

        Ok(AuditFilter {
            user_id: self.user_id,
            entity_type,
            entity_id: self.entity_id,
            action,
            from: self.from,
            to: self.to,
            pagination: pagination(self.page, self.per_page),
        })
    }
}
