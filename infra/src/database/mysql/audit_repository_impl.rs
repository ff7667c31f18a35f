//! MySQL implementation of the AuditLogRepository trait.
//!
//! The `audit_logs` table is append-only: this repository issues INSERT and
//! SELECT statements only.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use kurator_core::domain::entities::audit::{AuditAction, AuditEntity, AuditFilter, AuditLog};
use kurator_core::errors::DomainError;
use kurator_core::repositories::AuditLogRepository;

use super::columns::{db_error, get, get_opt_uuid, get_uuid, opt_id};

const AUDIT_COLUMNS: &str = r#"
    id, user_id, action, entity_type, entity_id, details, ip_address,
    user_agent, device_info, success, created_at
"#;

pub struct MySqlAuditLogRepository {
    pool: MySqlPool,
}

impl MySqlAuditLogRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_audit_log(row: &MySqlRow) -> Result<AuditLog, DomainError> {
        let action: String = get(row, "action")?;
        let action = AuditAction::parse(&action).ok_or_else(|| DomainError::Database {
            message: format!("Unknown audit action: {}", action),
        })?;
        let entity: String = get(row, "entity_type")?;
        let entity_type = AuditEntity::parse(&entity).ok_or_else(|| DomainError::Database {
            message: format!("Unknown audit entity: {}", entity),
        })?;
        let details: Option<Json<JsonValue>> = get(row, "details")?;

        Ok(AuditLog {
            id: get_uuid(row, "id")?,
            user_id: get_opt_uuid(row, "user_id")?,
            action,
            entity_type,
            entity_id: get_opt_uuid(row, "entity_id")?,
            details: details.map(|Json(value)| value),
            ip_address: get(row, "ip_address")?,
            user_agent: get(row, "user_agent")?,
            device_info: get(row, "device_info")?,
            success: get(row, "success")?,
            created_at: get(row, "created_at")?,
        })
    }
}

/// Append the filter as WHERE clauses
fn push_filters(builder: &mut QueryBuilder<'_, MySql>, filter: &AuditFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ");
        builder.push_bind(user_id.to_string());
    }
    if let Some(entity_type) = filter.entity_type {
        builder.push(" AND entity_type = ");
        builder.push_bind(entity_type.as_str());
    }
    if let Some(entity_id) = filter.entity_id {
        builder.push(" AND entity_id = ");
        builder.push_bind(entity_id.to_string());
    }
    if let Some(action) = filter.action {
        builder.push(" AND action = ");
        builder.push_bind(action.as_str());
    }
    if let Some(from) = filter.from {
        builder.push(" AND created_at >= ");
        builder.push_bind(from);
    }
    if let Some(to) = filter.to {
        builder.push(" AND created_at <= ");
        builder.push_bind(to);
    }
}

#[async_trait]
impl AuditLogRepository for MySqlAuditLogRepository {
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO audit_logs (
                id, user_id, action, entity_type, entity_id, details,
                ip_address, user_agent, device_info, success, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(audit_log.id.to_string())
            .bind(opt_id(audit_log.user_id))
            .bind(audit_log.action.as_str())
            .bind(audit_log.entity_type.as_str())
            .bind(opt_id(audit_log.entity_id))
            .bind(audit_log.details.clone().map(Json))
            .bind(&audit_log.ip_address)
            .bind(&audit_log.user_agent)
            .bind(&audit_log.device_info)
            .bind(audit_log.success)
            .bind(audit_log.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create audit log", e))?;

        Ok(())
    }

    async fn search(&self, filter: &AuditFilter) -> Result<(Vec<AuditLog>, u64), DomainError> {
        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) AS total FROM audit_logs");
        push_filters(&mut count, filter);
        let row = count
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count audit logs", e))?;
        let total: i64 = get(&row, "total")?;

        let mut select = QueryBuilder::<MySql>::new(format!("SELECT {} FROM audit_logs", AUDIT_COLUMNS));
        push_filters(&mut select, filter);
        select.push(" ORDER BY created_at DESC, seq DESC LIMIT ");
        select.push_bind(filter.pagination.limit());
        select.push(" OFFSET ");
        select.push_bind(filter.pagination.offset());

        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to search audit logs", e))?;

        let logs = rows
            .iter()
            .map(Self::row_to_audit_log)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((logs, total.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_empty_filter() {
        let mut builder = QueryBuilder::<MySql>::new("SELECT id FROM audit_logs");
        push_filters(&mut builder, &AuditFilter::default());
        assert_eq!(builder.sql(), "SELECT id FROM audit_logs WHERE 1 = 1");
    }

    #[test]
    fn test_all_filters_are_bound() {
        let filter = AuditFilter {
            user_id: Some(Uuid::new_v4()),
            entity_type: Some(AuditEntity::Contact),
            entity_id: Some(Uuid::new_v4()),
            action: Some(AuditAction::Update),
            from: Some(Utc::now()),
            to: Some(Utc::now()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<MySql>::new("SELECT id FROM audit_logs");
        push_filters(&mut builder, &filter);

        let sql = builder.sql();
        assert_eq!(sql.matches('?').count(), 6);
        assert!(sql.contains("entity_type = ?"));
        assert!(!sql.contains("Contact"));
    }
}
