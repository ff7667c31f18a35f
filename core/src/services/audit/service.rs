//! Audit service for recording data changes and security events.
//!
//! Writes are synchronous by default so a failed audit write fails the
//! operation that caused it. With `async_writes` the write runs on a
//! background task and failures are only logged.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tokio::task;
use tracing::{error, warn};
use uuid::Uuid;

use kurator_shared::{PaginatedResponse, SecurityConfig};

use crate::domain::entities::audit::{AuditAction, AuditEntity, AuditFilter, AuditLog};
use crate::domain::value_objects::access::Access;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::AuditLogRepository;

/// Configuration for the audit service
#[derive(Debug, Clone, Default)]
pub struct AuditServiceConfig {
    /// Whether to run audit writes asynchronously
    pub async_writes: bool,
}

impl From<&SecurityConfig> for AuditServiceConfig {
    fn from(config: &SecurityConfig) -> Self {
        Self {
            async_writes: config.async_audit_writes,
        }
    }
}

/// Service for writing and searching the audit trail
pub struct AuditService {
    repository: Arc<dyn AuditLogRepository>,
    config: AuditServiceConfig,
}

impl AuditService {
    pub fn new(repository: Arc<dyn AuditLogRepository>, config: AuditServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Write one entry
    pub async fn record(&self, audit_log: AuditLog) -> DomainResult<()> {
        if self.config.async_writes {
            let repository = Arc::clone(&self.repository);
            task::spawn(async move {
                if let Err(e) = repository.create(&audit_log).await {
                    error!(
                        action = audit_log.action.as_str(),
                        entity_type = audit_log.entity_type.as_str(),
                        error = %e,
                        "Failed to write audit log"
                    );
                }
            });
            Ok(())
        } else {
            self.repository.create(&audit_log).await
        }
    }

    /// Record an action performed by an authenticated user
    pub async fn record_action(
        &self,
        access: &Access,
        action: AuditAction,
        entity_type: AuditEntity,
        entity_id: Option<Uuid>,
        details: Option<JsonValue>,
    ) -> DomainResult<()> {
        self.record(Self::entry(access, action, entity_type, entity_id, details))
            .await
    }

    /// Build an entry stamped with the user and request origin
    pub fn entry(
        access: &Access,
        action: AuditAction,
        entity_type: AuditEntity,
        entity_id: Option<Uuid>,
        details: Option<JsonValue>,
    ) -> AuditLog {
        let mut log = AuditLog::new(action, entity_type)
            .with_user(access.user_id)
            .with_request_context(
                access.origin.ip_address.clone(),
                access.origin.user_agent.clone(),
            );
        if let Some(id) = entity_id {
            log = log.with_entity(id);
        }
        if let Some(details) = details {
            log = log.with_details(details);
        }
        log
    }

    /// Search the trail, newest first. Admin only.
    pub async fn search(
        &self,
        access: &Access,
        filter: AuditFilter,
    ) -> DomainResult<PaginatedResponse<AuditLog>> {
        if !access.is_admin() {
            let denial = Self::entry(
                access,
                AuditAction::AccessDenied,
                AuditEntity::Session,
                None,
                Some(serde_json::json!({ "operation": "audit_search" })),
            );
            if let Err(e) = self.record(denial).await {
                warn!(user_id = %access.user_id, error = %e, "Failed to record access denial");
            }
            return Err(DomainError::forbidden("audit log is restricted to administrators"));
        }

        let pagination = filter.pagination.validate();
        let (logs, total) = self
            .repository
            .search(&AuditFilter {
                pagination,
                ..filter
            })
            .await?;
        Ok(PaginatedResponse::new(logs, pagination, total))
    }
}
