//! Audit log repository trait defining the interface for audit log persistence.

use async_trait::async_trait;

use crate::domain::entities::audit::{AuditFilter, AuditLog};
use crate::errors::DomainError;

/// Append-only store for audit entries. There is deliberately no update or
/// delete operation.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError>;

    /// Entries matching the filter, newest first, with the total match count
    async fn search(&self, filter: &AuditFilter) -> Result<(Vec<AuditLog>, u64), DomainError>;
}
