//! Mock implementation of AuditLogRepository for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::audit::{AuditFilter, AuditLog};
use crate::errors::DomainError;

use super::AuditLogRepository;

#[derive(Clone, Default)]
pub struct MockAuditLogRepository {
    logs: Arc<Mutex<Vec<AuditLog>>>,
    should_fail: Arc<AtomicBool>,
}

impl MockAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether operations should fail
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// All stored logs in insertion order
    pub async fn get_all_logs(&self) -> Vec<AuditLog> {
        self.logs.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.logs.lock().await.clear();
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "Mock repository error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for MockAuditLogRepository {
    async fn create(&self, audit_log: &AuditLog) -> Result<(), DomainError> {
        self.check_failure()?;
        self.logs.lock().await.push(audit_log.clone());
        Ok(())
    }

    async fn search(&self, filter: &AuditFilter) -> Result<(Vec<AuditLog>, u64), DomainError> {
        self.check_failure()?;
        let logs = self.logs.lock().await;
        // Later insertions win ties on equal timestamps
        let mut matching: Vec<(usize, AuditLog)> = logs
            .iter()
            .enumerate()
            .filter(|(_, log)| filter.matches(log))
            .map(|(i, log)| (i, log.clone()))
            .collect();
        matching.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.0.cmp(&a.0)));

        let page = filter
            .pagination
            .apply(matching.into_iter().map(|(_, log)| log).collect());
        Ok((page.data, page.total))
    }
}
