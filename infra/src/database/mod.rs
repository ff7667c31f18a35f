//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management
//! - Repository implementations with PII column encryption
//! - A bundle wiring every repository onto one pool

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use kurator_core::repositories::{
    AuditLogRepository, BlockRepository, ContactRepository, InteractionRepository,
    ReferenceRepository, UserRepository, WatchlistRepository,
};
use kurator_core::services::FieldEncryptor;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    ColumnCipher, MySqlAuditLogRepository, MySqlBlockRepository, MySqlContactRepository,
    MySqlInteractionRepository, MySqlReferenceRepository, MySqlUserRepository,
    MySqlWatchlistRepository,
};

/// Every repository the services need, backed by one pool
#[derive(Clone)]
pub struct MySqlRepositories {
    pub users: Arc<dyn UserRepository>,
    pub blocks: Arc<dyn BlockRepository>,
    pub references: Arc<dyn ReferenceRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub interactions: Arc<dyn InteractionRepository>,
    pub watchlist: Arc<dyn WatchlistRepository>,
    pub audit_logs: Arc<dyn AuditLogRepository>,
}

impl MySqlRepositories {
    pub fn new(pool: &DatabasePool, encryptor: Arc<FieldEncryptor>) -> Self {
        let pool = pool.get_pool().clone();
        let cipher = ColumnCipher::new(encryptor);
        Self {
            users: Arc::new(MySqlUserRepository::new(pool.clone(), cipher.clone())),
            blocks: Arc::new(MySqlBlockRepository::new(pool.clone())),
            references: Arc::new(MySqlReferenceRepository::new(pool.clone())),
            contacts: Arc::new(MySqlContactRepository::new(pool.clone(), cipher.clone())),
            interactions: Arc::new(MySqlInteractionRepository::new(pool.clone(), cipher.clone())),
            watchlist: Arc::new(MySqlWatchlistRepository::new(pool.clone(), cipher)),
            audit_logs: Arc::new(MySqlAuditLogRepository::new(pool)),
        }
    }
}
