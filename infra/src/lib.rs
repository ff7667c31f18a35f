//! # Infrastructure Layer
//!
//! MySQL implementations of the `kurator_core` repository traits. PII
//! columns are sealed with the core `FieldEncryptor` on the way in and
//! opened on the way out, so services only ever see plaintext.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core error types for convenience
pub use kurator_core::errors::{DomainError, DomainResult};

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlRepositories, PoolStatistics};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Encryption key could not be loaded
    #[error("Encryption setup error: {0}")]
    Encryption(String),
}
