//! MySQL repository implementations.
//!
//! Ids are stored as `CHAR(36)`, enums as their `as_str` form, and PII
//! columns as `FieldEncryptor` ciphertext through [`ColumnCipher`].

mod columns;

pub mod audit_repository_impl;
pub mod block_repository_impl;
pub mod contact_repository_impl;
pub mod interaction_repository_impl;
pub mod reference_repository_impl;
pub mod user_repository_impl;
pub mod watchlist_repository_impl;

pub use columns::ColumnCipher;

pub use audit_repository_impl::MySqlAuditLogRepository;
pub use block_repository_impl::MySqlBlockRepository;
pub use contact_repository_impl::MySqlContactRepository;
pub use interaction_repository_impl::MySqlInteractionRepository;
pub use reference_repository_impl::MySqlReferenceRepository;
pub use user_repository_impl::MySqlUserRepository;
pub use watchlist_repository_impl::MySqlWatchlistRepository;
