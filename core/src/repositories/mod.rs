//! Repository interfaces and in-memory implementations.
//!
//! The MySQL implementations live in `kurator_infra`. The `Mock*`
//! repositories keep everything in memory and back the service tests and
//! the API integration tests.

pub mod audit;
pub mod block;
pub mod contact;
pub mod interaction;
pub mod reference;
pub mod user;
pub mod watchlist;

pub use audit::{AuditLogRepository, MockAuditLogRepository};
pub use block::{BlockRepository, MockBlockRepository};
pub use contact::{ContactQuery, ContactRepository, MockContactRepository};
pub use interaction::{InteractionRepository, MockInteractionRepository};
pub use reference::{MockReferenceRepository, ReferenceRepository};
pub use user::{MockUserRepository, UserRepository};
pub use watchlist::{MockWatchlistRepository, WatchlistRepository};
