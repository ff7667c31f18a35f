//! Business services containing domain logic and use cases.
//!
//! Services take an `Actor` from the transport layer, resolve it through
//! `AccessService`, enforce the role and scope rules, and write the audit
//! trail for every change.

pub mod access;
pub mod audit;
pub mod auth;
pub mod block;
pub mod contact;
pub mod dashboard;
pub mod encryption;
pub mod interaction;
pub mod reference;
pub mod token;
pub mod user;
pub mod watchlist;

mod input;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use access::AccessService;
pub use audit::{AuditService, AuditServiceConfig};
pub use auth::{AuthService, AuthServiceConfig};
pub use block::BlockService;
pub use contact::ContactService;
pub use dashboard::{
    DashboardConfig, DashboardService, DashboardSummary, RecentInteraction, RiskCount,
    StatusCount, WatchlistSummary,
};
pub use encryption::{FieldEncryptor, PasswordHasher, TotpService};
pub use interaction::InteractionService;
pub use reference::ReferenceService;
pub use token::{TokenService, TokenServiceConfig};
pub use user::UserService;
pub use watchlist::WatchlistService;
