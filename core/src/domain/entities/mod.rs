//! Domain entities representing core business objects.

pub mod audit;
pub mod block;
pub mod contact;
pub mod interaction;
pub mod reference;
pub mod token;
pub mod user;
pub mod watchlist;

pub use audit::{AuditAction, AuditEntity, AuditFilter, AuditLog};
pub use block::{Block, BlockUpdate, NewBlock};
pub use contact::{
    Contact, ContactFilter, ContactStatusHistory, ContactUpdate, NewContact, CONTACT_PII_FIELDS,
};
pub use interaction::{Interaction, InteractionUpdate, NewInteraction, StatusChange};
pub use reference::{NewReferenceValue, ReferenceCategory, ReferenceUpdate, ReferenceValue};
pub use token::{AccessToken, Claims, JWT_AUDIENCE, JWT_ISSUER};
pub use user::{NewUser, User, UserRole, UserUpdate};
pub use watchlist::{
    MonitoringFrequency, NewWatchlistEntry, RiskLevel, WatchlistEntry, WatchlistFilter,
    WatchlistUpdate,
};
