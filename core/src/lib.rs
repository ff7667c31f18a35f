//! # Kurator Core
//!
//! Domain layer for the Kurator backend: entities, repository interfaces,
//! cross-cutting crypto services and the business services that enforce
//! access control, soft delete and audit logging.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience. The submodules share
// names (`audit`, `user`, ...) so the re-exports stay explicit.
pub use domain::entities::{
    AccessToken, AuditAction, AuditEntity, AuditFilter, AuditLog, Block, BlockUpdate, Claims,
    Contact, ContactFilter, ContactStatusHistory, ContactUpdate, Interaction, InteractionUpdate,
    MonitoringFrequency, NewBlock, NewContact, NewInteraction, NewReferenceValue, NewUser,
    NewWatchlistEntry, ReferenceCategory, ReferenceUpdate, ReferenceValue, RiskLevel,
    StatusChange, User, UserRole, UserUpdate, WatchlistEntry, WatchlistFilter, WatchlistUpdate,
};
pub use domain::value_objects::{
    Access, AccessScope, Actor, LoginResponse, MfaSetup, RequestOrigin, UserProfile,
};
pub use errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
pub use repositories::{
    AuditLogRepository, BlockRepository, ContactQuery, ContactRepository, InteractionRepository,
    ReferenceRepository, UserRepository, WatchlistRepository,
};
pub use services::{
    AccessService, AuditService, AuditServiceConfig, AuthService, AuthServiceConfig,
    BlockService, ContactService, DashboardConfig, DashboardService, DashboardSummary,
    FieldEncryptor, InteractionService, PasswordHasher, ReferenceService, TokenService,
    TokenServiceConfig, TotpService, UserService, WatchlistService,
};
