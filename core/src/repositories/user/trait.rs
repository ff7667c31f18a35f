//! User repository trait defining the interface for user persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Users are never physically deleted; deactivation is an `update`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Logins are matched exactly
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, DomainError>;

    /// All users ordered by login
    async fn list(&self, include_inactive: bool) -> Result<Vec<User>, DomainError>;

    /// Create a new user; a taken login is a `DuplicateValue` validation error
    async fn create(&self, user: User) -> Result<User, DomainError>;

    async fn update(&self, user: User) -> Result<User, DomainError>;
}
