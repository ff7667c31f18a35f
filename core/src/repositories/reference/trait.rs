//! Reference value repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::reference::{ReferenceCategory, ReferenceValue};
use crate::errors::DomainError;

#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReferenceValue>, DomainError>;

    async fn find_by_code(
        &self,
        category: ReferenceCategory,
        code: &str,
    ) -> Result<Option<ReferenceValue>, DomainError>;

    /// Values ordered by category, sort order, then label
    async fn list(
        &self,
        category: Option<ReferenceCategory>,
        include_inactive: bool,
    ) -> Result<Vec<ReferenceValue>, DomainError>;

    async fn create(&self, value: ReferenceValue) -> Result<ReferenceValue, DomainError>;

    async fn update(&self, value: ReferenceValue) -> Result<ReferenceValue, DomainError>;
}
