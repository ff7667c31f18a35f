//! In-memory implementation of ReferenceRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::reference::{ReferenceCategory, ReferenceValue};
use crate::errors::DomainError;

use super::ReferenceRepository;

#[derive(Clone, Default)]
pub struct MockReferenceRepository {
    values: Arc<RwLock<HashMap<Uuid, ReferenceValue>>>,
}

impl MockReferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, value: ReferenceValue) {
        self.values.write().await.insert(value.id, value);
    }
}

#[async_trait]
impl ReferenceRepository for MockReferenceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReferenceValue>, DomainError> {
        Ok(self.values.read().await.get(&id).cloned())
    }

    async fn find_by_code(
        &self,
        category: ReferenceCategory,
        code: &str,
    ) -> Result<Option<ReferenceValue>, DomainError> {
        let values = self.values.read().await;
        Ok(values
            .values()
            .find(|v| v.category == category && v.code == code)
            .cloned())
    }

    async fn list(
        &self,
        category: Option<ReferenceCategory>,
        include_inactive: bool,
    ) -> Result<Vec<ReferenceValue>, DomainError> {
        let values = self.values.read().await;
        let mut result: Vec<ReferenceValue> = values
            .values()
            .filter(|v| category.map_or(true, |c| v.category == c))
            .filter(|v| include_inactive || v.is_active)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            a.category
                .as_str()
                .cmp(b.category.as_str())
                .then(a.sort_order.cmp(&b.sort_order))
                .then_with(|| a.label.cmp(&b.label))
        });
        Ok(result)
    }

    async fn create(&self, value: ReferenceValue) -> Result<ReferenceValue, DomainError> {
        self.values.write().await.insert(value.id, value.clone());
        Ok(value)
    }

    async fn update(&self, value: ReferenceValue) -> Result<ReferenceValue, DomainError> {
        let mut values = self.values.write().await;
        if !values.contains_key(&value.id) {
            return Err(DomainError::not_found("ReferenceValue"));
        }
        values.insert(value.id, value.clone());
        Ok(value)
    }
}
