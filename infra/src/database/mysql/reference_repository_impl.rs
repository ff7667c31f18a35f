//! MySQL implementation of the ReferenceRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use kurator_core::domain::entities::reference::{ReferenceCategory, ReferenceValue};
use kurator_core::errors::DomainError;
use kurator_core::repositories::ReferenceRepository;

use super::columns::{db_error, get, get_enum, get_uuid, write_error};

const REFERENCE_COLUMNS: &str =
    "id, category, code, label, sort_order, is_active, created_at, updated_at";

pub struct MySqlReferenceRepository {
    pool: MySqlPool,
}

impl MySqlReferenceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_value(row: &MySqlRow) -> Result<ReferenceValue, DomainError> {
        Ok(ReferenceValue {
            id: get_uuid(row, "id")?,
            category: get_enum(row, "category")?,
            code: get(row, "code")?,
            label: get(row, "label")?,
            sort_order: get(row, "sort_order")?,
            is_active: get(row, "is_active")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl ReferenceRepository for MySqlReferenceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReferenceValue>, DomainError> {
        let query = format!(
            "SELECT {} FROM reference_values WHERE id = ? LIMIT 1",
            REFERENCE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find reference value", e))?;

        row.as_ref().map(Self::row_to_value).transpose()
    }

    async fn find_by_code(
        &self,
        category: ReferenceCategory,
        code: &str,
    ) -> Result<Option<ReferenceValue>, DomainError> {
        let query = format!(
            "SELECT {} FROM reference_values WHERE category = ? AND code = ? LIMIT 1",
            REFERENCE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(category.as_str())
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find reference value by code", e))?;

        row.as_ref().map(Self::row_to_value).transpose()
    }

    async fn list(
        &self,
        category: Option<ReferenceCategory>,
        include_inactive: bool,
    ) -> Result<Vec<ReferenceValue>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM reference_values
            WHERE (? IS NULL OR category = ?) AND (? OR is_active = TRUE)
            ORDER BY category, sort_order, label
            "#,
            REFERENCE_COLUMNS
        );
        let category = category.map(|c| c.as_str());

        let rows = sqlx::query(&query)
            .bind(category)
            .bind(category)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list reference values", e))?;

        rows.iter().map(Self::row_to_value).collect()
    }

    async fn create(&self, value: ReferenceValue) -> Result<ReferenceValue, DomainError> {
        let query = r#"
            INSERT INTO reference_values (
                id, category, code, label, sort_order, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(value.id.to_string())
            .bind(value.category.as_str())
            .bind(&value.code)
            .bind(&value.label)
            .bind(value.sort_order)
            .bind(value.is_active)
            .bind(value.created_at)
            .bind(value.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("Failed to create reference value", "code", e))?;

        Ok(value)
    }

    async fn update(&self, value: ReferenceValue) -> Result<ReferenceValue, DomainError> {
        let query = r#"
            UPDATE reference_values
            SET label = ?, sort_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(&value.label)
            .bind(value.sort_order)
            .bind(value.is_active)
            .bind(value.updated_at)
            .bind(value.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update reference value", e))?;

        Ok(value)
    }
}
