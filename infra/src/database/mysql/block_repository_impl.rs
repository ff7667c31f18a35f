//! MySQL implementation of the BlockRepository trait.
//!
//! Curator assignments live in `block_curators`; block writes replace the
//! whole assignment set inside one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use kurator_core::domain::entities::block::Block;
use kurator_core::errors::DomainError;
use kurator_core::repositories::BlockRepository;

use super::columns::{db_error, get, get_uuid, write_error};

const BLOCK_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

pub struct MySqlBlockRepository {
    pool: MySqlPool,
}

impl MySqlBlockRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_block(row: &MySqlRow, curator_ids: Vec<Uuid>) -> Result<Block, DomainError> {
        Ok(Block {
            id: get_uuid(row, "id")?,
            name: get(row, "name")?,
            description: get(row, "description")?,
            is_active: get(row, "is_active")?,
            curator_ids,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }

    async fn curators_of(&self, block_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let rows = sqlx::query(
            "SELECT user_id FROM block_curators WHERE block_id = ? ORDER BY assigned_at, user_id",
        )
        .bind(block_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load block curators", e))?;

        rows.iter().map(|row| get_uuid(row, "user_id")).collect()
    }

    async fn load(&self, query: &str, value: String) -> Result<Option<Block>, DomainError> {
        let row = sqlx::query(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find block", e))?;

        match row {
            Some(row) => {
                let curators = self.curators_of(get_uuid(&row, "id")?).await?;
                Ok(Some(Self::row_to_block(&row, curators)?))
            }
            None => Ok(None),
        }
    }

    async fn replace_curators(
        tx: &mut Transaction<'_, MySql>,
        block: &Block,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM block_curators WHERE block_id = ?")
            .bind(block.id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to clear block curators", e))?;

        for user_id in &block.curator_ids {
            sqlx::query(
                "INSERT INTO block_curators (block_id, user_id, assigned_at) VALUES (?, ?, ?)",
            )
            .bind(block.id.to_string())
            .bind(user_id.to_string())
            .bind(block.updated_at)
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to assign block curator", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlockRepository for MySqlBlockRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Block>, DomainError> {
        let query = format!("SELECT {} FROM blocks WHERE id = ? LIMIT 1", BLOCK_COLUMNS);
        self.load(&query, id.to_string()).await
    }

    async fn find_active_by_name(&self, name: &str) -> Result<Option<Block>, DomainError> {
        let query = format!(
            "SELECT {} FROM blocks WHERE name = ? AND is_active = TRUE LIMIT 1",
            BLOCK_COLUMNS
        );
        self.load(&query, name.to_string()).await
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Block>, DomainError> {
        let query = format!(
            "SELECT {} FROM blocks WHERE (? OR is_active = TRUE) ORDER BY name",
            BLOCK_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list blocks", e))?;

        let assignments = sqlx::query(
            "SELECT block_id, user_id FROM block_curators ORDER BY assigned_at, user_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load block curators", e))?;

        let mut curators: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in &assignments {
            curators
                .entry(get_uuid(row, "block_id")?)
                .or_default()
                .push(get_uuid(row, "user_id")?);
        }

        rows.iter()
            .map(|row| {
                let id = get_uuid(row, "id")?;
                Self::row_to_block(row, curators.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn create(&self, block: Block) -> Result<Block, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO blocks (id, name, description, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(block.id.to_string())
        .bind(&block.name)
        .bind(&block.description)
        .bind(block.is_active)
        .bind(block.created_at)
        .bind(block.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("Failed to create block", "name", e))?;

        Self::replace_curators(&mut tx, &block).await?;
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit block", e))?;

        Ok(block)
    }

    async fn update(&self, block: Block) -> Result<Block, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            UPDATE blocks SET name = ?, description = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&block.name)
        .bind(&block.description)
        .bind(block.is_active)
        .bind(block.updated_at)
        .bind(block.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error("Failed to update block", "name", e))?;

        Self::replace_curators(&mut tx, &block).await?;
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit block", e))?;

        Ok(block)
    }

    async fn block_ids_for_curator(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT bc.block_id
            FROM block_curators bc
            JOIN blocks b ON b.id = bc.block_id
            WHERE bc.user_id = ? AND b.is_active = TRUE
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load curator blocks", e))?;

        rows.iter().map(|row| get_uuid(row, "block_id")).collect()
    }
}
