//! MySQL implementation of the InteractionRepository trait.
//!
//! The free-text `comment` is sealed. An optional status change is stored
//! as `status_from_id`/`status_to_id` on the same row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use kurator_core::domain::entities::interaction::{Interaction, StatusChange};
use kurator_core::errors::DomainError;
use kurator_core::repositories::InteractionRepository;

use super::columns::{db_error, get, get_opt_uuid, get_uuid, opt_id, ColumnCipher};

const INTERACTION_COLUMNS: &str = r#"
    id, contact_id, author_id, occurred_at, interaction_type_id, channel_id,
    comment, status_from_id, status_to_id, next_touch_date, is_active,
    created_at, updated_at
"#;

pub struct MySqlInteractionRepository {
    pool: MySqlPool,
    cipher: ColumnCipher,
}

impl MySqlInteractionRepository {
    pub fn new(pool: MySqlPool, cipher: ColumnCipher) -> Self {
        Self { pool, cipher }
    }

    fn row_to_interaction(&self, row: &MySqlRow) -> Result<Interaction, DomainError> {
        let status_change = get_opt_uuid(row, "status_to_id")?
            .map(|to_status_id| -> Result<StatusChange, DomainError> {
                Ok(StatusChange {
                    from_status_id: get_opt_uuid(row, "status_from_id")?,
                    to_status_id,
                })
            })
            .transpose()?;

        Ok(Interaction {
            id: get_uuid(row, "id")?,
            contact_id: get_uuid(row, "contact_id")?,
            author_id: get_uuid(row, "author_id")?,
            occurred_at: get(row, "occurred_at")?,
            interaction_type_id: get_opt_uuid(row, "interaction_type_id")?,
            channel_id: get_opt_uuid(row, "channel_id")?,
            comment: self.cipher.get_opt(row, "comment")?,
            status_change,
            next_touch_date: get(row, "next_touch_date")?,
            is_active: get(row, "is_active")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }
}

fn push_contact_filter(
    builder: &mut QueryBuilder<'_, MySql>,
    contact_ids: &[Uuid],
    since: Option<DateTime<Utc>>,
) {
    builder.push("is_active = TRUE AND contact_id IN (");
    let mut ids = builder.separated(", ");
    for id in contact_ids {
        ids.push_bind(id.to_string());
    }
    ids.push_unseparated(")");
    if let Some(since) = since {
        builder.push(" AND occurred_at >= ");
        builder.push_bind(since);
    }
}

#[async_trait]
impl InteractionRepository for MySqlInteractionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Interaction>, DomainError> {
        let query = format!(
            "SELECT {} FROM interactions WHERE id = ? LIMIT 1",
            INTERACTION_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find interaction", e))?;

        row.map(|row| self.row_to_interaction(&row)).transpose()
    }

    async fn list_for_contact(
        &self,
        contact_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Interaction>, DomainError> {
        let query = format!(
            r#"
            SELECT {} FROM interactions
            WHERE contact_id = ? AND (? OR is_active = TRUE)
            ORDER BY occurred_at DESC
            "#,
            INTERACTION_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(contact_id.to_string())
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list interactions", e))?;

        rows.iter().map(|row| self.row_to_interaction(row)).collect()
    }

    async fn list_for_contacts(
        &self,
        contact_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> Result<Vec<Interaction>, DomainError> {
        if contact_ids.is_empty() || limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM interactions WHERE ",
            INTERACTION_COLUMNS
        ));
        push_contact_filter(&mut builder, contact_ids, since);
        builder.push(" ORDER BY occurred_at DESC");
        if let Some(limit) = limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list interactions", e))?;

        rows.iter().map(|row| self.row_to_interaction(row)).collect()
    }

    async fn count_for_contacts(
        &self,
        contact_ids: &[Uuid],
        since: Option<DateTime<Utc>>,
    ) -> Result<u64, DomainError> {
        if contact_ids.is_empty() {
            return Ok(0);
        }

        let mut builder =
            QueryBuilder::<MySql>::new("SELECT COUNT(*) AS total FROM interactions WHERE ");
        push_contact_filter(&mut builder, contact_ids, since);

        let row = builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count interactions", e))?;
        let total: i64 = get(&row, "total")?;
        Ok(total.max(0) as u64)
    }

    async fn create(&self, interaction: Interaction) -> Result<Interaction, DomainError> {
        let query = r#"
            INSERT INTO interactions (
                id, contact_id, author_id, occurred_at, interaction_type_id,
                channel_id, comment, status_from_id, status_to_id,
                next_touch_date, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        let change = interaction.status_change;

        sqlx::query(query)
            .bind(interaction.id.to_string())
            .bind(interaction.contact_id.to_string())
            .bind(interaction.author_id.to_string())
            .bind(interaction.occurred_at)
            .bind(opt_id(interaction.interaction_type_id))
            .bind(opt_id(interaction.channel_id))
            .bind(self.cipher.seal_opt(interaction.comment.as_deref())?)
            .bind(opt_id(change.and_then(|c| c.from_status_id)))
            .bind(opt_id(change.map(|c| c.to_status_id)))
            .bind(interaction.next_touch_date)
            .bind(interaction.is_active)
            .bind(interaction.created_at)
            .bind(interaction.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create interaction", e))?;

        Ok(interaction)
    }

    /// The status change is part of history and never rewritten
    async fn update(&self, interaction: Interaction) -> Result<Interaction, DomainError> {
        let query = r#"
            UPDATE interactions SET
                occurred_at = ?, interaction_type_id = ?, channel_id = ?,
                comment = ?, next_touch_date = ?, is_active = ?, updated_at = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(interaction.occurred_at)
            .bind(opt_id(interaction.interaction_type_id))
            .bind(opt_id(interaction.channel_id))
            .bind(self.cipher.seal_opt(interaction.comment.as_deref())?)
            .bind(interaction.next_touch_date)
            .bind(interaction.is_active)
            .bind(interaction.updated_at)
            .bind(interaction.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update interaction", e))?;

        Ok(interaction)
    }
}
