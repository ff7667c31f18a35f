//! MySQL implementation of the WatchlistRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use kurator_core::domain::entities::watchlist::WatchlistEntry;
use kurator_core::errors::DomainError;
use kurator_core::repositories::WatchlistRepository;

use super::columns::{db_error, get, get_enum, get_opt_uuid, get_uuid, opt_id, ColumnCipher};

const WATCHLIST_COLUMNS: &str = r#"
    id, full_name, sphere_id, risk_level, monitoring_frequency, source, notes,
    owner_id, last_checked_at, next_check_date, is_active, created_by,
    created_at, updated_at
"#;

pub struct MySqlWatchlistRepository {
    pool: MySqlPool,
    cipher: ColumnCipher,
}

impl MySqlWatchlistRepository {
    pub fn new(pool: MySqlPool, cipher: ColumnCipher) -> Self {
        Self { pool, cipher }
    }

    fn row_to_entry(&self, row: &MySqlRow) -> Result<WatchlistEntry, DomainError> {
        Ok(WatchlistEntry {
            id: get_uuid(row, "id")?,
            full_name: self.cipher.get(row, "full_name")?,
            sphere_id: get_opt_uuid(row, "sphere_id")?,
            risk_level: get_enum(row, "risk_level")?,
            monitoring_frequency: get_enum(row, "monitoring_frequency")?,
            source: get(row, "source")?,
            notes: self.cipher.get_opt(row, "notes")?,
            owner_id: get_uuid(row, "owner_id")?,
            last_checked_at: get(row, "last_checked_at")?,
            next_check_date: get(row, "next_check_date")?,
            is_active: get(row, "is_active")?,
            created_by: get_uuid(row, "created_by")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl WatchlistRepository for MySqlWatchlistRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WatchlistEntry>, DomainError> {
        let query = format!(
            "SELECT {} FROM watchlist_entries WHERE id = ? LIMIT 1",
            WATCHLIST_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find watchlist entry", e))?;

        row.map(|row| self.row_to_entry(&row)).transpose()
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<WatchlistEntry>, DomainError> {
        let query = format!(
            "SELECT {} FROM watchlist_entries WHERE (? OR is_active = TRUE)",
            WATCHLIST_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list watchlist entries", e))?;

        rows.iter().map(|row| self.row_to_entry(row)).collect()
    }

    async fn exists_with_name(
        &self,
        full_name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM watchlist_entries
                WHERE full_name = ? AND is_active = TRUE AND (? IS NULL OR id <> ?)
            ) AS found
            "#,
        )
        .bind(self.cipher.seal(full_name)?)
        .bind(opt_id(exclude_id))
        .bind(opt_id(exclude_id))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to check watchlist name", e))?;

        let found: i64 = get(&row, "found")?;
        Ok(found == 1)
    }

    async fn create(&self, entry: WatchlistEntry) -> Result<WatchlistEntry, DomainError> {
        let query = r#"
            INSERT INTO watchlist_entries (
                id, full_name, sphere_id, risk_level, monitoring_frequency, source,
                notes, owner_id, last_checked_at, next_check_date, is_active,
                created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(entry.id.to_string())
            .bind(self.cipher.seal(&entry.full_name)?)
            .bind(opt_id(entry.sphere_id))
            .bind(entry.risk_level.as_str())
            .bind(entry.monitoring_frequency.as_str())
            .bind(&entry.source)
            .bind(self.cipher.seal_opt(entry.notes.as_deref())?)
            .bind(entry.owner_id.to_string())
            .bind(entry.last_checked_at)
            .bind(entry.next_check_date)
            .bind(entry.is_active)
            .bind(entry.created_by.to_string())
            .bind(entry.created_at)
            .bind(entry.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create watchlist entry", e))?;

        Ok(entry)
    }

    async fn update(&self, entry: WatchlistEntry) -> Result<WatchlistEntry, DomainError> {
        let query = r#"
            UPDATE watchlist_entries SET
                full_name = ?, sphere_id = ?, risk_level = ?, monitoring_frequency = ?,
                source = ?, notes = ?, owner_id = ?, last_checked_at = ?,
                next_check_date = ?, is_active = ?, updated_at = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(self.cipher.seal(&entry.full_name)?)
            .bind(opt_id(entry.sphere_id))
            .bind(entry.risk_level.as_str())
            .bind(entry.monitoring_frequency.as_str())
            .bind(&entry.source)
            .bind(self.cipher.seal_opt(entry.notes.as_deref())?)
            .bind(entry.owner_id.to_string())
            .bind(entry.last_checked_at)
            .bind(entry.next_check_date)
            .bind(entry.is_active)
            .bind(entry.updated_at)
            .bind(entry.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update watchlist entry", e))?;

        Ok(entry)
    }
}
