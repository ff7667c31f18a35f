//! MySQL implementation of the ContactRepository trait.
//!
//! `full_name`, `phone`, `email` and `notes` are sealed. Encryption is
//! deterministic, so the duplicate-name check compares ciphertexts.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};
use uuid::Uuid;

use kurator_core::domain::entities::contact::{Contact, ContactStatusHistory};
use kurator_core::domain::value_objects::access::AccessScope;
use kurator_core::errors::DomainError;
use kurator_core::repositories::{ContactQuery, ContactRepository};

use super::columns::{db_error, get, get_opt_uuid, get_uuid, opt_id, ColumnCipher};

const CONTACT_COLUMNS: &str = r#"
    id, full_name, position, organization, phone, email, notes, block_id,
    responsible_user_id, influence_status_id, next_touch_date,
    last_interaction_at, is_active, created_by, updated_by, created_at, updated_at
"#;

pub struct MySqlContactRepository {
    pool: MySqlPool,
    cipher: ColumnCipher,
}

impl MySqlContactRepository {
    pub fn new(pool: MySqlPool, cipher: ColumnCipher) -> Self {
        Self { pool, cipher }
    }

    fn row_to_contact(&self, row: &MySqlRow) -> Result<Contact, DomainError> {
        Ok(Contact {
            id: get_uuid(row, "id")?,
            full_name: self.cipher.get(row, "full_name")?,
            position: get(row, "position")?,
            organization: get(row, "organization")?,
            phone: self.cipher.get_opt(row, "phone")?,
            email: self.cipher.get_opt(row, "email")?,
            notes: self.cipher.get_opt(row, "notes")?,
            block_id: get_uuid(row, "block_id")?,
            responsible_user_id: get_opt_uuid(row, "responsible_user_id")?,
            influence_status_id: get_opt_uuid(row, "influence_status_id")?,
            next_touch_date: get(row, "next_touch_date")?,
            last_interaction_at: get(row, "last_interaction_at")?,
            is_active: get(row, "is_active")?,
            created_by: get_uuid(row, "created_by")?,
            updated_by: get_uuid(row, "updated_by")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }

    fn row_to_history(row: &MySqlRow) -> Result<ContactStatusHistory, DomainError> {
        Ok(ContactStatusHistory {
            id: get_uuid(row, "id")?,
            contact_id: get_uuid(row, "contact_id")?,
            old_status_id: get_opt_uuid(row, "old_status_id")?,
            new_status_id: get_uuid(row, "new_status_id")?,
            changed_by: get_uuid(row, "changed_by")?,
            changed_at: get(row, "changed_at")?,
            interaction_id: get_opt_uuid(row, "interaction_id")?,
            reason: get(row, "reason")?,
        })
    }

    async fn write_contact(
        &self,
        tx: &mut Transaction<'_, MySql>,
        contact: &Contact,
        insert: bool,
    ) -> Result<u64, DomainError> {
        let query = if insert {
            r#"
            INSERT INTO contacts (
                full_name, position, organization, phone, email, notes, block_id,
                responsible_user_id, influence_status_id, next_touch_date,
                last_interaction_at, is_active, created_by, updated_by,
                created_at, updated_at, id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        } else {
            r#"
            UPDATE contacts SET
                full_name = ?, position = ?, organization = ?, phone = ?, email = ?,
                notes = ?, block_id = ?, responsible_user_id = ?,
                influence_status_id = ?, next_touch_date = ?, last_interaction_at = ?,
                is_active = ?, created_by = ?, updated_by = ?, created_at = ?,
                updated_at = ?
            WHERE id = ?
            "#
        };

        let result = sqlx::query(query)
            .bind(self.cipher.seal(&contact.full_name)?)
            .bind(&contact.position)
            .bind(&contact.organization)
            .bind(self.cipher.seal_opt(contact.phone.as_deref())?)
            .bind(self.cipher.seal_opt(contact.email.as_deref())?)
            .bind(self.cipher.seal_opt(contact.notes.as_deref())?)
            .bind(contact.block_id.to_string())
            .bind(opt_id(contact.responsible_user_id))
            .bind(opt_id(contact.influence_status_id))
            .bind(contact.next_touch_date)
            .bind(contact.last_interaction_at)
            .bind(contact.is_active)
            .bind(contact.created_by.to_string())
            .bind(contact.updated_by.to_string())
            .bind(contact.created_at)
            .bind(contact.updated_at)
            .bind(contact.id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to write contact", e))?;

        Ok(result.rows_affected())
    }

    async fn insert_history(
        tx: &mut Transaction<'_, MySql>,
        entry: &ContactStatusHistory,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO contact_status_history (
                id, contact_id, old_status_id, new_status_id, changed_by,
                changed_at, interaction_id, reason
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.contact_id.to_string())
        .bind(opt_id(entry.old_status_id))
        .bind(entry.new_status_id.to_string())
        .bind(entry.changed_by.to_string())
        .bind(entry.changed_at)
        .bind(opt_id(entry.interaction_id))
        .bind(&entry.reason)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to record status history", e))?;
        Ok(())
    }

    /// MySQL reports zero affected rows both for a missing row and for an
    /// update that changed nothing, so a miss is confirmed with a lookup
    async fn ensure_updated(
        tx: &mut Transaction<'_, MySql>,
        rows_affected: u64,
        id: Uuid,
    ) -> Result<(), DomainError> {
        if rows_affected > 0 {
            return Ok(());
        }
        let row = sqlx::query("SELECT COUNT(*) AS found FROM contacts WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| db_error("Failed to check contact", e))?;
        let found: i64 = get(&row, "found")?;
        if found == 0 {
            return Err(DomainError::not_found("Contact"));
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Transaction<'static, MySql>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))
    }
}

/// Append the storage-side part of a `ContactQuery` as WHERE clauses
fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &ContactQuery) {
    builder.push(" WHERE 1 = 1");
    if !query.include_inactive {
        builder.push(" AND is_active = TRUE");
    }
    if let AccessScope::Restricted { user_id, block_ids } = &query.scope {
        builder.push(" AND (responsible_user_id = ");
        builder.push_bind(user_id.to_string());
        if !block_ids.is_empty() {
            builder.push(" OR block_id IN (");
            let mut ids = builder.separated(", ");
            for id in block_ids {
                ids.push_bind(id.to_string());
            }
            ids.push_unseparated(")");
        }
        builder.push(")");
    }
    if let Some(block_id) = query.block_id {
        builder.push(" AND block_id = ");
        builder.push_bind(block_id.to_string());
    }
    if let Some(status_id) = query.status_id {
        builder.push(" AND influence_status_id = ");
        builder.push_bind(status_id.to_string());
    }
    if let Some(user_id) = query.responsible_user_id {
        builder.push(" AND responsible_user_id = ");
        builder.push_bind(user_id.to_string());
    }
}

#[async_trait]
impl ContactRepository for MySqlContactRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>, DomainError> {
        let query = format!("SELECT {} FROM contacts WHERE id = ? LIMIT 1", CONTACT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find contact", e))?;

        row.map(|row| self.row_to_contact(&row)).transpose()
    }

    async fn list(&self, query: &ContactQuery) -> Result<Vec<Contact>, DomainError> {
        let mut builder = QueryBuilder::<MySql>::new(format!("SELECT {} FROM contacts", CONTACT_COLUMNS));
        push_filters(&mut builder, query);

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list contacts", e))?;

        rows.iter().map(|row| self.row_to_contact(row)).collect()
    }

    async fn exists_with_name(
        &self,
        block_id: Uuid,
        full_name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM contacts
                WHERE block_id = ? AND full_name = ? AND is_active = TRUE
                  AND (? IS NULL OR id <> ?)
            ) AS found
            "#,
        )
        .bind(block_id.to_string())
        .bind(self.cipher.seal(full_name)?)
        .bind(opt_id(exclude_id))
        .bind(opt_id(exclude_id))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to check contact name", e))?;

        let found: i64 = get(&row, "found")?;
        Ok(found == 1)
    }

    async fn count_active_in_block(&self, block_id: Uuid) -> Result<u64, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total FROM contacts WHERE block_id = ? AND is_active = TRUE",
        )
        .bind(block_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count contacts", e))?;

        let total: i64 = get(&row, "total")?;
        Ok(total.max(0) as u64)
    }

    async fn create(
        &self,
        contact: Contact,
        initial_status: Option<ContactStatusHistory>,
    ) -> Result<Contact, DomainError> {
        let mut tx = self.begin().await?;
        self.write_contact(&mut tx, &contact, true).await?;
        if let Some(entry) = &initial_status {
            Self::insert_history(&mut tx, entry).await?;
        }
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit contact", e))?;
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact, DomainError> {
        let mut tx = self.begin().await?;
        let rows = self.write_contact(&mut tx, &contact, false).await?;
        Self::ensure_updated(&mut tx, rows, contact.id).await?;
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit contact", e))?;
        Ok(contact)
    }

    async fn save_status_change(
        &self,
        contact: Contact,
        entry: ContactStatusHistory,
    ) -> Result<Contact, DomainError> {
        let mut tx = self.begin().await?;
        let rows = self.write_contact(&mut tx, &contact, false).await?;
        Self::ensure_updated(&mut tx, rows, contact.id).await?;
        Self::insert_history(&mut tx, &entry).await?;
        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit status change", e))?;
        Ok(contact)
    }

    async fn status_history(
        &self,
        contact_id: Uuid,
    ) -> Result<Vec<ContactStatusHistory>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, contact_id, old_status_id, new_status_id, changed_by,
                   changed_at, interaction_id, reason
            FROM contact_status_history
            WHERE contact_id = ?
            ORDER BY changed_at DESC, seq DESC
            "#,
        )
        .bind(contact_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load status history", e))?;

        rows.iter().map(Self::row_to_history).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(query: &ContactQuery) -> String {
        let mut builder = QueryBuilder::<MySql>::new("SELECT id FROM contacts");
        push_filters(&mut builder, query);
        builder.sql().to_string()
    }

    #[test]
    fn test_admin_query_has_no_scope_clause() {
        let sql = sql(&ContactQuery::scoped(AccessScope::All));
        assert_eq!(sql, "SELECT id FROM contacts WHERE 1 = 1 AND is_active = TRUE");
    }

    #[test]
    fn test_restricted_scope_covers_blocks_and_responsibility() {
        let query = ContactQuery::scoped(AccessScope::Restricted {
            user_id: Uuid::new_v4(),
            block_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
        });
        let sql = sql(&query);
        assert!(sql.contains("AND (responsible_user_id = ? OR block_id IN (?, ?))"));
    }

    #[test]
    fn test_restricted_scope_without_blocks() {
        let query = ContactQuery {
            include_inactive: true,
            status_id: Some(Uuid::new_v4()),
            ..ContactQuery::scoped(AccessScope::Restricted {
                user_id: Uuid::new_v4(),
                block_ids: vec![],
            })
        };
        let sql = sql(&query);
        assert!(!sql.contains("is_active"));
        assert!(!sql.contains("IN ("));
        assert!(sql.ends_with("AND (responsible_user_id = ?) AND influence_status_id = ?"));
    }
}
