//! MySQL implementation of the UserRepository trait.
//!
//! The pending or active TOTP secret is the only sealed column.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use kurator_core::domain::entities::user::User;
use kurator_core::errors::DomainError;
use kurator_core::repositories::UserRepository;

use super::columns::{db_error, get, get_enum, get_uuid, write_error, ColumnCipher};

const USER_COLUMNS: &str = r#"
    id, login, display_name, password_hash, role, is_active,
    mfa_enabled, mfa_secret, failed_login_attempts, locked_until,
    last_login_at, created_at, updated_at
"#;

pub struct MySqlUserRepository {
    pool: MySqlPool,
    cipher: ColumnCipher,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool, cipher: ColumnCipher) -> Self {
        Self { pool, cipher }
    }

    fn row_to_user(&self, row: &MySqlRow) -> Result<User, DomainError> {
        Ok(User {
            id: get_uuid(row, "id")?,
            login: get(row, "login")?,
            display_name: get(row, "display_name")?,
            password_hash: get(row, "password_hash")?,
            role: get_enum(row, "role")?,
            is_active: get(row, "is_active")?,
            mfa_enabled: get(row, "mfa_enabled")?,
            mfa_secret: self.cipher.get_opt(row, "mfa_secret")?,
            failed_login_attempts: get(row, "failed_login_attempts")?,
            locked_until: get(row, "locked_until")?,
            last_login_at: get(row, "last_login_at")?,
            created_at: get(row, "created_at")?,
            updated_at: get(row, "updated_at")?,
        })
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = ? LIMIT 1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user", e))?;

        row.map(|row| self.row_to_user(&row)).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, DomainError> {
        // BINARY keeps the match exact under a case-insensitive collation
        let query = format!(
            "SELECT {} FROM users WHERE login = BINARY ? LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user by login", e))?;

        row.map(|row| self.row_to_user(&row)).transpose()
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE (? OR is_active = TRUE) ORDER BY login",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list users", e))?;

        rows.iter().map(|row| self.row_to_user(row)).collect()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, login, display_name, password_hash, role, is_active,
                mfa_enabled, mfa_secret, failed_login_attempts, locked_until,
                last_login_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.login)
            .bind(&user.display_name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.mfa_enabled)
            .bind(self.cipher.seal_opt(user.mfa_secret.as_deref())?)
            .bind(user.failed_login_attempts)
            .bind(user.locked_until)
            .bind(user.last_login_at)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("Failed to create user", "login", e))?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users SET
                display_name = ?, password_hash = ?, role = ?, is_active = ?,
                mfa_enabled = ?, mfa_secret = ?, failed_login_attempts = ?,
                locked_until = ?, last_login_at = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.display_name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.mfa_enabled)
            .bind(self.cipher.seal_opt(user.mfa_secret.as_deref())?)
            .bind(user.failed_login_attempts)
            .bind(user.locked_until)
            .bind(user.last_login_at)
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update user", e))?;

        if result.rows_affected() == 0 {
            // MySQL reports zero affected rows when nothing changed
            return match self.find_by_id(user.id).await? {
                Some(_) => Ok(user),
                None => Err(DomainError::not_found("User")),
            };
        }
        Ok(user)
    }
}
