//! Column helpers shared by the MySQL repositories.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};
use uuid::Uuid;

use kurator_core::errors::{DomainError, DomainResult, ValidationError};
use kurator_core::services::FieldEncryptor;

/// Seals PII before it is bound and opens it after it is read
#[derive(Clone)]
pub struct ColumnCipher {
    encryptor: Arc<FieldEncryptor>,
}

impl ColumnCipher {
    pub fn new(encryptor: Arc<FieldEncryptor>) -> Self {
        Self { encryptor }
    }

    pub fn seal(&self, value: &str) -> DomainResult<String> {
        self.encryptor.encrypt(value)
    }

    pub fn seal_opt(&self, value: Option<&str>) -> DomainResult<Option<String>> {
        self.encryptor.encrypt_opt(value)
    }

    /// Values without the ciphertext prefix predate column encryption and
    /// are returned unchanged
    pub fn open(&self, stored: String) -> DomainResult<String> {
        if FieldEncryptor::is_encrypted(&stored) {
            self.encryptor.decrypt(&stored)
        } else {
            tracing::debug!("Read unencrypted legacy column value");
            Ok(stored)
        }
    }

    pub fn open_opt(&self, stored: Option<String>) -> DomainResult<Option<String>> {
        stored.map(|value| self.open(value)).transpose()
    }

    pub fn get(&self, row: &MySqlRow, column: &str) -> DomainResult<String> {
        self.open(get(row, column)?)
    }

    pub fn get_opt(&self, row: &MySqlRow, column: &str) -> DomainResult<Option<String>> {
        self.open_opt(get(row, column)?)
    }
}

pub(crate) fn db_error(context: &str, error: sqlx::Error) -> DomainError {
    tracing::error!(error = %error, "{}", context);
    DomainError::Database {
        message: format!("{}: {}", context, error),
    }
}

/// Map a unique-key violation to `DuplicateValue` on `field`
pub(crate) fn write_error(context: &str, field: &str, error: sqlx::Error) -> DomainError {
    let duplicate = error
        .as_database_error()
        .map_or(false, |e| e.is_unique_violation());
    if duplicate {
        return ValidationError::DuplicateValue {
            field: field.to_string(),
        }
        .into();
    }
    db_error(context, error)
}

pub(crate) fn get<'r, T>(row: &'r MySqlRow, column: &str) -> DomainResult<T>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(column).map_err(|e| DomainError::Database {
        message: format!("Failed to get {}: {}", column, e),
    })
}

pub(crate) fn get_uuid(row: &MySqlRow, column: &str) -> DomainResult<Uuid> {
    let value: String = get(row, column)?;
    parse_uuid(column, &value)
}

pub(crate) fn get_opt_uuid(row: &MySqlRow, column: &str) -> DomainResult<Option<Uuid>> {
    let value: Option<String> = get(row, column)?;
    value.map(|v| parse_uuid(column, &v)).transpose()
}

/// Enum columns stored in their `as_str` form
pub(crate) fn get_enum<T>(row: &MySqlRow, column: &str) -> DomainResult<T>
where
    T: FromStr<Err = String>,
{
    let value: String = get(row, column)?;
    value.parse().map_err(|e: String| DomainError::Database {
        message: format!("Invalid {}: {}", column, e),
    })
}

pub(crate) fn opt_id(id: Option<Uuid>) -> Option<String> {
    id.map(|id| id.to_string())
}

fn parse_uuid(column: &str, value: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| DomainError::Database {
        message: format!("Invalid UUID in {}: {}", column, e),
    })
}
