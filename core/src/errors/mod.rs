//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        DomainError::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    pub fn rule(rule: impl Into<String>) -> Self {
        DomainError::ValidationErr(ValidationError::BusinessRuleViolation { rule: rule.into() })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridged_errors_keep_their_message() {
        let err: DomainError = AuthError::AccountLocked { minutes: 12 }.into();
        assert_eq!(err.to_string(), "Account locked, try again in 12 minutes");

        let err: DomainError = ValidationError::DuplicateValue {
            field: "full_name".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            DomainError::ValidationErr(ValidationError::DuplicateValue { .. })
        ));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(DomainError::not_found("Contact").to_string(), "Resource not found: Contact");
        assert!(matches!(DomainError::rule("x"), DomainError::ValidationErr(_)));
        assert!(matches!(DomainError::forbidden("viewer"), DomainError::Forbidden { .. }));
    }
}
