//! Error types for authentication, token handling and input validation.
//!
//! Messages are safe to show to clients; none of them embed PII.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown login, wrong password and inactive user are indistinguishable
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Account locked, try again in {minutes} minutes")]
    AccountLocked { minutes: i64 },

    #[error("Two-factor code required")]
    MfaRequired,

    #[error("Invalid two-factor code")]
    InvalidMfaCode,

    #[error("Two-factor authentication is already enabled")]
    MfaAlreadyEnabled,

    #[error("Two-factor authentication is not enabled")]
    MfaNotEnabled,

    #[error("Two-factor setup has not been started")]
    MfaSetupNotStarted,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid length: {field} (min: {min}, max: {max})")]
    InvalidLength { field: String, min: usize, max: usize },

    #[error("Invalid date: {field}")]
    InvalidDate { field: String },

    #[error("Duplicate value: {field}")]
    DuplicateValue { field: String },

    /// Referenced record is missing, inactive or of the wrong kind
    #[error("Invalid reference: {field}")]
    InvalidReference { field: String },

    #[error("Business rule violation: {rule}")]
    BusinessRuleViolation { rule: String },
}
