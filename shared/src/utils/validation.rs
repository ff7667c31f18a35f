//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

static LOGIN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]{3,64}$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

// Digits with optional leading '+', spaces, dashes and parentheses
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9 ()\-]{5,20}$").unwrap());

static REFERENCE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9_]{1,50}$").unwrap());

/// Validation error with field-level details
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Collection of field errors
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) {
        self.errors.push(FieldError::new(field, message, code));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn to_field_errors(&self) -> HashMap<String, Vec<String>> {
        let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
        for error in &self.errors {
            field_errors
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        field_errors
    }
}

/// Common validation functions
pub mod validators {
    use super::*;

    /// Check if a string is not blank
    pub fn not_blank(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string length (in characters) is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.chars().count();
        len >= min && len <= max
    }

    /// Login names: 3-64 chars of letters, digits, dot, underscore, dash
    pub fn is_valid_login(login: &str) -> bool {
        LOGIN_REGEX.is_match(login)
    }

    pub fn is_valid_email(email: &str) -> bool {
        email.len() <= 254 && EMAIL_REGEX.is_match(email)
    }

    pub fn is_valid_phone(phone: &str) -> bool {
        PHONE_REGEX.is_match(phone.trim()) && phone.chars().filter(|c| c.is_ascii_digit()).count() >= 5
    }

    /// Reference codes are upper-case identifiers such as `STRONG_ALLY`
    pub fn is_valid_reference_code(code: &str) -> bool {
        REFERENCE_CODE_REGEX.is_match(code)
    }

    /// At least 8 characters with at least one letter and one digit
    pub fn is_strong_password(password: &str) -> bool {
        password.chars().count() >= 8
            && password.chars().any(|c| c.is_alphabetic())
            && password.chars().any(|c| c.is_ascii_digit())
    }
}
