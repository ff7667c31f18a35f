//! Input normalisation shared by the services.

use kurator_shared::validation::validators;

use crate::errors::ValidationError;

/// Trimmed, non-blank text of at most `max` characters
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if !validators::not_blank(value) {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }
    check_length(field, value, max)?;
    Ok(value.to_string())
}

/// Blank strings collapse to `None`
pub(crate) fn optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_length(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

pub(crate) fn optional_email(value: Option<String>) -> Result<Option<String>, ValidationError> {
    let value = optional_text("email", value, 254)?;
    if let Some(email) = &value {
        if !validators::is_valid_email(email) {
            return Err(ValidationError::InvalidFormat {
                field: "email".to_string(),
            });
        }
    }
    Ok(value)
}

pub(crate) fn optional_phone(value: Option<String>) -> Result<Option<String>, ValidationError> {
    let value = optional_text("phone", value, 32)?;
    if let Some(phone) = &value {
        if !validators::is_valid_phone(phone) {
            return Err(ValidationError::InvalidFormat {
                field: "phone".to_string(),
            });
        }
    }
    Ok(value)
}

/// Apply `check` to the inner value of a clearable update field
pub(crate) fn clearable<F>(
    value: Option<Option<String>>,
    check: F,
) -> Result<Option<Option<String>>, ValidationError>
where
    F: FnOnce(Option<String>) -> Result<Option<String>, ValidationError>,
{
    value.map(check).transpose()
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if !validators::length_between(value, 1, max) {
        return Err(ValidationError::InvalidLength {
            field: field.to_string(),
            min: 1,
            max,
        });
    }
    Ok(())
}
