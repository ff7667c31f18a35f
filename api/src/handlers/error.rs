//! Conversion of domain and request errors into `ErrorResponse` bodies.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;

use kurator_core::errors::{AuthError, DomainError, TokenError, ValidationError};
use kurator_shared::validation::FieldErrors;
use kurator_shared::{error_codes, ErrorResponse};

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// DTO rules rejected the request body or query
    #[error("Invalid request data")]
    InvalidInput(#[from] ValidationErrors),

    /// Malformed JSON, query string or path segment
    #[error("{0}")]
    BadRequest(String),

    #[error("The requested resource was not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Domain(DomainError::Unauthorized)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => domain_status(error),
            ApiError::InvalidInput(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Domain(error) => domain_body(error),
            ApiError::InvalidInput(errors) => validation_body(errors),
            ApiError::BadRequest(message) => ErrorResponse::new(error_codes::BAD_REQUEST, message),
            ApiError::RouteNotFound => ErrorResponse::new(error_codes::NOT_FOUND, self.to_string()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::BusinessRule { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
        DomainError::Internal { .. } | DomainError::Database { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        DomainError::Auth(auth) => match auth {
            AuthError::InvalidCredentials | AuthError::MfaRequired | AuthError::InvalidMfaCode => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::AccountLocked { .. } => StatusCode::LOCKED,
            AuthError::MfaAlreadyEnabled
            | AuthError::MfaNotEnabled
            | AuthError::MfaSetupNotStarted => StatusCode::UNPROCESSABLE_ENTITY,
        },
        DomainError::Token(token) => match token {
            TokenError::TokenExpired | TokenError::InvalidTokenFormat => StatusCode::UNAUTHORIZED,
            TokenError::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        },
        DomainError::ValidationErr(validation) => match validation {
            ValidationError::DuplicateValue { .. } => StatusCode::CONFLICT,
            ValidationError::BusinessRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        },
    }
}

fn domain_body(error: &DomainError) -> ErrorResponse {
    match error {
        DomainError::Validation { message } => {
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message)
        }
        DomainError::BusinessRule { message } => {
            ErrorResponse::new(error_codes::BUSINESS_RULE, message)
        }
        DomainError::NotFound { .. } => ErrorResponse::new(error_codes::NOT_FOUND, error.to_string()),
        DomainError::Unauthorized => {
            ErrorResponse::new(error_codes::UNAUTHORIZED, "Authentication required")
        }
        DomainError::Forbidden { .. } => {
            ErrorResponse::new(error_codes::FORBIDDEN, error.to_string())
        }
        DomainError::Internal { .. } | DomainError::Database { .. } => {
            tracing::error!(error = %error, "Request failed with an internal error");
            let code = match error {
                DomainError::Database { .. } => error_codes::DATABASE_ERROR,
                _ => error_codes::INTERNAL_ERROR,
            };
            ErrorResponse::new(code, "An internal error occurred")
        }
        DomainError::Auth(auth) => {
            let code = match auth {
                AuthError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
                AuthError::AccountLocked { .. } => error_codes::ACCOUNT_LOCKED,
                AuthError::MfaRequired => error_codes::MFA_REQUIRED,
                AuthError::InvalidMfaCode => error_codes::INVALID_MFA_CODE,
                _ => error_codes::BUSINESS_RULE,
            };
            let response = ErrorResponse::new(code, auth.to_string());
            match auth {
                AuthError::AccountLocked { minutes } => {
                    response.add_detail("retry_after_minutes", minutes)
                }
                _ => response,
            }
        }
        DomainError::Token(token) => match token {
            TokenError::TokenExpired => ErrorResponse::new(error_codes::TOKEN_EXPIRED, token.to_string()),
            TokenError::InvalidTokenFormat => {
                ErrorResponse::new(error_codes::TOKEN_INVALID, token.to_string())
            }
            TokenError::TokenGenerationFailed => {
                tracing::error!("Access token generation failed");
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
        },
        DomainError::ValidationErr(validation) => {
            let code = match validation {
                ValidationError::DuplicateValue { .. } => error_codes::DUPLICATE_VALUE,
                ValidationError::BusinessRuleViolation { .. } => error_codes::BUSINESS_RULE,
                _ => error_codes::VALIDATION_ERROR,
            };
            let response = ErrorResponse::new(code, validation.to_string());
            match validation_field(validation) {
                Some(field) => response.add_detail("field", field),
                None => response,
            }
        }
    }
}

fn validation_field(error: &ValidationError) -> Option<&str> {
    match error {
        ValidationError::RequiredField { field }
        | ValidationError::InvalidFormat { field }
        | ValidationError::InvalidLength { field, .. }
        | ValidationError::InvalidDate { field }
        | ValidationError::DuplicateValue { field }
        | ValidationError::InvalidReference { field } => Some(field),
        ValidationError::BusinessRuleViolation { .. } => None,
    }
}

fn validation_body(errors: &ValidationErrors) -> ErrorResponse {
    let mut fields = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            fields.add(field, message, error.code.to_string());
        }
    }
    ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
        .add_detail("fields", fields.to_field_errors())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(error: ApiError) -> serde_json::Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (DomainError::not_found("Contact"), StatusCode::NOT_FOUND),
            (DomainError::forbidden("viewer"), StatusCode::FORBIDDEN),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (AuthError::MfaRequired.into(), StatusCode::UNAUTHORIZED),
            (AuthError::AccountLocked { minutes: 3 }.into(), StatusCode::LOCKED),
            (TokenError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (
                ValidationError::DuplicateValue { field: "code".into() }.into(),
                StatusCode::CONFLICT,
            ),
            (
                ValidationError::RequiredField { field: "full_name".into() }.into(),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::rule("block has contacts"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status_code(), status);
        }
    }

    #[actix_web::test]
    async fn test_internal_message_is_hidden() {
        let body = body_of(DomainError::internal("connection reset by peer").into()).await;
        assert_eq!(body["error"], error_codes::INTERNAL_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[actix_web::test]
    async fn test_lockout_carries_retry_detail() {
        let body = body_of(DomainError::from(AuthError::AccountLocked { minutes: 14 }).into()).await;
        assert_eq!(body["error"], error_codes::ACCOUNT_LOCKED);
        assert_eq!(body["details"]["retry_after_minutes"], 14);
    }

    #[actix_web::test]
    async fn test_validation_error_names_field() {
        let error = DomainError::from(ValidationError::InvalidReference {
            field: "influence_status_id".into(),
        });
        let body = body_of(error.into()).await;
        assert_eq!(body["error"], error_codes::VALIDATION_ERROR);
        assert_eq!(body["details"]["field"], "influence_status_id");
    }
}
