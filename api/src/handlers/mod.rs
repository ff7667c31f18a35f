//! Request handling helpers shared by the route modules.

pub mod error;

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use validator::Validate;

pub use error::ApiError;

/// Result type of every route handler
pub type ApiResult<T> = Result<T, ApiError>;

/// Run the DTO's `validator` rules and return the body on success
pub fn validated<T: Validate>(body: web::Json<T>) -> ApiResult<T> {
    let body = body.into_inner();
    body.validate()?;
    Ok(body)
}

/// JSON extractor settings: payload limit and errors in `ErrorResponse` form
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            ApiError::BadRequest(err.to_string()).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}
