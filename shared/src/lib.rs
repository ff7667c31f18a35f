//! Shared utilities and common types for the Kurator server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and layered loading
//! - Error response structures and error codes
//! - Pagination and response wrappers
//! - Validation helpers for logins, emails, phones and reference codes

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use self::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, SecurityConfig, ServerConfig,
};
pub use self::errors::{error_codes, ErrorResponse};
pub use self::types::{ApiResponse, HealthResponse, HealthStatus, PaginatedResponse, Pagination};
pub use self::utils::validation;
