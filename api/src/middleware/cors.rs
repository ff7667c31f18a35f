//! CORS middleware built from `CorsConfig`.
//!
//! Browsers on the configured front end origins may call the API; requests
//! without an `Origin` header (curl, server to server) are unaffected.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use kurator_shared::CorsConfig;

/// Creates a CORS middleware instance from configuration.
///
/// A disabled config yields a policy that allows no cross-origin requests.
/// A `*` entry in `allowed_origins` allows any origin, which is only
/// reasonable in development.
pub fn create_cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        tracing::info!("CORS disabled");
        return Cors::default();
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    let headers: Vec<header::HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    let mut cors = Cors::default()
        .allowed_methods(methods)
        .allowed_headers(headers)
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::warn!("CORS allows any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            tracing::info!(origin = %origin, "Adding allowed origin");
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}
