//! Configuration for the token service

use kurator_shared::JwtConfig;

use crate::domain::entities::token::{JWT_AUDIENCE, JWT_ISSUER};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry_seconds: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            access_token_expiry_seconds: config.access_token_expiry,
            issuer: if config.issuer.is_empty() {
                JWT_ISSUER.to_string()
            } else {
                config.issuer.clone()
            },
            audience: if config.audience.is_empty() {
                JWT_AUDIENCE.to_string()
            } else {
                config.audience.clone()
            },
        }
    }
}
