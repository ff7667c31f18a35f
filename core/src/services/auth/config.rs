//! Configuration for the authentication service

use kurator_shared::SecurityConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Consecutive failures that lock the account
    pub max_failed_attempts: u32,
    /// How long a lock lasts
    pub lockout_minutes: i64,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_minutes: 15,
        }
    }
}

impl From<&SecurityConfig> for AuthServiceConfig {
    fn from(config: &SecurityConfig) -> Self {
        Self {
            max_failed_attempts: config.max_failed_logins,
            lockout_minutes: config.lockout_minutes,
        }
    }
}
