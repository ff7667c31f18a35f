//! Field encryption, password hashing and login lockout settings

use serde::{Deserialize, Serialize};

/// Development-only key: bytes 0..=31, base64. Rejected in production.
pub const DEV_ENCRYPTION_KEY: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Base64-encoded 32-byte master key for PII column encryption
    pub encryption_key: String,

    /// bcrypt work factor
    pub bcrypt_cost: u32,

    /// Issuer shown in authenticator apps
    pub totp_issuer: String,

    /// Consecutive failed logins before the account is locked
    pub max_failed_logins: u32,

    pub lockout_minutes: i64,
    /// Write audit entries on a background task instead of inline
    pub async_audit_writes: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            encryption_key: String::from(DEV_ENCRYPTION_KEY),
            bcrypt_cost: 12,
            totp_issuer: String::from("Kurator"),
            max_failed_logins: 5,
            lockout_minutes: 15,
            async_audit_writes: false,
        }
    }
}

impl SecurityConfig {
    pub fn is_using_dev_key(&self) -> bool {
        self.encryption_key == DEV_ENCRYPTION_KEY
    }
}
