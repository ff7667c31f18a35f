//! Cryptographic helpers used across services
//!
//! - `field` - deterministic AES-256-GCM encryption of PII columns
//! - `password` - bcrypt hashing and password policy
//! - `totp` - RFC 6238 one-time codes for two-factor login

mod field;
mod password;
mod totp;

pub use field::FieldEncryptor;
pub use password::PasswordHasher;
pub use totp::TotpService;
