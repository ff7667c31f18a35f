//! Authentication: password login with lockout, optional TOTP, self-service
//! account settings.

mod config;
mod service;

pub use config::AuthServiceConfig;
pub use service::AuthService;
