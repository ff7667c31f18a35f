//! Authentication route handlers
//!
//! - Login with password and optional TOTP code (public)
//! - Profile of the current user
//! - MFA enrolment, confirmation and removal
//! - Password change

pub mod login;
pub mod mfa;
pub mod password;
pub mod profile;

use actix_web::web;

/// Routes under `/auth` that require a bearer token
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(profile::me))
            .route("/mfa/setup", web::post().to(mfa::setup))
            .route("/mfa/confirm", web::post().to(mfa::confirm))
            .route("/mfa/disable", web::post().to(mfa::disable))
            .route("/password", web::post().to(password::change_password)),
    );
}
