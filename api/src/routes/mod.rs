//! Route modules, one per resource. Everything registered by [`configure`]
//! sits behind `JwtAuth`; login is registered separately in `app`.

pub mod audit;
pub mod auth;
pub mod blocks;
pub mod contacts;
pub mod dashboard;
pub mod interactions;
pub mod references;
pub mod users;
pub mod watchlist;

use actix_web::web;

/// Protected routes under `/api/v1`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth::configure)
        .configure(contacts::configure)
        .configure(interactions::configure)
        .configure(watchlist::configure)
        .configure(dashboard::configure)
        .configure(blocks::configure)
        .configure(users::configure)
        .configure(references::configure)
        .configure(audit::configure);
}
