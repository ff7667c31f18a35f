//! HTTP layer for Kurator: application factory, middleware, request DTOs
//! and route handlers on top of `kurator_core` services.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState, Repositories};
