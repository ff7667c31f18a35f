//! Request DTOs with `validator` rules and their conversion into the core
//! input types. Responses serialize the core entities directly.

pub mod audit;
pub mod auth;
pub mod block;
pub mod common;
pub mod contact;
pub mod interaction;
pub mod reference;
pub mod user;
pub mod watchlist;

pub use common::{double_option, IncludeInactiveQuery};
