//! User administration.

mod service;

pub use service::UserService;
