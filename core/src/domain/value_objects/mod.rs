//! Value objects representing immutable domain concepts.

pub mod access;
pub mod actor;
pub mod auth_response;

pub use access::{Access, AccessScope};
pub use actor::{Actor, RequestOrigin};
pub use auth_response::{LoginResponse, MfaSetup, UserProfile};
