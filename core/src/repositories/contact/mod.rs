//! Contact repository module.

mod r#trait;
pub use r#trait::{ContactQuery, ContactRepository};

mod mock;
pub use mock::MockContactRepository;
