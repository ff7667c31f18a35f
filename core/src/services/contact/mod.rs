//! Curated contacts: scoped reads, writes, status transitions, soft delete.

mod service;

pub use service::ContactService;
