//! Audit service module for recording data changes and security events.

mod service;

pub use service::{AuditService, AuditServiceConfig};
