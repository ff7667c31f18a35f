//! Blocks and their curator assignments.

mod service;

pub use service::BlockService;
