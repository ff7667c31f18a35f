//! Lookup values: influence statuses, interaction types, channels, risk spheres.

mod service;

pub use service::ReferenceService;

#[cfg(test)]
mod tests;
