//! Interactions logged against contacts.

mod service;

pub use service::{InteractionService, MAX_FUTURE_SKEW_MINUTES};

#[cfg(test)]
mod tests;
