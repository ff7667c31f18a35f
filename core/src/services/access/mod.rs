//! Resolution of an authenticated caller into effective permissions.

mod service;

pub use service::AccessService;

#[cfg(test)]
mod tests;
