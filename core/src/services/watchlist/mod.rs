//! Risk watchlist with scheduled checks.

mod service;

pub use service::WatchlistService;
