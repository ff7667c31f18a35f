mod r#trait;
pub use r#trait::WatchlistRepository;

mod mock;
pub use mock::MockWatchlistRepository;
