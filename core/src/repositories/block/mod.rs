mod r#trait;
pub use r#trait::BlockRepository;

mod mock;
pub use mock::MockBlockRepository;
