mod r#trait;
pub use r#trait::InteractionRepository;

mod mock;
pub use mock::MockInteractionRepository;
