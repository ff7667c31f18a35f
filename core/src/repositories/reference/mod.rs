mod r#trait;
pub use r#trait::ReferenceRepository;

mod mock;
pub use mock::MockReferenceRepository;
