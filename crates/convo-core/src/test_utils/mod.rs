pub mod failing_store;
pub mod fixtures;
pub mod mock_backend;

pub use failing_store::FailingCredentialStore;
pub use mock_backend::{MockChatBackend, RecordedCall};
