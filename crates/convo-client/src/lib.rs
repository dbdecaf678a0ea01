//! Client SDK for the convo chat backend
//!
//! The [`ChatBackend`] trait exposes one operation per backend capability
//! (auth, message send, conversation list/detail/delete). [`HttpChatBackend`]
//! is the production implementation over `reqwest`; it reads the current
//! credential from a shared [`CredentialStore`] on every call so that login
//! and logout take effect without rebuilding the gateway.

use async_trait::async_trait;

pub mod credential;
pub mod error;
pub mod http_client;
pub mod types;

pub use credential::{CredentialError, CredentialStore, MemoryCredentialStore};
pub use error::GatewayError;
pub use http_client::HttpChatBackend;
pub use types::*;

/// Result alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// ChatBackend trait for talking to the chat backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Create an account and return the issued session
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> GatewayResult<AuthResponse>;

    /// Exchange email and password for a session
    async fn authenticate(&self, email: &str, password: &str) -> GatewayResult<AuthResponse>;

    /// Resolve the identity behind the current credential
    async fn fetch_identity(&self) -> GatewayResult<Identity>;

    /// Send a user message, starting a new conversation when `conversation_id` is `None`
    async fn send_message(
        &self,
        text: &str,
        conversation_id: Option<&str>,
    ) -> GatewayResult<SendMessageResponse>;

    /// List conversation summaries, most recently updated first
    async fn list_conversations(&self) -> GatewayResult<Vec<Conversation>>;

    /// Fetch one conversation with its full transcript
    async fn fetch_conversation(&self, id: &str) -> GatewayResult<Conversation>;

    /// Delete a conversation
    async fn delete_conversation(&self, id: &str) -> GatewayResult<()>;
}

pub type ChatBackendBox = Box<dyn ChatBackend>;
