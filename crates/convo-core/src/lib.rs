//! Client-side state for the convo chat client.
//!
//! This crate owns everything between the terminal front end and the HTTP
//! gateway:
//!
//! - **Session**: the authenticated identity and its persisted credential,
//!   with explicit `restore`/`login`/`logout` transitions
//! - **Controller**: the conversation list and the active transcript, kept
//!   consistent with the backend through optimistic sends that roll back on
//!   failure
//! - **Configuration**: YAML settings with environment overrides
//! - **Credential storage**: the single-slot file the session survives in

pub mod config;
pub mod controller;
pub mod credential_file;
pub mod session;

pub use config::{ClientConfig, ConfigError, ConfigLoader, LoggingConfig};
pub use controller::{
    ChatState, ConversationController, DetailTicket, Intent, SendTicket, NEW_CHAT_TITLE,
};
pub use credential_file::FileCredentialStore;
pub use session::{SessionError, SessionState, SessionStore};

#[cfg(test)]
pub mod test_utils;
