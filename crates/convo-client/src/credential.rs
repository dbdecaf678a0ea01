//! Single-slot storage for the session credential.

use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Credential storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Credential storage is unavailable: {0}")]
    Unavailable(String),
}

/// Durable home of the bearer credential. One slot, no multi-session support.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, CredentialError>;
    fn save(&self, credential: &str) -> Result<(), CredentialError>;
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Process-local store, for tests and throwaway runs
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(credential.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, credential: &str) -> Result<(), CredentialError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        *slot = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}
