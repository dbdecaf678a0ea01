use convo_client::{CredentialError, CredentialStore, MemoryCredentialStore};

/// Credential store whose writes can be made to fail.
#[derive(Debug, Default)]
pub struct FailingCredentialStore {
    inner: MemoryCredentialStore,
    fail_save: bool,
    fail_clear: bool,
}

impl FailingCredentialStore {
    pub fn failing_save() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    pub fn failing_clear(credential: &str) -> Self {
        Self {
            inner: MemoryCredentialStore::with_credential(credential),
            fail_clear: true,
            ..Self::default()
        }
    }
}

impl CredentialStore for FailingCredentialStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        self.inner.load()
    }

    fn save(&self, credential: &str) -> Result<(), CredentialError> {
        if self.fail_save {
            return Err(CredentialError::Unavailable("disk full".to_string()));
        }
        self.inner.save(credential)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        if self.fail_clear {
            return Err(CredentialError::Unavailable("read-only".to_string()));
        }
        self.inner.clear()
    }
}
