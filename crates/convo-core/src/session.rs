//! Authenticated identity and the credential that backs it.
//!
//! `SessionStore` is constructed explicitly and shares its credential store
//! with the gateway, so a login or logout here changes what the next request
//! carries.
//!
//! ```text
//! Unknown --restore--> Restoring --ok--> Authenticated
//!                               \--err--> Anonymous
//! any --login--> Authenticated
//! any --logout--> Anonymous
//! ```

use convo_client::{
    AuthResponse, ChatBackend, CredentialError, CredentialStore, GatewayError, Identity,
};
use std::sync::Arc;
use thiserror::Error;

const RESTORE_FAILED: &str = "Authentication error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unknown,
    Restoring,
    Authenticated,
    Anonymous,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

pub struct SessionStore {
    credentials: Arc<dyn CredentialStore>,
    state: SessionState,
    identity: Option<Identity>,
    restore_notice: Option<String>,
}

impl SessionStore {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            state: SessionState::Unknown,
            identity: None,
            restore_notice: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Why the last restore ended anonymous, if it had a credential to try.
    pub fn restore_notice(&self) -> Option<&str> {
        self.restore_notice.as_deref()
    }

    /// Re-establish the identity behind a persisted credential.
    ///
    /// Never fails: a missing, unreadable or rejected credential leaves the
    /// session anonymous, and a rejected one is discarded.
    pub async fn restore(&mut self, backend: &dyn ChatBackend) {
        self.state = SessionState::Restoring;
        self.restore_notice = None;

        let credential = match self.credentials.load() {
            Ok(credential) => credential,
            Err(e) => {
                log::warn!("Could not read persisted credential: {}", e);
                None
            }
        };

        if credential.is_none() {
            log::debug!("No persisted credential, session is anonymous");
            self.become_anonymous();
            return;
        }

        match backend.fetch_identity().await {
            Ok(identity) => {
                log::info!("Session restored for {}", identity.email);
                self.identity = Some(identity);
                self.state = SessionState::Authenticated;
            }
            Err(e) => {
                log::warn!("Discarding persisted credential: {}", e);
                if let Err(clear_err) = self.credentials.clear() {
                    log::warn!("Could not discard persisted credential: {}", clear_err);
                }
                self.restore_notice = Some(e.user_message(RESTORE_FAILED));
                self.become_anonymous();
            }
        }
    }

    /// Persist `credential` and adopt `identity`. The backend already vouched
    /// for both.
    pub fn login(&mut self, identity: Identity, credential: &str) -> Result<(), CredentialError> {
        self.credentials.save(credential)?;
        log::info!("Logged in as {}", identity.email);
        self.identity = Some(identity);
        self.restore_notice = None;
        self.state = SessionState::Authenticated;
        Ok(())
    }

    /// Forget the identity and the persisted credential. Safe to repeat.
    pub fn logout(&mut self) -> Result<(), CredentialError> {
        let cleared = self.credentials.clear();
        if self.identity.is_some() {
            log::info!("Logged out");
        }
        self.become_anonymous();
        cleared
    }

    pub async fn authenticate(
        &mut self,
        backend: &dyn ChatBackend,
        email: &str,
        password: &str,
    ) -> Result<Identity, SessionError> {
        let session = backend.authenticate(email, password).await?;
        self.adopt(session)
    }

    pub async fn register(
        &mut self,
        backend: &dyn ChatBackend,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, SessionError> {
        let session = backend.register(username, email, password).await?;
        self.adopt(session)
    }

    fn adopt(&mut self, session: AuthResponse) -> Result<Identity, SessionError> {
        let identity = session.user.clone();
        self.login(session.user, &session.token)?;
        Ok(identity)
    }

    fn become_anonymous(&mut self) {
        self.identity = None;
        self.state = SessionState::Anonymous;
    }
}
