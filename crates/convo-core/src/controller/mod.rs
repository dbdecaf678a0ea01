//! Conversation controller: applies [`Intent`]s to [`ChatState`] by way of
//! the backend gateway. Rendering is left to whoever owns the controller.

mod intent;
mod state;

pub use intent::Intent;
pub use state::{ChatState, DetailTicket, SendTicket, NEW_CHAT_TITLE};

use crate::session::{SessionError, SessionStore};
use convo_client::{ChatBackendBox, Identity};

const LOGOUT_FAILED: &str = "Failed to log out";

pub struct ConversationController {
    backend: ChatBackendBox,
    session: SessionStore,
    state: ChatState,
}

impl ConversationController {
    pub fn new(backend: ChatBackendBox, session: SessionStore) -> Self {
        Self {
            backend,
            session,
            state: ChatState::new(),
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn restore_session(&mut self) {
        self.session.restore(self.backend.as_ref()).await;
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let identity = self
            .session
            .authenticate(self.backend.as_ref(), email, password)
            .await?;
        self.state.reset();
        Ok(identity)
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, SessionError> {
        let identity = self
            .session
            .register(self.backend.as_ref(), username, email, password)
            .await?;
        self.state.reset();
        Ok(identity)
    }

    /// Apply one intent. Failures end up in [`ChatState::error`]; an auth
    /// failure here is reported like any other and does not end the session.
    pub async fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::LoadList => {
                let result = self.backend.list_conversations().await;
                self.state.list_loaded(result);
            }
            Intent::Select(id) => {
                let ticket = self.state.begin_detail(&id);
                let result = self.backend.fetch_conversation(&id).await;
                self.state.finish_detail(ticket, result);
            }
            Intent::NewChat => self.state.clear_detail(),
            Intent::Send(text) => self.send(&text).await,
            Intent::Delete(id) => {
                let result = self.backend.delete_conversation(&id).await;
                self.state.delete_finished(&id, result);
            }
            Intent::DismissError => self.state.dismiss_error(),
            Intent::Logout => {
                let cleared = self.session.logout();
                self.state.reset();
                if let Err(e) = cleared {
                    log::warn!("Could not remove persisted credential: {}", e);
                    self.state.fail(LOGOUT_FAILED);
                }
            }
        }
    }

    async fn send(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.state.input_enabled() {
            log::debug!("Ignoring send while another request is pending");
            return;
        }

        let ticket = self.state.begin_send(text);
        let result = self
            .backend
            .send_message(text, ticket.conversation_id())
            .await;

        match result {
            Ok(response) => {
                if let Some(id) = self.state.commit_send(ticket, response) {
                    log::info!("Started conversation {}", id);
                }
            }
            Err(e) => self.state.rollback_send(ticket, &e),
        }
    }
}
