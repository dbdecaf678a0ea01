//! Pure chat state and its transitions.
//!
//! Every backend-bound operation is split in two: a `begin_*` call applies
//! whatever is known up front and returns a ticket, and a `finish`/`commit`/
//! `rollback` call applies the backend's answer. Nothing here performs I/O.

use convo_client::{Conversation, GatewayError, GatewayResult, Message, SendMessageResponse};

pub const NEW_CHAT_TITLE: &str = "New Chat";

const LIST_FAILED: &str = "Failed to load conversations";
const DETAIL_FAILED: &str = "Failed to load conversation";
const SEND_FAILED: &str = "Failed to send message";
const DELETE_FAILED: &str = "Failed to delete conversation";

/// Proof that a detail load was started. Only the most recent ticket is
/// honored when the response arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    seq: u64,
    id: String,
}

/// Pending optimistic send: the transcript as it was before the user message
/// was appended, and the conversation the message went to.
#[derive(Debug, Clone)]
pub struct SendTicket {
    snapshot: Vec<Message>,
    conversation_id: Option<String>,
}

impl SendTicket {
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    conversations: Vec<Conversation>,
    active: Option<Conversation>,
    messages: Vec<Message>,
    loading: bool,
    sending: bool,
    error: Option<String>,
    detail_seq: u64,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|c| c.id.as_str())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// False while a send or a detail load is outstanding.
    pub fn input_enabled(&self) -> bool {
        !self.loading && !self.sending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn title(&self) -> &str {
        match &self.active {
            Some(c) if !c.title.is_empty() => &c.title,
            _ => NEW_CHAT_TITLE,
        }
    }

    /// Replace the list on success. Duplicate ids keep their first entry.
    pub fn list_loaded(&mut self, result: GatewayResult<Vec<Conversation>>) {
        match result {
            Ok(list) => {
                let mut seen = std::collections::HashSet::new();
                self.conversations = list
                    .into_iter()
                    .filter(|c| seen.insert(c.id.clone()))
                    .collect();
            }
            Err(e) => {
                log::warn!("Loading conversations failed: {}", e);
                self.error = Some(e.user_message(LIST_FAILED));
            }
        }
    }

    pub fn begin_detail(&mut self, id: &str) -> DetailTicket {
        self.detail_seq += 1;
        self.loading = true;
        self.error = None;
        DetailTicket {
            seq: self.detail_seq,
            id: id.to_string(),
        }
    }

    /// Apply a detail response. Returns false, changing nothing, when a newer
    /// load or navigation superseded `ticket`.
    pub fn finish_detail(
        &mut self,
        ticket: DetailTicket,
        result: GatewayResult<Conversation>,
    ) -> bool {
        if ticket.seq != self.detail_seq {
            log::debug!("Dropping stale response for conversation {}", ticket.id);
            return false;
        }
        self.loading = false;

        match result {
            Ok(conversation) => {
                if let Some(entry) = self
                    .conversations
                    .iter_mut()
                    .find(|c| c.id == conversation.id)
                {
                    entry.title = conversation.title.clone();
                    entry.updated_at = conversation.updated_at;
                }
                self.messages = conversation.messages.clone();
                self.active = Some(conversation);
            }
            Err(e) => {
                log::warn!("Loading conversation {} failed: {}", ticket.id, e);
                self.error = Some(e.user_message(DETAIL_FAILED));
            }
        }
        true
    }

    /// Back to an unsaved new chat. Any outstanding detail load becomes stale.
    pub fn clear_detail(&mut self) {
        self.detail_seq += 1;
        self.loading = false;
        self.active = None;
        self.messages.clear();
    }

    /// Snapshot the transcript, then show `text` as sent.
    pub fn begin_send(&mut self, text: &str) -> SendTicket {
        let ticket = SendTicket {
            snapshot: self.messages.clone(),
            conversation_id: self.active_id().map(str::to_string),
        };
        self.messages.push(Message::user(text));
        self.sending = true;
        self.error = None;
        ticket
    }

    /// Apply the backend's reply. Returns the id the backend assigned when the
    /// message started a new conversation.
    pub fn commit_send(
        &mut self,
        ticket: SendTicket,
        response: SendMessageResponse,
    ) -> Option<String> {
        self.sending = false;
        self.messages.push(response.message);

        let conversation = response.conversation?;
        self.detail_seq += 1;

        let mut summary = conversation.clone();
        summary.messages.clear();
        self.conversations.retain(|c| c.id != summary.id);
        self.conversations.insert(0, summary);

        let created = match ticket.conversation_id {
            None => Some(conversation.id.clone()),
            Some(_) => None,
        };
        self.active = Some(conversation);
        created
    }

    pub fn rollback_send(&mut self, ticket: SendTicket, error: &GatewayError) {
        log::warn!("Send failed, restoring transcript: {}", error);
        self.messages = ticket.snapshot;
        self.sending = false;
        self.error = Some(error.user_message(SEND_FAILED));
    }

    pub fn delete_finished(&mut self, id: &str, result: GatewayResult<()>) {
        match result {
            Ok(()) => {
                self.conversations.retain(|c| c.id != id);
                if self.active_id() == Some(id) {
                    self.clear_detail();
                }
            }
            Err(e) => {
                log::warn!("Deleting conversation {} failed: {}", id, e);
                self.error = Some(e.user_message(DELETE_FAILED));
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    /// Drop everything, e.g. after logout.
    pub fn reset(&mut self) {
        let seq = self.detail_seq + 1;
        *self = Self::default();
        self.detail_seq = seq;
    }
}
