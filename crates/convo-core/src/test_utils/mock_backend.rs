use async_trait::async_trait;
use convo_client::{
    AuthResponse, ChatBackend, Conversation, GatewayError, GatewayResult, Identity,
    SendMessageResponse,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Register(String),
    Authenticate(String),
    FetchIdentity,
    SendMessage {
        text: String,
        conversation_id: Option<String>,
    },
    ListConversations,
    FetchConversation(String),
    DeleteConversation(String),
}

#[derive(Default)]
struct Scripted {
    auth: VecDeque<GatewayResult<AuthResponse>>,
    identity: VecDeque<GatewayResult<Identity>>,
    send: VecDeque<GatewayResult<SendMessageResponse>>,
    list: VecDeque<GatewayResult<Vec<Conversation>>>,
    fetch: VecDeque<GatewayResult<Conversation>>,
    delete: VecDeque<GatewayResult<()>>,
    calls: Vec<RecordedCall>,
}

/// Backend double answering from per-operation queues. Clones share state,
/// so a test can keep one handle after boxing another into a controller.
#[derive(Clone, Default)]
pub struct MockChatBackend {
    inner: Arc<Mutex<Scripted>>,
}

fn next<T>(queue: &mut VecDeque<GatewayResult<T>>) -> GatewayResult<T> {
    queue
        .pop_front()
        .unwrap_or(Err(GatewayError::Server { status: 503 }))
}

impl MockChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_auth(&self, result: GatewayResult<AuthResponse>) {
        self.inner.lock().unwrap().auth.push_back(result);
    }

    pub fn push_identity(&self, result: GatewayResult<Identity>) {
        self.inner.lock().unwrap().identity.push_back(result);
    }

    pub fn push_send(&self, result: GatewayResult<SendMessageResponse>) {
        self.inner.lock().unwrap().send.push_back(result);
    }

    pub fn push_list(&self, result: GatewayResult<Vec<Conversation>>) {
        self.inner.lock().unwrap().list.push_back(result);
    }

    pub fn push_fetch(&self, result: GatewayResult<Conversation>) {
        self.inner.lock().unwrap().fetch.push_back(result);
    }

    pub fn push_delete(&self, result: GatewayResult<()>) {
        self.inner.lock().unwrap().delete.push_back(result);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn register(
        &self,
        _username: &str,
        email: &str,
        _password: &str,
    ) -> GatewayResult<AuthResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::Register(email.to_string()));
        next(&mut inner.auth)
    }

    async fn authenticate(&self, email: &str, _password: &str) -> GatewayResult<AuthResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::Authenticate(email.to_string()));
        next(&mut inner.auth)
    }

    async fn fetch_identity(&self) -> GatewayResult<Identity> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::FetchIdentity);
        next(&mut inner.identity)
    }

    async fn send_message(
        &self,
        text: &str,
        conversation_id: Option<&str>,
    ) -> GatewayResult<SendMessageResponse> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::SendMessage {
            text: text.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        });
        next(&mut inner.send)
    }

    async fn list_conversations(&self) -> GatewayResult<Vec<Conversation>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::ListConversations);
        next(&mut inner.list)
    }

    async fn fetch_conversation(&self, id: &str) -> GatewayResult<Conversation> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::FetchConversation(id.to_string()));
        next(&mut inner.fetch)
    }

    async fn delete_conversation(&self, id: &str) -> GatewayResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall::DeleteConversation(id.to_string()));
        next(&mut inner.delete)
    }
}
