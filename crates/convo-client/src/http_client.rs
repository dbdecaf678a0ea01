use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    AuthResponse, ChatBackend, Conversation, ConversationListResponse, ConversationResponse,
    CredentialStore, GatewayError, GatewayResult, Identity, LoginRequest, RegisterRequest,
    SendMessageRequest, SendMessageResponse,
};

pub const DEFAULT_AUTH_HEADER: &str = "x-auth-token";

/// HTTP client for the chat backend's REST surface
pub struct HttpChatBackend {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
    timeout: Duration,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpChatBackend {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(30),
            credentials,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_header(mut self, header: impl Into<String>) -> Self {
        self.auth_header = header.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        log::debug!("{} {}{}", method, self.base_url, path);
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .timeout(self.timeout);

        match self.credentials.load() {
            Ok(Some(token)) => builder = builder.header(self.auth_header.as_str(), token),
            Ok(None) => {}
            Err(e) => log::warn!("Sending request without credential: {}", e),
        }

        builder
    }

    async fn send(&self, builder: RequestBuilder) -> GatewayResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = GatewayError::from_status(status, &body);
        log::debug!("Request failed with {}: {}", status, err);
        Err(err)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> GatewayResult<T> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn conversation_path(id: &str) -> String {
        format!("/conversations/{}", urlencoding::encode(id))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> GatewayResult<AuthResponse> {
        let payload = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(self.request(Method::POST, "/auth/register").json(&payload))
            .await
    }

    async fn authenticate(&self, email: &str, password: &str) -> GatewayResult<AuthResponse> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(self.request(Method::POST, "/auth/login").json(&payload))
            .await
    }

    async fn fetch_identity(&self) -> GatewayResult<Identity> {
        self.execute(self.request(Method::GET, "/auth/user")).await
    }

    async fn send_message(
        &self,
        text: &str,
        conversation_id: Option<&str>,
    ) -> GatewayResult<SendMessageResponse> {
        let payload = SendMessageRequest {
            message: text.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        };
        self.execute(self.request(Method::POST, "/messages").json(&payload))
            .await
    }

    async fn list_conversations(&self) -> GatewayResult<Vec<Conversation>> {
        let response: ConversationListResponse = self
            .execute(self.request(Method::GET, "/conversations"))
            .await?;
        Ok(response.conversations)
    }

    async fn fetch_conversation(&self, id: &str) -> GatewayResult<Conversation> {
        let response: ConversationResponse = self
            .execute(self.request(Method::GET, &Self::conversation_path(id)))
            .await?;
        Ok(response.conversation)
    }

    async fn delete_conversation(&self, id: &str) -> GatewayResult<()> {
        self.send(self.request(Method::DELETE, &Self::conversation_path(id)))
            .await?;
        Ok(())
    }
}
