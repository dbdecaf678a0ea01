use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::handlers::AUTH_HEADER;

const TITLE_LEN: usize = 30;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserRecord {
    pub fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "username": self.username,
            "email": self.email,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub messages: Vec<StoredMessage>,
    pub updated_at: DateTime<Utc>,
    /// Monotonic touch counter; list order is by this, newest first.
    pub touched: u64,
}

impl ConversationRecord {
    pub fn to_json(&self, with_messages: bool) -> Value {
        let mut value = json!({
            "_id": self.id,
            "title": self.title,
            "updatedAt": self.updated_at.to_rfc3339(),
        });
        if with_messages {
            value["messages"] = json!(self.messages);
        }
        value
    }
}

/// Users, issued tokens and conversations held by the mock backend.
#[derive(Debug, Default)]
pub struct BackendStore {
    users: Vec<UserRecord>,
    tokens: HashMap<String, String>,
    conversations: Vec<ConversationRecord>,
    clock: u64,
    /// Header the token is expected in, lowercase
    pub auth_header: String,
    pub fail_sends: bool,
    /// Answer conversation lists with a body of the wrong shape
    pub malformed_lists: bool,
}

#[derive(Debug)]
pub enum StoreError {
    NotFound,
}

impl BackendStore {
    pub fn new() -> Self {
        Self {
            auth_header: AUTH_HEADER.to_string(),
            ..Self::default()
        }
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn create_user(&mut self, username: &str, email: &str, password: &str) -> UserRecord {
        let user = UserRecord {
            id: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.users.push(user.clone());
        user
    }

    pub fn issue_token(&mut self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user_id.to_string());
        token
    }

    pub fn user_for_token(&self, token: &str) -> Option<&UserRecord> {
        let user_id = self.tokens.get(token)?;
        self.users.iter().find(|u| &u.id == user_id)
    }

    /// Invalidate every issued token, as if they had all expired.
    pub fn expire_tokens(&mut self) {
        self.tokens.clear();
    }

    pub fn conversations_for(&self, owner: &str) -> Vec<&ConversationRecord> {
        let mut owned: Vec<&ConversationRecord> = self
            .conversations
            .iter()
            .filter(|c| c.owner == owner)
            .collect();
        owned.sort_by(|a, b| b.touched.cmp(&a.touched));
        owned
    }

    pub fn conversation(&self, owner: &str, id: &str) -> Option<&ConversationRecord> {
        self.conversations
            .iter()
            .find(|c| c.owner == owner && c.id == id)
    }

    /// Append a user message and the assistant's reply, creating the
    /// conversation when `conversation_id` is `None`.
    pub fn exchange(
        &mut self,
        owner: &str,
        conversation_id: Option<&str>,
        text: &str,
        reply: &str,
    ) -> Result<ConversationRecord, StoreError> {
        self.clock += 1;
        let touched = self.clock;

        let index = match conversation_id {
            Some(id) => self
                .conversations
                .iter()
                .position(|c| c.owner == owner && c.id == id)
                .ok_or(StoreError::NotFound)?,
            None => {
                self.conversations.push(ConversationRecord {
                    id: Uuid::new_v4().simple().to_string(),
                    owner: owner.to_string(),
                    title: text.chars().take(TITLE_LEN).collect(),
                    messages: Vec::new(),
                    updated_at: Utc::now(),
                    touched,
                });
                self.conversations.len() - 1
            }
        };

        let conversation = &mut self.conversations[index];
        conversation.messages.push(StoredMessage {
            role: "user".to_string(),
            content: text.to_string(),
        });
        conversation.messages.push(StoredMessage {
            role: "assistant".to_string(),
            content: reply.to_string(),
        });
        conversation.updated_at = Utc::now();
        conversation.touched = touched;

        Ok(conversation.clone())
    }

    pub fn delete_conversation(&mut self, owner: &str, id: &str) -> Result<(), StoreError> {
        let before = self.conversations.len();
        self.conversations
            .retain(|c| !(c.owner == owner && c.id == id));
        if self.conversations.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
