use chrono::{TimeZone, Utc};
use convo_client::{AuthResponse, Conversation, Identity, Message, SendMessageResponse};

pub fn identity() -> Identity {
    Identity {
        id: "u1".to_string(),
        username: "ana".to_string(),
        email: "ana@example.com".to_string(),
    }
}

pub fn auth_response(token: &str) -> AuthResponse {
    AuthResponse {
        token: token.to_string(),
        user: identity(),
    }
}

pub fn conversation(id: &str, title: &str, messages: Vec<Message>) -> Conversation {
    Conversation {
        id: id.to_string(),
        title: title.to_string(),
        messages,
        updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single(),
    }
}

pub fn summary(id: &str, title: &str) -> Conversation {
    conversation(id, title, Vec::new())
}

/// Backend reply that appends `user_text` and `reply` to `prior`.
pub fn reply(
    id: &str,
    title: &str,
    prior: &[Message],
    user_text: &str,
    reply: &str,
) -> SendMessageResponse {
    let mut messages = prior.to_vec();
    messages.push(Message::user(user_text));
    messages.push(Message::assistant(reply));

    SendMessageResponse {
        message: Message::assistant(reply),
        conversation: Some(conversation(id, title, messages)),
    }
}
