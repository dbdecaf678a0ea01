//! Plain-text rendering of the chat state for the terminal.

use convo_client::{Conversation, Identity, Message, Role};
use convo_core::ChatState;

pub const WELCOME: &str = "Start a conversation by typing a message below.";
pub const EMPTY_LIST: &str = "No conversations yet.";

pub fn header(state: &ChatState) -> String {
    format!("== {} ==", state.title())
}

/// Numbered conversation list, active entry marked with `*`.
pub fn sidebar(conversations: &[Conversation], active_id: Option<&str>) -> String {
    if conversations.is_empty() {
        return EMPTY_LIST.to_string();
    }

    conversations
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let marker = if Some(c.id.as_str()) == active_id {
                '*'
            } else {
                ' '
            };
            let title = if c.title.is_empty() {
                "(untitled)"
            } else {
                c.title.as_str()
            };
            match c.updated_at {
                Some(at) => format!(
                    "{}{:>3}. {}  [{}]  {}",
                    marker,
                    i + 1,
                    title,
                    at.format("%Y-%m-%d %H:%M"),
                    c.id
                ),
                None => format!("{}{:>3}. {}  {}", marker, i + 1, title, c.id),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn message(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("{}> {}", speaker, message.content)
}

pub fn transcript(messages: &[Message]) -> String {
    if messages.is_empty() {
        return WELCOME.to_string();
    }
    messages.iter().map(message).collect::<Vec<_>>().join("\n")
}

pub fn identity(identity: &Identity) -> String {
    format!("{} <{}>", identity.username, identity.email)
}

pub fn error_banner(error: &str) -> String {
    format!("! {}", error)
}

pub const HELP: &str = "\
Commands:
  /new            start a new conversation
  /open <n|id>    open a conversation by list number or id
  /delete <n|id>  delete a conversation
  /list           show conversations
  /logout         log out and exit
  /help           show this help
  /quit           exit
Anything else is sent as a message.";
