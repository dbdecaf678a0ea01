//! Parsing of lines typed in interactive mode.

use convo_client::Conversation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    New,
    Open(String),
    Delete(String),
    List,
    Logout,
    Help,
    Quit,
    Message(String),
    Empty,
}

impl ChatCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        if !line.starts_with('/') {
            return Ok(Self::Message(line.to_string()));
        }

        let mut parts = line.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match (name, arg) {
            ("/new", None) => Ok(Self::New),
            ("/list", None) => Ok(Self::List),
            ("/logout", None) => Ok(Self::Logout),
            ("/help", None) => Ok(Self::Help),
            ("/quit" | "/exit", None) => Ok(Self::Quit),
            ("/open", Some(target)) => Ok(Self::Open(target.to_string())),
            ("/delete", Some(target)) => Ok(Self::Delete(target.to_string())),
            ("/open" | "/delete", None) => Err(format!("{} needs a list number or id", name)),
            _ => Err(format!("Unknown command '{}', try /help", line)),
        }
    }
}

/// Resolve a conversation id, or failing that a 1-based list number.
pub fn resolve_target(target: &str, conversations: &[Conversation]) -> Option<String> {
    if let Some(c) = conversations.iter().find(|c| c.id == target) {
        return Some(c.id.clone());
    }
    target
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| conversations.get(i))
        .map(|c| c.id.clone())
}
