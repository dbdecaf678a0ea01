//! Terminal front end for the convo chat client
//!
//! One-shot subcommands cover each backend operation; `convo chat` runs an
//! interactive loop over the same controller.

pub mod chat_command;
pub mod render;
