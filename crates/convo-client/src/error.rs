//! Categorized failures of a single gateway call.
//!
//! The gateway only classifies by HTTP status; deciding what a failure means
//! for the session or the transcript is left to the caller.

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ErrorBody;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No response was received
    #[error("Network failure: {0}")]
    Network(String),

    /// The credential is missing, invalid or expired (401)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request was rejected (4xx) with a message meant for the user
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// The backend failed (5xx)
    #[error("Server error: HTTP {status}")]
    Server { status: u16 },

    /// A success response whose body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Classify a non-success response by its status and body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        if status == StatusCode::UNAUTHORIZED {
            GatewayError::Auth(message)
        } else if status.is_client_error() {
            GatewayError::Validation {
                status: status.as_u16(),
                message,
            }
        } else if status.is_server_error() {
            GatewayError::Server {
                status: status.as_u16(),
            }
        } else {
            GatewayError::Decode(format!("unexpected status {}", status))
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::Auth(_))
    }

    /// Text to show the user: validation messages verbatim, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Validation { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}
