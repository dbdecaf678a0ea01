//! In-memory stand-in for the convo chat backend
//!
//! Implements the REST surface the client consumes (auth, messages,
//! conversations) against a process-local store. The assistant simply echoes
//! the user's message, which keeps tests deterministic.

pub mod handlers;
pub mod server;
pub mod store;

pub use server::{MockBackend, MockBackendHandle};
pub use store::BackendStore;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_health_check() {
        let handle = MockBackend::new().start().await.unwrap();
        let url = handle.base_url().replace("/api", "/health");

        let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["status"], "ok");

        handle.shutdown();
    }

    #[tokio::test]
    async fn test_requests_without_token_are_rejected() {
        let handle = MockBackend::new().start().await.unwrap();
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{}/conversations", handle.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 401);

        let response = client
            .get(format!("{}/conversations", handle.base_url()))
            .header(handlers::AUTH_HEADER, "bogus")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Token is not valid");

        handle.shutdown();
    }

    #[tokio::test]
    async fn test_register_then_send() {
        let handle = MockBackend::new().start().await.unwrap();
        let client = reqwest::Client::new();

        let session: Value = client
            .post(format!("{}/auth/register", handle.base_url()))
            .json(&json!({"username": "ana", "email": "ana@example.com", "password": "pw"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let token = session["token"].as_str().unwrap().to_string();

        let reply: Value = client
            .post(format!("{}/messages", handle.base_url()))
            .header(handlers::AUTH_HEADER, &token)
            .json(&json!({"message": "Hello"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(reply["message"]["content"], "Echo: Hello");
        assert_eq!(reply["conversation"]["title"], "Hello");
        assert_eq!(reply["conversation"]["messages"].as_array().unwrap().len(), 2);

        handle.shutdown();
    }
}
