use convo_client::{
    ChatBackend, CredentialStore, GatewayError, HttpChatBackend, MemoryCredentialStore, Role,
};
use convo_mock_backend::MockBackend;
use std::sync::Arc;
use std::time::Duration;

async fn logged_in_client(base_url: &str) -> (HttpChatBackend, Arc<MemoryCredentialStore>) {
    let credentials = Arc::new(MemoryCredentialStore::new());
    let client = HttpChatBackend::new(base_url, credentials.clone());

    let session = client
        .register("ana", "ana@example.com", "secret")
        .await
        .unwrap();
    credentials.save(&session.token).unwrap();

    (client, credentials)
}

#[tokio::test]
async fn test_register_and_fetch_identity() {
    let handle = MockBackend::new().start().await.unwrap();
    let (client, _) = logged_in_client(&handle.base_url()).await;

    let identity = client.fetch_identity().await.unwrap();
    assert_eq!(identity.username, "ana");
    assert_eq!(identity.email, "ana@example.com");

    handle.shutdown();
}

#[tokio::test]
async fn test_authenticate_with_wrong_password_is_validation_failure() {
    let handle = MockBackend::new().start().await.unwrap();
    let (client, _) = logged_in_client(&handle.base_url()).await;

    let err = client
        .authenticate("ana@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GatewayError::Validation {
            status: 400,
            message: "Invalid credentials".to_string()
        }
    );

    let session = client
        .authenticate("ana@example.com", "secret")
        .await
        .unwrap();
    assert_eq!(session.user.username, "ana");

    handle.shutdown();
}

#[tokio::test]
async fn test_missing_credential_is_auth_failure() {
    let handle = MockBackend::new().start().await.unwrap();
    let client = HttpChatBackend::new(handle.base_url(), Arc::new(MemoryCredentialStore::new()));

    let err = client.fetch_identity().await.unwrap_err();
    assert!(err.is_auth());

    handle.shutdown();
}

#[tokio::test]
async fn test_expired_credential_is_auth_failure() {
    let handle = MockBackend::new().start().await.unwrap();
    let (client, _) = logged_in_client(&handle.base_url()).await;

    handle.expire_tokens();
    let err = client.list_conversations().await.unwrap_err();
    assert!(err.is_auth());

    handle.shutdown();
}

#[tokio::test]
async fn test_send_list_fetch_delete_round() {
    let handle = MockBackend::new().start().await.unwrap();
    let (client, _) = logged_in_client(&handle.base_url()).await;

    let first = client.send_message("Hello", None).await.unwrap();
    assert_eq!(first.message.role, Role::Assistant);
    let conversation = first.conversation.unwrap();
    assert_eq!(conversation.title, "Hello");
    assert!(conversation.updated_at.is_some());

    let second = client
        .send_message("More", Some(&conversation.id))
        .await
        .unwrap();
    assert_eq!(second.conversation.unwrap().messages.len(), 4);

    let listed = client.list_conversations().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, conversation.id);

    let detail = client.fetch_conversation(&conversation.id).await.unwrap();
    assert_eq!(detail.messages.len(), 4);
    assert_eq!(detail.messages[2].content, "More");

    client.delete_conversation(&conversation.id).await.unwrap();
    let listed = client.list_conversations().await.unwrap();
    assert!(listed.iter().all(|c| c.id != conversation.id));

    handle.shutdown();
}

#[tokio::test]
async fn test_server_failure_is_classified() {
    let handle = MockBackend::new().start().await.unwrap();
    let (client, _) = logged_in_client(&handle.base_url()).await;

    handle.set_fail_sends(true);
    let err = client.send_message("Hello", None).await.unwrap_err();
    assert_eq!(err, GatewayError::Server { status: 500 });

    handle.shutdown();
}

#[tokio::test]
async fn test_unknown_conversation_is_validation_failure() {
    let handle = MockBackend::new().start().await.unwrap();
    let (client, _) = logged_in_client(&handle.base_url()).await;

    let err = client.fetch_conversation("missing").await.unwrap_err();
    assert_eq!(err.user_message("Failed to load conversation"), "Conversation not found");

    let err = client.delete_conversation("missing").await.unwrap_err();
    assert!(matches!(err, GatewayError::Validation { status: 404, .. }));

    handle.shutdown();
}

#[tokio::test]
async fn test_unreachable_backend_is_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpChatBackend::new(
        format!("http://{}/api", addr),
        Arc::new(MemoryCredentialStore::new()),
    )
    .with_timeout(Duration::from_secs(2));
    let err = client.list_conversations().await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}

#[tokio::test]
async fn test_list_with_unexpected_shape_is_decode_failure() {
    let handle = MockBackend::new().start().await.unwrap();
    let (client, _) = logged_in_client(&handle.base_url()).await;
    handle.set_malformed_lists(true);

    let err = client.list_conversations().await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)), "got {:?}", err);

    handle.shutdown();
}

#[tokio::test]
async fn test_custom_credential_header() {
    let handle = MockBackend::new()
        .with_auth_header("Authorization-Token")
        .start()
        .await
        .unwrap();
    let credentials = Arc::new(MemoryCredentialStore::new());

    let default_header = HttpChatBackend::new(handle.base_url(), credentials.clone());
    let session = default_header
        .register("ana", "ana@example.com", "secret")
        .await
        .unwrap();
    credentials.save(&session.token).unwrap();

    let err = default_header.fetch_identity().await.unwrap_err();
    assert!(err.is_auth());

    let custom_header = HttpChatBackend::new(handle.base_url(), credentials.clone())
        .with_auth_header("Authorization-Token");
    let identity = custom_header.fetch_identity().await.unwrap();
    assert_eq!(identity.email, "ana@example.com");

    handle.shutdown();
}
