use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::SharedStore;
use crate::store::UserRecord;

pub const AUTH_HEADER: &str = "x-auth-token";

/// Error response in the backend's `{message}` shape
pub struct ApiError(StatusCode, String);

impl ApiError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self(status, message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "message": self.1 }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    message: String,
    #[serde(rename = "conversationId", default)]
    conversation_id: Option<String>,
}

fn authorize(store: &SharedStore, headers: &HeaderMap) -> Result<UserRecord, ApiError> {
    let store = store.lock().unwrap();
    let token = headers
        .get(store.auth_header.as_str())
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "No token, authorization denied"))?;

    store
        .user_for_token(token)
        .cloned()
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Token is not valid"))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "convo-mock-backend"
    }))
}

pub async fn register(State(store): State<SharedStore>, Json(payload): Json<RegisterPayload>) -> ApiResult {
    if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Please enter all fields"));
    }

    let mut store = store.lock().unwrap();
    if store.find_user_by_email(&payload.email).is_some() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "User already exists"));
    }

    let user = store.create_user(&payload.username, &payload.email, &payload.password);
    let token = store.issue_token(&user.id);
    tracing::info!("Registered user {}", user.email);

    Ok(Json(json!({ "token": token, "user": user.to_json() })))
}

pub async fn login(State(store): State<SharedStore>, Json(payload): Json<LoginPayload>) -> ApiResult {
    let mut store = store.lock().unwrap();
    let user = store
        .find_user_by_email(&payload.email)
        .filter(|u| u.password == payload.password)
        .cloned()
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Invalid credentials"))?;

    let token = store.issue_token(&user.id);
    Ok(Json(json!({ "token": token, "user": user.to_json() })))
}

pub async fn current_user(State(store): State<SharedStore>, headers: HeaderMap) -> ApiResult {
    let user = authorize(&store, &headers)?;
    Ok(Json(user.to_json()))
}

pub async fn send_message(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Json(payload): Json<MessagePayload>,
) -> ApiResult {
    let user = authorize(&store, &headers)?;
    if payload.message.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Message is required"));
    }

    let mut store = store.lock().unwrap();
    if store.fail_sends {
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error generating response",
        ));
    }

    let reply = format!("Echo: {}", payload.message);
    let conversation = store
        .exchange(&user.id, payload.conversation_id.as_deref(), &payload.message, &reply)
        .map_err(|_| ApiError::new(StatusCode::NOT_FOUND, "Conversation not found"))?;

    Ok(Json(json!({
        "message": { "role": "assistant", "content": reply },
        "conversation": conversation.to_json(true),
    })))
}

pub async fn list_conversations(State(store): State<SharedStore>, headers: HeaderMap) -> ApiResult {
    let user = authorize(&store, &headers)?;
    let store = store.lock().unwrap();
    if store.malformed_lists {
        return Ok(Json(json!({ "conversations": "unavailable" })));
    }
    let conversations: Vec<Value> = store
        .conversations_for(&user.id)
        .into_iter()
        .map(|c| c.to_json(false))
        .collect();

    Ok(Json(json!({ "conversations": conversations })))
}

pub async fn get_conversation(
    Path(id): Path<String>,
    State(store): State<SharedStore>,
    headers: HeaderMap,
) -> ApiResult {
    let user = authorize(&store, &headers)?;
    let store = store.lock().unwrap();
    match store.conversation(&user.id, &id) {
        Some(conversation) => Ok(Json(json!({ "conversation": conversation.to_json(true) }))),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "Conversation not found")),
    }
}

pub async fn delete_conversation(
    Path(id): Path<String>,
    State(store): State<SharedStore>,
    headers: HeaderMap,
) -> ApiResult {
    let user = authorize(&store, &headers)?;
    store
        .lock()
        .unwrap()
        .delete_conversation(&user.id, &id)
        .map_err(|_| ApiError::new(StatusCode::NOT_FOUND, "Conversation not found"))?;

    Ok(Json(json!({ "message": "Conversation deleted" })))
}
