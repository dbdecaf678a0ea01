use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::store::BackendStore;

pub type SharedStore = Arc<Mutex<BackendStore>>;

pub struct MockBackend {
    store: SharedStore,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(BackendStore::new())),
        }
    }

    /// Expect the token in `header` instead of the default `x-auth-token`.
    pub fn with_auth_header(self, header: &str) -> Self {
        self.store.lock().unwrap().auth_header = header.to_ascii_lowercase();
        self
    }

    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/auth/register", post(handlers::register))
            .route("/auth/login", post(handlers::login))
            .route("/auth/user", get(handlers::current_user))
            .route("/messages", post(handlers::send_message))
            .route("/conversations", get(handlers::list_conversations))
            .route(
                "/conversations/{id}",
                get(handlers::get_conversation).delete(handlers::delete_conversation),
            )
            .with_state(self.store.clone());

        Router::new()
            .route("/health", get(handlers::health_check))
            .nest("/api", api)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `addr` until the process exits.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let addr: SocketAddr = addr.parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Mock chat backend listening on http://{}/api", addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Serve on an ephemeral local port in the background.
    pub async fn start(self) -> anyhow::Result<MockBackendHandle> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await;
            if let Err(e) = result {
                tracing::error!("Mock chat backend error: {}", e);
            }
        });

        tracing::info!("Mock chat backend started on {}", addr);
        Ok(MockBackendHandle {
            addr,
            shutdown_tx,
            store: self.store,
        })
    }
}

pub struct MockBackendHandle {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    store: SharedStore,
}

impl MockBackendHandle {
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Make every following message send fail with HTTP 500.
    pub fn set_fail_sends(&self, fail: bool) {
        self.store.lock().unwrap().fail_sends = fail;
    }

    /// Make conversation lists come back as a 200 with an unusable body.
    pub fn set_malformed_lists(&self, malformed: bool) {
        self.store.lock().unwrap().malformed_lists = malformed;
    }

    pub fn expire_tokens(&self) {
        self.store.lock().unwrap().expire_tokens();
    }

    pub fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            tracing::warn!("Mock chat backend already stopped");
        }
    }
}
