use axum::routing::{get, post, put};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{RestAuthClient, SharedAuthClient, StaticAuthClient};
use crate::config::{AppConfig, StoreBackend};
use crate::error::{CoreError, CoreResult};
use crate::llm::build_provider;
use crate::note::UserId;
use crate::store::{MemoryNoteStore, RestNoteStore, SharedNoteStore};
use crate::summary::SummaryGateway;

pub mod auth;
pub mod error;
pub mod notes;
pub mod openapi;
pub mod summarize;

/// Collaborators shared by every request handler.
pub struct ServerState {
    pub(crate) store: SharedNoteStore,
    pub(crate) auth: SharedAuthClient,
    pub(crate) gateway: Arc<SummaryGateway>,
}

impl ServerState {
    pub fn new(store: SharedNoteStore, auth: SharedAuthClient, gateway: SummaryGateway) -> Self {
        Self {
            store,
            auth,
            gateway: Arc::new(gateway),
        }
    }

    /// Wires the configured store, auth service and summary provider.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let client = config.http_client()?;
        let (store, auth): (SharedNoteStore, SharedAuthClient) = match &config.store {
            StoreBackend::Rest(settings) => {
                tracing::info!(url = %settings.url, "using hosted note store");
                (
                    Arc::new(RestNoteStore::new(client.clone(), settings.clone())),
                    Arc::new(RestAuthClient::new(client.clone(), settings.clone())),
                )
            }
            StoreBackend::Memory { user } => {
                tracing::warn!(user = %user, "using in-memory note store, notes are not persisted");
                (
                    Arc::new(MemoryNoteStore::new()),
                    Arc::new(StaticAuthClient::new(UserId::new(user.clone()))),
                )
            }
        };
        let provider = build_provider(&config.llm, client);
        if provider.is_none() {
            tracing::warn!("CLAUDE_API_KEY is not set, summaries will fail");
        }
        let gateway = SummaryGateway::new(provider, config.llm.model.clone());
        Ok(Self::new(store, auth, gateway))
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/health", get(health))
        .route("/api/summarize", post(summarize::summarize))
        .route("/api/notes", get(notes::list).post(notes::create))
        .route("/api/notes/:id", put(notes::update).delete(notes::delete))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", post(auth::logout))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Server {
    pub async fn start(addr: SocketAddr, state: ServerState) -> CoreResult<Self> {
        let app = router(Arc::new(state));
        let listener = TcpListener::bind(addr).await.map_err(|error| {
            CoreError::Configuration(format!("failed to bind {addr}: {error}"))
        })?;
        let addr = listener.local_addr().map_err(|error| {
            CoreError::Configuration(format!("failed to read bound address: {error}"))
        })?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(error) = result {
                tracing::error!(%error, "server stopped with an error");
            }
        });

        tracing::info!(%addr, "listening");
        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
        })
    }

    pub async fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let state = ServerState::from_config(config)?;
        Self::start(config.addr, state).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) -> Result<(), String> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| "failed to send server shutdown signal".to_string())
        } else {
            Ok(())
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

async fn health() -> &'static str {
    "ok"
}
