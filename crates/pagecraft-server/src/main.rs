//! Pagecraft server entry point.
//!
//! Loads configuration, opens the storage backend, builds the AI client and
//! session store, then starts the Axum HTTP server with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use pagecraft_storage::{MemoryRepository, Repository};

use pagecraft_server::ai::OpenAiClient;
use pagecraft_server::config::{ServerConfig, StorageBackendType};
use pagecraft_server::routes::build_router;
use pagecraft_server::sessions::SessionStore;
use pagecraft_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(storage = ?config.storage_backend, ai = ?config.ai, "Pagecraft starting");

    let state = build_app_state(&config).await?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Pagecraft server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("Pagecraft server stopped");
    Ok(())
}

/// Open storage and wire the services into shared state.
async fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let repo: Arc<dyn Repository> = match &config.storage_backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (data will not persist)");
            Arc::new(MemoryRepository::new())
        }
        #[cfg(feature = "postgres-backend")]
        StorageBackendType::Postgres { url } => {
            info!(url = %"[redacted]", "using PostgreSQL storage");
            Arc::new(
                pagecraft_storage::PostgresRepository::connect(url)
                    .await
                    .context("failed to connect to PostgreSQL storage")?,
            )
        }
        #[cfg(not(feature = "postgres-backend"))]
        StorageBackendType::Postgres { .. } => {
            anyhow::bail!(
                "PostgreSQL backend requested but feature 'postgres-backend' is not enabled"
            );
        }
    };

    if config.ai.api_key.is_none() {
        warn!("PAGECRAFT_AI_KEY is not set; page generation will fail");
    }
    let generator = OpenAiClient::new(&config.ai).context("failed to build AI client")?;

    let sessions = SessionStore::parse(&config.session_tokens);
    if sessions.is_empty() {
        warn!("no session tokens configured (PAGECRAFT_SESSION_TOKENS); owner routes will reject every request");
    } else {
        info!(count = sessions.len(), "session tokens loaded");
    }

    let state = AppState::new(repo, Arc::new(generator), sessions)
        .with_public_url(config.public_url.clone());
    Ok(Arc::new(state))
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
