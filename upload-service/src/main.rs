use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

mod config;
mod errors;
mod handlers;
mod models;
mod queue;
mod storage;

use config::{Config, CONTAINER_NAME, QUEUE_NAME};
use queue::{AzureQueueClient, MessageQueue};
use storage::BlobContainerClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub blob_client: Arc<BlobContainerClient>,
    pub queue: Arc<dyn MessageQueue>,
}

/// Build the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Any origin may call the service
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/generate-sas", get(handlers::sas::generate_sas))
        .route("/queue", post(handlers::queue::enqueue_photo))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Graceful shutdown handler
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    shared::observability::init_logging(config.logging.clone())
        .context("Failed to initialize logging")?;

    info!("Starting Upload Service v{}", env!("CARGO_PKG_VERSION"));

    let blob_client = BlobContainerClient::new(&config.storage, CONTAINER_NAME)
        .context("Failed to initialize blob container client")?;
    let queue_client = AzureQueueClient::new(&config.storage, QUEUE_NAME)
        .context("Failed to initialize queue client")?;
    info!(
        account = %config.storage.account_name,
        container = %blob_client.container(),
        queue = %queue_client.queue_name(),
        "Storage clients initialized"
    );

    let state = AppState {
        blob_client: Arc::new(blob_client),
        queue: Arc::new(queue_client),
    };

    let app = create_router(state);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid SERVER_HOST {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Upload Service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Upload Service shut down gracefully");
    Ok(())
}
