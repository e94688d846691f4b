use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use paperinsight::classifier::HttpClassifier;
use paperinsight::config::AppConfig;
use paperinsight::db::{AnalysisStore, MemoryStore, PgStore};
use paperinsight::services::AppState;
use paperinsight::{metrics, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    dotenvy::dotenv().ok();
    let config = Arc::new(AppConfig::build()?);

    // 2. Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.rust_log))
        .init();

    tracing::info!("Starting PaperInsight v{}", paperinsight::VERSION);

    // 3. Metrics
    metrics::register_metrics();
    let metrics_handle = metrics::install_recorder()?;

    // 4. Store selection
    let store: Arc<dyn AnalysisStore> = if config.database.url == "memory" {
        tracing::warn!("Using in-memory analysis store; records will not survive restarts");
        Arc::new(MemoryStore::new())
    } else {
        let store = PgStore::connect(&config.database).await?;
        tracing::info!("Connected to database");
        Arc::new(store)
    };

    // 5. Classification client
    let classifier = Arc::new(HttpClassifier::new(&config.classifier)?);
    tracing::info!(base_url = %config.classifier.base_url, "Classification service configured");

    // 6. App state and router
    let state = AppState::new(config.clone(), store, classifier);
    let app = routes::create_router(state).merge(metrics::metrics_router(metrics_handle));

    // 7. Serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => tracing::info!("Received SIGTERM, starting shutdown..."),
    }
}
