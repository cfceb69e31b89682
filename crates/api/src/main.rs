use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use idolsim_core::catalog::CatalogSnapshot;
use idolsim_db::repositories::CatalogRepo;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use idolsim_api::background::catalog_sync::{CatalogSync, HttpCatalogSource};
use idolsim_api::config::ServerConfig;
use idolsim_api::router::build_app_router;
use idolsim_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "idolsim_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = idolsim_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    idolsim_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    idolsim_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Catalog ---
    let document = CatalogRepo::load_document(&pool)
        .await
        .expect("Failed to load catalog");
    let catalog = CatalogSnapshot::build(0, document).expect("Stored catalog is invalid");
    tracing::info!(regions = catalog.regions().len(), "Catalog loaded");

    // --- App state ---
    let state = AppState::new(pool.clone(), config.clone(), catalog);

    // --- Catalog sync ---
    let sync_cancel = CancellationToken::new();
    let sync_handle = match &config.catalog_sync_url {
        Some(url) => {
            let source = HttpCatalogSource::new(
                url.clone(),
                Duration::from_secs(config.catalog_sync_timeout_secs),
            )
            .expect("Failed to build catalog HTTP client");
            let sync = CatalogSync::new(
                pool,
                Arc::clone(&state.catalog),
                Arc::new(source),
                Duration::from_secs(config.catalog_sync_interval_secs),
            );
            let cancel = sync_cancel.clone();
            Some(tokio::spawn(async move { sync.run(cancel).await }))
        }
        None => {
            tracing::info!("CATALOG_SYNC_URL not set, catalog sync disabled");
            None
        }
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sync_cancel.cancel();
    if let Some(handle) = sync_handle {
        let wait = Duration::from_secs(config.shutdown_timeout_secs);
        let _ = tokio::time::timeout(wait, handle).await;
        tracing::info!("Catalog sync stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
