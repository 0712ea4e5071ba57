use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use bcpms_api::config::ServerConfig;
use bcpms_api::modules::{AppModule, ComposeDeps};
use bcpms_api::router::build_app_router;
use bcpms_db::Database;
use bcpms_storage::{ObjectStorage, S3Storage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bcpms_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(
        env = ?config.app_env,
        host = %config.host,
        port = %config.port,
        "Loaded server configuration",
    );

    // --- Database ---
    let database = Database::connect(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    database
        .health_check()
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    if config.run_migrations {
        database
            .run_migrations()
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    // --- Object storage ---
    let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::new(&config.storage).await);
    tracing::info!(bucket = %config.storage.bucket, backend = storage.backend(), "Object storage ready");

    // --- Modules ---
    let app = AppModule::compose(ComposeDeps {
        database: database.clone(),
        storage,
    })
    .context("Module graph is inconsistent")?;

    // --- Router ---
    let router = build_app_router(&app, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid HOST/PORT")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Cleanup ---
    tracing::info!("Server stopped accepting connections, closing database pool");
    database.close().await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
