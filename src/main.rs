use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use detail_tracker::config::{DatabaseConfig, EnvironmentConfig};
use detail_tracker::{create_router, database, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading any configuration
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("detail_tracker=debug,tower_http=info")),
        )
        .init();

    info!("🚗 Detail Tracker - detailing time log");

    let config = EnvironmentConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    info!("⚙️  Environment: {}", config.environment);

    let pool = match database::create_pool(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Could not initialise the database: {:#}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(pool.clone(), config));

    info!("🌐 Listening on http://{}", addr);
    info!("   GET    /health");
    info!("   GET    /api/options");
    info!("   POST   /api/entries");
    info!("   GET    /api/entries");
    info!("   DELETE /api/entries");
    info!("   GET    /api/entries/summary");
    info!("   GET    /api/entries/export");
    info!("   GET    /api/entries/:id");
    info!("   PUT    /api/entries/:id");
    info!("   DELETE /api/entries/:id");
    info!("   GET    /api/dashboard");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    pool.close().await;
    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
