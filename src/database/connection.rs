//! SQLite connection
//!
//! Opens the pool described by `DatabaseConfig` and brings the schema up to
//! date with the embedded migrations.

use crate::config::database::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Create a pool and run pending migrations
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!("Connecting to database at {}", config.url);
    let pool = config
        .create_pool()
        .await
        .with_context(|| format!("Could not open database '{}'", config.url))?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply the migrations under `./migrations`
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Database migration failed")?;
    info!("Database schema is up to date");
    Ok(())
}
