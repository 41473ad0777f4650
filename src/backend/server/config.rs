/**
 * Database Setup
 *
 * Opens the PostgreSQL pool named by `AppConfig::database_url` and runs the
 * embedded migrations from `migrations/`.
 *
 * # Error Handling
 *
 * A failure here does not stop startup. The server logs it and falls back
 * to the in-memory store, which keeps the API usable for local work.
 */

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::backend::store::StoreError;
use crate::shared::AppConfig;

/// `Some(pool)` when a database is configured and reachable
pub type DatabaseConfig = Option<PgPool>;

pub async fn load_database(config: &AppConfig) -> DatabaseConfig {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("[Store] DATABASE_URL not set, using the in-memory store");
        return None;
    };

    match connect(database_url, config.database_max_connections).await {
        Ok(pool) => Some(pool),
        Err(err) => {
            tracing::error!(error = %err, "[Store] database unavailable, using the in-memory store");
            None
        }
    }
}

async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    tracing::info!(max_connections, "[Store] Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    tracing::info!("[Store] Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("[Store] Database ready");

    Ok(pool)
}
