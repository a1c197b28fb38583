use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The connection URL comes from the configuration file when present, falling
/// back to the `DATABASE_URL` environment variable (a `.env` file is honored).
/// When neither is set the service runs without analytics, so this returns
/// `Ok(None)` rather than an error — the caller decides what degraded mode
/// looks like.
pub async fn connect(settings: &DatabaseSettings) -> Result<Option<PgPool>, DbError> {
    // Load environment variables from the .env file, if one exists.
    dotenvy::dotenv().ok();

    let url = match settings.url.clone().or_else(|| env::var("DATABASE_URL").ok()) {
        Some(url) => url,
        None => return Ok(None),
    };
    if url.is_empty() {
        return Err(DbError::ConnectionConfigError(
            "DATABASE_URL is set but empty".to_string(),
        ));
    }

    let pool = PgPoolOptions::new()
        .min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&url)
        .await?;

    Ok(Some(pool))
}

/// A utility function to run database migrations automatically.
///
/// This is useful for ensuring the database schema is up-to-date when the application starts,
/// which is especially important in production deployments.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
