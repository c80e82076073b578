use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Creates a PostgreSQL connection pool and applies pending migrations.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");

    MIGRATOR
        .run(&pool)
        .await
        .context("failed to apply database migrations")?;
    info!("Database migrations applied");

    Ok(pool)
}
