mod config;
mod db;
mod document;
mod errors;
mod interchange;
mod layout;
mod models;
mod records;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::records::{MemoryStore, PgRecordStore, RecordStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shokureki API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the record store
    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => Arc::new(PgRecordStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; records are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Build app state (simulated renderer, settle policy, A4 safe zone)
    let state = AppState::new(store, config.clone());
    info!(
        "Layout page config: {:?} {}pt, settle {:?} x{}",
        state.page_config.font,
        state.page_config.font_size_pt,
        state.settle.delay,
        state.settle.retries
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
