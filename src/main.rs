use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use salonbook::config::AppConfig;
use salonbook::handlers;
use salonbook::state::AppState;
use salonbook::store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if config.admin_token == "changeme" {
        tracing::warn!("ADMIN_TOKEN is not set, using the default token");
    }

    let store = SqliteStore::open(&config.database_url, config.store_timeout)?;
    tracing::info!(
        database = %config.database_url,
        timeout_ms = config.store_timeout.as_millis() as u64,
        "record store ready"
    );

    let state = Arc::new(AppState {
        store: Arc::new(store),
        calendar: config.calendar(),
        config: config.clone(),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
