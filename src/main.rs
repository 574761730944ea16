use std::sync::Arc;

use marquee_api::{
    api::{create_router, AppState, RequestDefaults},
    config::Config,
    db::{create_pool, MemoryStore, PgStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marquee_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Initialize application state
    let state = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url, config.db_max_connections).await?;
            let store = Arc::new(PgStore::new(pool));
            tracing::info!("Using PostgreSQL store");
            AppState::new(
                store.clone(),
                store.clone(),
                store,
                RequestDefaults::from(&config),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using an empty in-memory store");
            AppState::in_memory(Arc::new(MemoryStore::new()), &config)
        }
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
