use std::net::SocketAddr;
use std::sync::Arc;
use fleetline_api::{app, AppState};
use fleetline_store::{InMemoryFavoritesStore, JsonCatalogRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetline_api=debug,fleetline_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = fleetline_store::app_config::Config::load()?;
    tracing::info!("Starting Fleetline API on port {}", config.server.port);

    let repo = JsonCatalogRepository::new(&config.catalog.path);
    let app_state = AppState::load(
        &repo,
        config.pricing.clone(),
        Arc::new(InMemoryFavoritesStore::new()),
    )
    .await?;

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
