use std::sync::Arc;

use tracing::{Level, info};

use server::config::AppConfig;
use server::database;
use server::download::HttpImageSource;
use server::provider::ReplicateClient;
use server::state::AppState;
use server::storage::S3AssetStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    let provider = Arc::new(ReplicateClient::new(&config.provider));
    let assets = Arc::new(S3AssetStore::new(&config.storage)?);
    let source = Arc::new(HttpImageSource::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        provider,
        assets,
        source,
        config,
    };

    let app = server::build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
