// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the recommendation engine
// Usage: cargo run --features api --bin api_server

use anyhow::Context;
use crop_recommender_rust::{
    create_router, forecast::InMemoryClimatology, AppState, ClimatologySource, CropCatalog,
    EngineConfig, RecommendationEngine, RegionCatalog,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "crop_recommender_rust=info,tower_http=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    // Configuration from environment variables
    // Catalog files are optional; the built-in tables are used when unset
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let config = match std::env::var("CONFIG_FILE") {
        Ok(path) => EngineConfig::load(&path)?,
        Err(_) => EngineConfig::from_env()?,
    };

    let crops = match std::env::var("CROPS_FILE") {
        Ok(path) => CropCatalog::from_json_file(&path)?,
        Err(_) => CropCatalog::builtin(),
    };

    let regions = match std::env::var("REGIONS_FILE") {
        Ok(path) => RegionCatalog::from_json_file(&path)?,
        Err(_) => RegionCatalog::builtin(),
    };

    let climatology = match std::env::var("CLIMATOLOGY_FILE") {
        Ok(path) => InMemoryClimatology::from_json_file(&path)?,
        Err(_) => {
            tracing::warn!("CLIMATOLOGY_FILE not set; outlooks rely on live weather only");
            InMemoryClimatology::new()
        }
    };

    tracing::info!("Configuration:");
    tracing::info!("  PORT: {}", port);
    tracing::info!("  TOP_N: {}", config.top_n);
    tracing::info!("  NEAREST_REGION_KM: {}", config.nearest_region_km);
    tracing::info!("  Crops: {}, regions: {}", crops.len(), regions.len());

    let engine = RecommendationEngine::new(crops, regions, config)
        .context("Failed to build recommendation engine")?;
    let climatology: Arc<dyn ClimatologySource> = Arc::new(climatology);
    let state = AppState::new(engine, climatology);

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
