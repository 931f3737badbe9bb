//! amenity-gateway server entry point.
//!
//! Starts the Axum HTTP server for the amenity reservation engine.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use amenity_gateway::api;
use amenity_gateway::app_state::AppState;
use amenity_gateway::config::GatewayConfig;
use amenity_gateway::domain::{AmenityCatalog, BookingLedger, EventBus};
use amenity_gateway::persistence::{self, PostgresArchive};
use amenity_gateway::service::ReservationService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting amenity-gateway");

    // Build domain layer
    let catalog = Arc::new(AmenityCatalog::new());
    if let Some(path) = &config.amenity_catalog_path {
        let json = std::fs::read_to_string(path)?;
        let count = catalog.seed_from_json(&json).await?;
        tracing::info!(count, path, "seeded amenity catalog");
    }
    let ledger = Arc::new(BookingLedger::new(config.ledger_config()));
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let reservation_service = Arc::new(ReservationService::new(
        catalog,
        ledger,
        event_bus.clone(),
    ));

    // Connect the audit archive when enabled and spawn the archiver task
    let archive = if config.persistence_enabled {
        let archive = Arc::new(
            PostgresArchive::connect(&config.database_url, config.database_max_connections)
                .await?,
        );
        tokio::spawn(persistence::run_archiver(
            Arc::clone(&archive),
            event_bus.subscribe(),
        ));
        tracing::info!("audit archive enabled");
        Some(archive)
    } else {
        None
    };

    // Build application state
    let app_state = AppState {
        reservation_service,
        event_bus,
        archive,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
