//! Wandr REST API Server
//!
//! ## Usage
//!
//! ```bash
//! GOOGLE_MAPS_API_KEY=... ANTHROPIC_API_KEY=... cargo run --bin wandr_server
//!
//! curl -N -X POST http://localhost:3000/api/plan/generate \
//!   -H "Content-Type: application/json" \
//!   -d '{"destination": "Tokyo", "dates": "May 15-17", "budget": "$60/day",
//!        "constraints": "wheelchair, vegan"}'
//!
//! curl http://localhost:3000/api/plan/{id}
//! curl http://localhost:3000/api/health
//! ```

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use wandr::api::{create_app, AppState};
use wandr::config::PlannerConfig;
use wandr::pipeline::Pipeline;
use wandr::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wandr=info")),
        )
        .init();

    let config = PlannerConfig::from_env()?;
    let store = store::open(&config.store);
    let bind_addr = config.server.bind_addr.clone();

    let pipeline = Arc::new(Pipeline::builder().config(config).env_providers().build());
    let app = create_app(AppState::new(pipeline, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Wandr server listening");
    info!("  POST   /api/plan/generate");
    info!("  GET    /api/plan/:id");
    info!("  GET    /api/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
