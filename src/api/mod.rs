//! REST API for plan generation and lookup.

pub mod plan_routes;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use plan_routes::{create_plan_router, AppState, ErrorResponse};

/// Plan routes with CORS and HTTP tracing layers
pub fn create_app(state: AppState) -> Router {
    create_plan_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
