//! Plan routes
//!
//! ## Endpoints
//!
//! - `POST /api/plan/generate` - stream NDJSON progress frames for a trip request
//! - `GET  /api/plan/:id`      - fetch a persisted plan record
//! - `GET  /api/health`        - liveness

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde::Serialize;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info};

use crate::error::StoreError;
use crate::events::ProgressEvent;
use crate::model::TripRequest;
use crate::pipeline::{Pipeline, PlanResult};
use crate::store::{PlanRecord, PlanStore};

pub const NDJSON: &str = "application/x-ndjson";

// ── State ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub store: Arc<dyn PlanStore>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, store: Arc<dyn PlanStore>) -> Self {
        Self { pipeline, store }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

// ── Router ───────────────────────────────────────────────────

pub fn create_plan_router(state: AppState) -> Router<()> {
    Router::new()
        .route("/api/plan/generate", post(generate_plan))
        .route("/api/plan/:id", get(get_plan))
        .route("/api/health", get(health))
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /api/plan/generate
///
/// The body is drained one frame at a time from the pipeline's single-slot
/// channel. The terminal `complete` frame is persisted before it is flushed.
async fn generate_plan(
    State(state): State<AppState>,
    Json(request): Json<TripRequest>,
) -> Response {
    info!(destination = %request.destination, "Plan requested");
    let receiver = state.pipeline.stream(request);
    let store = state.store;

    let frames = ReceiverStream::new(receiver).then(move |event| {
        let store = Arc::clone(&store);
        async move {
            if let Some(result) = event.result() {
                persist(store.as_ref(), result).await;
            }
            Ok::<_, Infallible>(encode(&event))
        }
    });

    (
        [
            (header::CONTENT_TYPE, NDJSON),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

/// GET /api/plan/:id
async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanRecord>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get(&id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) | Err(StoreError::InvalidId(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Plan not found".to_string(),
            }),
        )),
        Err(e) => {
            error!(id = %id, error = %e, "Plan lookup failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

/// GET /api/health
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Save the final bundle; failures are logged, never retried
async fn persist(store: &dyn PlanStore, result: &PlanResult) {
    let record = PlanRecord::from_result(result);
    match store.save(&record).await {
        Ok(()) => info!(id = %record.id, "Plan saved"),
        Err(e) => error!(id = %record.id, error = %e, "Failed to persist plan"),
    }
}

fn encode(event: &ProgressEvent) -> String {
    match event.to_ndjson() {
        Ok(line) => line,
        Err(e) => {
            error!(error = %e, "Failed to encode progress frame");
            let fallback = ProgressEvent::error(event.stage, format!("Failed to encode frame: {}", e));
            // Message-only frames always encode
            fallback.to_ndjson().unwrap_or_default()
        }
    }
}
