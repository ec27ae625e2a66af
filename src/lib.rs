//! Wandr - Constraint-Driven Itinerary Synthesis
//!
//! Turns a free-text trip request into a day-by-day itinerary through four
//! sequential stages, streaming progress frames as each one runs:
//!
//! TripRequest -> normalize -> gather -> optimize -> narrate -> PlanResult
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wandr::model::TripRequest;
//! use wandr::pipeline::Pipeline;
//!
//! # async fn run() {
//! let pipeline = Arc::new(Pipeline::builder().env_providers().build());
//! let mut frames = pipeline.stream(
//!     TripRequest::new("Tokyo", "May 15-17")
//!         .budget("$60/day")
//!         .constraints("wheelchair, vegan"),
//! );
//! while let Some(frame) = frames.recv().await {
//!     println!("{:?} {:?}", frame.stage, frame.message);
//! }
//! # }
//! ```

// Core error handling and configuration
pub mod config;
pub mod error;

// Data model shared by every stage
pub mod model;

// Stage 1: request normalization
pub mod normalize;

// External capabilities and their HTTP adapters
pub mod providers;

// Stage 2: candidate gathering
pub mod gather;

// Stage 3: clustering and itinerary optimization
pub mod cluster;
pub mod optimize;

// Stage 4: narrative composition
pub mod narrate;

// Progress protocol and orchestration
pub mod events;
pub mod pipeline;

// Persisted plan records (written by the transport)
pub mod store;

#[cfg(feature = "server")]
pub mod api;

pub use error::{PlannerError, ProviderError, Result};
pub use pipeline::{Pipeline, PipelineOutcome, PlanResult};
