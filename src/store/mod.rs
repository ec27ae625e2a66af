//! Persisted plan records.
//!
//! The pipeline never writes here. The transport saves a record after the
//! terminal `complete` frame and serves lookups by id.

mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::model::{CandidateSet, Constraints, Itinerary, NormalizedSpec};
use crate::pipeline::PlanResult;

pub use file::FilePlanStore;
pub use memory::MemoryPlanStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: Uuid,
    pub destination_city: String,
    pub destination_country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: u32,
    pub budget_per_day: Decimal,
    pub currency: String,
    pub constraints: Constraints,
    pub interests: Vec<String>,
    pub spec: NormalizedSpec,
    pub candidates: CandidateSet,
    pub itinerary: Itinerary,
    pub narrative: String,
    pub status: PlanStatus,
    pub processing_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl PlanRecord {
    pub fn from_result(result: &PlanResult) -> Self {
        let spec = &result.spec;
        Self {
            id: result.result_id,
            destination_city: spec.destination.city.clone(),
            destination_country: spec.destination.country.clone(),
            start_date: spec.dates.start,
            end_date: spec.dates.end,
            duration_days: spec.duration_days(),
            budget_per_day: spec.budget.amount_per_day,
            currency: spec.budget.currency.clone(),
            constraints: spec.constraints.clone(),
            interests: spec.interests.clone(),
            spec: spec.clone(),
            candidates: result.candidates.clone(),
            itinerary: result.itinerary.clone(),
            narrative: result.narrative.text.clone(),
            status: PlanStatus::Completed,
            processing_time_ms: result.processing_time_ms,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn save(&self, record: &PlanRecord) -> Result<(), StoreError>;

    /// `Ok(None)` for an unknown id, `InvalidId` for a malformed one
    async fn get(&self, id: &str) -> Result<Option<PlanRecord>, StoreError>;
}

/// Build the configured backend
pub fn open(config: &StoreConfig) -> Arc<dyn PlanStore> {
    match config {
        StoreConfig::Memory => Arc::new(MemoryPlanStore::new()),
        StoreConfig::File { dir } => Arc::new(FilePlanStore::new(dir.clone())),
    }
}

pub(crate) fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id.trim()).map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::TripRequest;
    use crate::narrate::{Narrative, NarrativeSource};
    use crate::normalize::Normalizer;
    use crate::optimize::Optimizer;

    pub fn record() -> PlanRecord {
        let spec = Normalizer::default()
            .with_today(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
            .normalize(&TripRequest::new("Lisbon", "2030-06-01 to 2030-06-02").budget("€80/day"))
            .into_result()
            .unwrap();
        let candidates = CandidateSet::default();
        let itinerary = Optimizer::default().plan(&spec, &candidates);
        let result = PlanResult {
            result_id: Uuid::new_v4(),
            spec,
            clarifications: Vec::new(),
            candidates,
            itinerary,
            narrative: Narrative {
                text: "# Your 2-Day Lisbon Adventure".into(),
                source: NarrativeSource::Fallback,
                fallback_reason: None,
            },
            processing_time_ms: 1200,
        };
        PlanRecord::from_result(&result)
    }
}
