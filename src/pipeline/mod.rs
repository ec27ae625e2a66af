//! Pipeline orchestration: normalize, gather, optimize, narrate.

mod orchestrator;
pub mod state;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PlannerConfig;
use crate::gather::Gatherer;
use crate::model::{CandidateSet, Itinerary, NormalizedSpec};
use crate::narrate::{Narrative, Narrator};
use crate::normalize::Normalizer;
use crate::optimize::Optimizer;
use crate::providers::{
    AccessibilityCheck, CachedPlaceSearch, Geocode, GoogleMapsClient, LlmTextGenerator,
    PlaceSearch, RedditClient, SocialSearch, StaticGeocodeTable, TextGenerator,
};

pub use orchestrator::Pipeline;
pub use state::{FailureCause, PipelineOutcome, PipelineState};

/// Everything one successful run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub result_id: Uuid,
    pub spec: NormalizedSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clarifications: Vec<String>,
    pub candidates: CandidateSet,
    pub itinerary: Itinerary,
    pub narrative: Narrative,
    /// Pipeline entry to the final frame
    pub processing_time_ms: u64,
}

/// Injects capabilities and configuration into a `Pipeline`.
///
/// Every capability is optional. Missing place search yields a degenerate
/// itinerary and missing text generation yields the fallback narrative.
#[derive(Default)]
pub struct PipelineBuilder {
    config: PlannerConfig,
    today: Option<NaiveDate>,
    places: Option<Arc<dyn PlaceSearch>>,
    cache_places: bool,
    geocoder: Option<Arc<dyn Geocode>>,
    fallback_coordinates: Option<StaticGeocodeTable>,
    social: Option<Arc<dyn SocialSearch>>,
    accessibility: Option<Arc<dyn AccessibilityCheck>>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl PipelineBuilder {
    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Reference date for relative expressions like "next weekend"
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn places(mut self, places: Arc<dyn PlaceSearch>) -> Self {
        self.places = Some(places);
        self
    }

    /// Wrap place search in the TTL cache from `search.cache_ttl_secs`
    pub fn cache_places(mut self, enabled: bool) -> Self {
        self.cache_places = enabled;
        self
    }

    pub fn geocoder(mut self, geocoder: Arc<dyn Geocode>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn fallback_coordinates(mut self, table: StaticGeocodeTable) -> Self {
        self.fallback_coordinates = Some(table);
        self
    }

    pub fn social(mut self, social: Arc<dyn SocialSearch>) -> Self {
        self.social = Some(social);
        self
    }

    pub fn accessibility(mut self, accessibility: Arc<dyn AccessibilityCheck>) -> Self {
        self.accessibility = Some(accessibility);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Attach the production capabilities whose credentials are present.
    ///
    /// Google Maps backs place search, geocoding and accessibility checks
    /// when `GOOGLE_MAPS_API_KEY` is set. Reddit search needs no key. Text
    /// generation follows `WANDR_LLM_BACKEND`.
    pub fn env_providers(mut self) -> Self {
        match GoogleMapsClient::from_env() {
            Some(maps) => {
                let maps = Arc::new(maps);
                self = self
                    .places(maps.clone())
                    .geocoder(maps.clone())
                    .accessibility(maps)
                    .cache_places(true);
            }
            None => warn!("GOOGLE_MAPS_API_KEY not set; itineraries will be degenerate"),
        }
        self = self.social(Arc::new(RedditClient::new()));
        match wandr_llm::create_llm_client() {
            Ok(Some(client)) => {
                let generator = LlmTextGenerator::new(client);
                info!(generator = generator.name(), "Text generation enabled");
                self = self.generator(Arc::new(generator));
            }
            Ok(None) => info!("Text generation disabled; narratives use the fallback template"),
            Err(e) => warn!(error = %e, "Text generation unavailable; narratives use the fallback template"),
        }
        self
    }

    pub fn build(self) -> Pipeline {
        let config = self.config;

        let mut normalizer = Normalizer::new(config.normalize.clone());
        if let Some(today) = self.today {
            normalizer = normalizer.with_today(today);
        }

        let mut gatherer = Gatherer::new(config.search.clone());
        if let Some(places) = self.places {
            let places: Arc<dyn PlaceSearch> = if self.cache_places && config.search.cache_ttl_secs > 0 {
                Arc::new(CachedPlaceSearch::new(places, config.search.cache_ttl()))
            } else {
                places
            };
            gatherer = gatherer.places(places);
        }
        if let Some(geocoder) = self.geocoder {
            gatherer = gatherer.geocoder(geocoder);
        }
        if let Some(table) = self.fallback_coordinates {
            gatherer = gatherer.fallback_coordinates(table);
        }
        if let Some(social) = self.social {
            gatherer = gatherer.social(social);
        }
        if let Some(accessibility) = self.accessibility {
            gatherer = gatherer.accessibility(accessibility);
        }

        let mut narrator = Narrator::new(config.narrative.clone());
        if let Some(generator) = self.generator {
            narrator = narrator.generator(generator);
        }

        Pipeline::new(
            normalizer,
            gatherer,
            Optimizer::new(config.schedule.clone()),
            narrator,
            config.events.channel_capacity,
        )
    }
}
