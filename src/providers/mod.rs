//! External capabilities consumed by the pipeline.
//!
//! Each capability is a narrow `async_trait` injected as `Arc<dyn _>`, so
//! tests substitute deterministic fakes. The HTTP adapters in the submodules
//! are the production implementations.

pub mod cache;
pub mod geocode;
pub mod google_maps;
pub mod llm;
pub mod reddit;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use cache::{CacheStats, CachedPlaceSearch};
pub use geocode::StaticGeocodeTable;
pub use google_maps::GoogleMapsClient;
pub use llm::LlmTextGenerator;
pub use reddit::RedditClient;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const ORIGIN: LatLng = LatLng { lat: 0.0, lng: 0.0 };

    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One place-search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub text: String,
    pub location: LatLng,
    pub radius_meters: u32,
    /// Provider place type, e.g. `museum`, `restaurant`
    pub place_type: String,
}

/// Raw place-search hit before annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    pub name: String,
    pub location: LatLng,
    /// Short address; its last component names the neighborhood
    #[serde(default)]
    pub vicinity: String,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    /// `None` when the provider has no data
    #[serde(default)]
    pub wheelchair_accessible: Option<bool>,
}

/// A social post returned by opinion search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub score: i64,
    pub url: String,
    /// Forum/community the post came from
    pub source: String,
}

impl Post {
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityReport {
    pub place_id: String,
    /// `None` when unverified
    pub wheelchair_accessible: Option<bool>,
}

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceResult>, ProviderError>;
}

#[async_trait]
pub trait Geocode: Send + Sync {
    async fn resolve(&self, city: &str) -> Result<LatLng, ProviderError>;
}

/// Optional enrichment; absence never breaks the pipeline
#[async_trait]
pub trait SocialSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        sources: &[String],
        limit: usize,
    ) -> Result<Vec<Post>, ProviderError>;
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, ProviderError>;

    /// Label used in logs and narrative metadata
    fn name(&self) -> &str {
        "text-generator"
    }
}

#[async_trait]
pub trait AccessibilityCheck: Send + Sync {
    async fn check(&self, place_id: &str) -> Result<AccessibilityReport, ProviderError>;
}
