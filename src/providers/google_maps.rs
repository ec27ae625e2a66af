//! Google Maps adapter: Places Nearby search, Geocoding and Place Details
//! accessibility lookups.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{
    AccessibilityCheck, AccessibilityReport, Geocode, LatLng, PlaceQuery, PlaceResult, PlaceSearch,
};
use crate::error::ProviderError;

const PROVIDER: &str = "google-maps";
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Google Maps Platform client
#[derive(Clone)]
pub struct GoogleMapsClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiLocation {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct Geometry {
    location: ApiLocation,
}

#[derive(Deserialize)]
struct NearbyPlace {
    place_id: String,
    name: String,
    #[serde(default)]
    vicinity: Option<String>,
    geometry: Option<Geometry>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    price_level: Option<u8>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyPlace>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DetailsResult {
    wheelchair_accessible_entrance: Option<bool>,
}

#[derive(Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
    error_message: Option<String>,
}

impl GoogleMapsClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    /// Create from `GOOGLE_MAPS_API_KEY`; `None` when unset
    pub fn from_env() -> Option<Self> {
        std::env::var("GOOGLE_MAPS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
    }

    /// Point at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        provider: PROVIDER.to_string(),
                        seconds: REQUEST_TIMEOUT.as_secs(),
                    }
                } else {
                    ProviderError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: PROVIDER.to_string(),
                status,
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))
    }
}

/// `OK` and `ZERO_RESULTS` are successes; anything else is an API error
fn check_status(status: &str, error_message: Option<String>) -> Result<(), ProviderError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(ProviderError::Other(format!(
            "{} API status {}: {}",
            PROVIDER,
            other,
            error_message.unwrap_or_default()
        ))),
    }
}

#[async_trait]
impl PlaceSearch for GoogleMapsClient {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceResult>, ProviderError> {
        debug!(query = %query.text, place_type = %query.place_type, "Searching places");
        let mut params = vec![
            (
                "location",
                format!("{},{}", query.location.lat, query.location.lng),
            ),
            ("radius", query.radius_meters.to_string()),
            ("keyword", query.text.clone()),
        ];
        if !query.place_type.is_empty() {
            params.push(("type", query.place_type.clone()));
        }

        let response: NearbyResponse = self.get_json("place/nearbysearch/json", &params).await?;
        check_status(&response.status, response.error_message)?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|place| {
                let geometry = place.geometry?;
                Some(PlaceResult {
                    place_id: place.place_id,
                    name: place.name,
                    location: LatLng::new(geometry.location.lat, geometry.location.lng),
                    vicinity: place.vicinity.unwrap_or_default(),
                    rating: place.rating,
                    user_ratings_total: place.user_ratings_total,
                    price_level: place.price_level,
                    types: place.types,
                    wheelchair_accessible: None,
                })
            })
            .collect())
    }
}

#[async_trait]
impl Geocode for GoogleMapsClient {
    async fn resolve(&self, city: &str) -> Result<LatLng, ProviderError> {
        let response: GeocodeResponse = self
            .get_json("geocode/json", &[("address", city.to_string())])
            .await?;
        check_status(&response.status, response.error_message)?;
        response
            .results
            .first()
            .map(|r| LatLng::new(r.geometry.location.lat, r.geometry.location.lng))
            .ok_or_else(|| {
                ProviderError::malformed(PROVIDER, format!("no geocode result for '{}'", city))
            })
    }
}

#[async_trait]
impl AccessibilityCheck for GoogleMapsClient {
    async fn check(&self, place_id: &str) -> Result<AccessibilityReport, ProviderError> {
        let response: DetailsResponse = self
            .get_json(
                "place/details/json",
                &[
                    ("place_id", place_id.to_string()),
                    ("fields", "wheelchair_accessible_entrance,name".to_string()),
                ],
            )
            .await?;
        check_status(&response.status, response.error_message)?;
        Ok(AccessibilityReport {
            place_id: place_id.to_string(),
            wheelchair_accessible: response
                .result
                .and_then(|r| r.wheelchair_accessible_entrance),
        })
    }
}
