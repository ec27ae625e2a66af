//! Deterministic capability fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::mpsc;

use wandr::error::ProviderError;
use wandr::events::ProgressEvent;
use wandr::pipeline::{Pipeline, PipelineBuilder};
use wandr::providers::{LatLng, PlaceQuery, PlaceResult, PlaceSearch, TextGenerator};

pub const TOKYO: LatLng = LatLng {
    lat: 35.6762,
    lng: 139.6503,
};

/// Fixed reference date so relative dates never drift
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
}

pub fn builder() -> PipelineBuilder {
    Pipeline::builder().today(today())
}

pub fn place(id: &str, name: &str, neighborhood: &str, price_level: u8) -> PlaceResult {
    PlaceResult {
        place_id: id.to_string(),
        name: name.to_string(),
        location: TOKYO,
        vicinity: format!("1-2-3 Main Street, {}", neighborhood),
        rating: Some(4.5),
        user_ratings_total: Some(500),
        price_level: Some(price_level),
        types: Vec::new(),
        wheelchair_accessible: None,
    }
}

/// Place search answering by place type
#[derive(Default)]
pub struct FakePlaces {
    by_type: HashMap<String, Vec<PlaceResult>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl FakePlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, place_type: &str, results: Vec<PlaceResult>) -> Self {
        self.by_type.insert(place_type.to_string(), results);
        self
    }

    pub fn failing(mut self, place_type: &str) -> Self {
        self.failing.insert(place_type.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Three museums, three sights, five restaurants and a cafe split
    /// between Asakusa and Shibuya
    pub fn tokyo() -> Self {
        Self::new()
            .with(
                "museum",
                vec![
                    place("m1", "Tokyo National Museum", "Asakusa", 2),
                    place("m2", "Edo-Tokyo Museum", "Shibuya", 2),
                    place("m3", "Mori Art Museum", "Asakusa", 2),
                ],
            )
            .with(
                "tourist_attraction",
                vec![
                    place("t1", "Senso-ji Temple", "Asakusa", 0),
                    place("t2", "Meiji Shrine", "Shibuya", 0),
                    place("t3", "Shibuya Crossing", "Shibuya", 0),
                ],
            )
            .with(
                "restaurant",
                vec![
                    place("r1", "Ain Soph", "Asakusa", 2),
                    place("r2", "T's Tantan", "Shibuya", 2),
                    place("r3", "Kyushu Jangara", "Asakusa", 1),
                    place("r4", "Brown Rice Cafe", "Shibuya", 2),
                    place("r5", "Saido", "Asakusa", 3),
                ],
            )
            .with("cafe", vec![place("c1", "Streamer Coffee", "Shibuya", 1)])
    }
}

#[async_trait]
impl PlaceSearch for FakePlaces {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&query.place_type) {
            return Err(ProviderError::Status {
                provider: "fake-places".into(),
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(self.by_type.get(&query.place_type).cloned().unwrap_or_default())
    }
}

/// Place search that never answers
pub struct PendingPlaces;

#[async_trait]
impl PlaceSearch for PendingPlaces {
    async fn search(&self, _query: &PlaceQuery) -> Result<Vec<PlaceResult>, ProviderError> {
        std::future::pending().await
    }
}

/// Place search whose every call panics
pub struct PanickingPlaces;

#[async_trait]
impl PlaceSearch for PanickingPlaces {
    async fn search(&self, _query: &PlaceQuery) -> Result<Vec<PlaceResult>, ProviderError> {
        panic!("place index corrupted")
    }
}

pub enum Script {
    /// Return the prompt's annotations so verification passes
    EchoNotes,
    Fail,
    Panic,
}

pub struct ScriptedGenerator(pub Script);

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, ProviderError> {
        match self.0 {
            Script::EchoNotes => Ok(format!("You'll love this plan.\n\n{}", user)),
            Script::Fail => Err(ProviderError::Timeout {
                provider: "scripted".into(),
                seconds: 45,
            }),
            Script::Panic => panic!("generator state poisoned"),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn tokyo_pipeline(places: FakePlaces) -> Arc<Pipeline> {
    Arc::new(builder().places(Arc::new(places)).build())
}

pub async fn drain(mut receiver: mpsc::Receiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut frames = Vec::new();
    while let Some(frame) = receiver.recv().await {
        frames.push(frame);
    }
    frames
}
