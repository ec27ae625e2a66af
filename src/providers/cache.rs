//! Read-through TTL cache for place search.
//!
//! Keys are the SHA-256 hex digest of the normalized query. A miss or an
//! expired entry simply calls through; errors are never cached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{PlaceQuery, PlaceResult, PlaceSearch};
use crate::error::ProviderError;

/// Entries above this count trigger an expiry sweep on insert
const SWEEP_THRESHOLD: usize = 1000;

#[derive(Debug, Clone)]
struct CachedResults {
    results: Vec<PlaceResult>,
    expires_at: Instant,
}

impl CachedResults {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub active_entries: usize,
    pub expired_entries: usize,
}

/// Decorates any `PlaceSearch` with a TTL cache
pub struct CachedPlaceSearch {
    inner: Arc<dyn PlaceSearch>,
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, CachedResults>>>,
}

impl CachedPlaceSearch {
    pub fn new(inner: Arc<dyn PlaceSearch>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Query lowercased, coordinates rounded to 4 dp, radius, place type
    pub fn cache_key(query: &PlaceQuery) -> String {
        let normalized = format!(
            "{}|{:.4}|{:.4}|{}|{}",
            query.text.trim().to_lowercase(),
            query.location.lat,
            query.location.lng,
            query.radius_meters,
            query.place_type.trim().to_lowercase()
        );
        hex::encode(Sha256::digest(normalized.as_bytes()))
    }

    async fn lookup(&self, key: &str) -> Option<Vec<PlaceResult>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.results.clone())
    }

    async fn store(&self, key: String, results: Vec<PlaceResult>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CachedResults {
                results,
                expires_at: Instant::now() + self.ttl,
            },
        );
        if entries.len() > SWEEP_THRESHOLD {
            entries.retain(|_, entry| !entry.is_expired());
        }
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
        info!("Place search cache cleared");
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        let total_entries = entries.len();
        let expired_entries = entries.values().filter(|e| e.is_expired()).count();
        CacheStats {
            total_entries,
            active_entries: total_entries - expired_entries,
            expired_entries,
        }
    }
}

#[async_trait]
impl PlaceSearch for CachedPlaceSearch {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceResult>, ProviderError> {
        let key = Self::cache_key(query);
        if let Some(results) = self.lookup(&key).await {
            debug!(query = %query.text, "Place search cache hit");
            return Ok(results);
        }
        let results = self.inner.search(query).await?;
        self.store(key, results.clone()).await;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::LatLng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSearch {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PlaceSearch for CountingSearch {
        async fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceResult>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Other("down".into()));
            }
            Ok(vec![PlaceResult {
                place_id: format!("id-{}", query.text),
                name: query.text.clone(),
                location: query.location,
                vicinity: String::new(),
                rating: None,
                user_ratings_total: None,
                price_level: None,
                types: vec![],
                wheelchair_accessible: None,
            }])
        }
    }

    fn query(text: &str, lat: f64) -> PlaceQuery {
        PlaceQuery {
            text: text.to_string(),
            location: LatLng::new(lat, 139.6503),
            radius_meters: 8000,
            place_type: "museum".to_string(),
        }
    }

    #[test]
    fn test_cache_key_normalization() {
        let a = CachedPlaceSearch::cache_key(&query("Art Museum", 35.67621));
        let b = CachedPlaceSearch::cache_key(&query("  art museum ", 35.67624));
        let c = CachedPlaceSearch::cache_key(&query("art museum", 35.6770));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_then_expiry() {
        let inner = Arc::new(CountingSearch {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let cache = CachedPlaceSearch::new(inner.clone(), Duration::from_secs(60));

        cache.search(&query("art", 35.0)).await.unwrap();
        cache.search(&query("ART", 35.0)).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.stats().await.expired_entries, 1);
        cache.search(&query("art", 35.0)).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let inner = Arc::new(CountingSearch {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let cache = CachedPlaceSearch::new(inner.clone(), Duration::from_secs(60));
        assert!(cache.search(&query("art", 35.0)).await.is_err());
        assert!(cache.search(&query("art", 35.0)).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().await.total_entries, 0);
    }
}
