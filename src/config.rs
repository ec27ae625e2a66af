//! Planner configuration.
//!
//! Every field has a default so an empty YAML document is a valid config.
//! Sources, in increasing priority: built-in defaults, the YAML file named by
//! `WANDR_CONFIG`, then individual environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration for the planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub normalize: NormalizeConfig,
    pub search: SearchConfig,
    pub schedule: ScheduleConfig,
    pub narrative: NarrativeConfig,
    pub events: EventsConfig,
    pub server: ServerConfig,
    pub store: StoreConfig,
}

/// Defaults and feasibility thresholds for request normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub default_currency: String,
    pub default_daily_budget: Decimal,
    /// Below this a plan is infeasible
    pub min_daily_budget: Decimal,
    /// Luxury expectations need at least this much per day
    pub luxury_min_daily_budget: Decimal,
    pub default_trip_days: u32,
    pub max_trip_days: u32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            default_daily_budget: Decimal::from(100),
            min_daily_budget: Decimal::from(10),
            luxury_min_daily_budget: Decimal::from(150),
            default_trip_days: 3,
            max_trip_days: 30,
        }
    }
}

/// Candidate gathering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_meters: u32,
    /// Category queries in flight at once
    pub max_concurrency: usize,
    pub attractions_per_query: usize,
    pub restaurants_per_query: usize,
    pub cafes_per_query: usize,
    pub experiences_per_query: usize,
    pub cache_ttl_secs: u64,
    pub social_sources: Vec<String>,
    pub social_limit: usize,
    pub verify_accessibility: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_meters: 8000,
            max_concurrency: 3,
            attractions_per_query: 3,
            restaurants_per_query: 5,
            cafes_per_query: 3,
            experiences_per_query: 2,
            cache_ttl_secs: 3600,
            social_sources: vec!["travel".to_string(), "solotravel".to_string()],
            social_limit: 25,
            verify_accessibility: false,
        }
    }
}

impl SearchConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Schedule estimates standing in for real routing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub travel_leg_minutes: u32,
    pub travel_leg_cost: Decimal,
    pub walking_km_per_activity: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            travel_leg_minutes: 15,
            travel_leg_cost: Decimal::new(300, 2),
            walking_km_per_activity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub timeout_secs: u64,
    /// Reject generated prose that drops an accessibility/dietary note
    pub verify_annotations: bool,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 45,
            verify_annotations: true,
        }
    }
}

impl NarrativeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Progress channel capacity; 1 gives single-slot backpressure
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Record store backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    #[default]
    Memory,
    /// One JSON document per plan under `dir`
    File { dir: PathBuf },
}

impl PlannerConfig {
    /// Load from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::load_from_str(&content)
    }

    /// Load from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults, then `WANDR_CONFIG`, then env overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("WANDR_CONFIG") {
            Ok(path) => Self::load_from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `WANDR_*` overrides from an arbitrary lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("WANDR_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(dir) = lookup("WANDR_STORE_DIR") {
            self.store = StoreConfig::File { dir: dir.into() };
        }
        if let Some(currency) = lookup("WANDR_DEFAULT_CURRENCY") {
            self.normalize.default_currency = currency.trim().to_uppercase();
        }
        if let Some(value) = lookup("WANDR_NARRATIVE_TIMEOUT_SECS") {
            self.narrative.timeout_secs =
                value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "WANDR_NARRATIVE_TIMEOUT_SECS".to_string(),
                    value,
                })?;
        }
        if let Some(value) = lookup("WANDR_SEARCH_CONCURRENCY") {
            let parsed: usize = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "WANDR_SEARCH_CONCURRENCY".to_string(),
                value: value.clone(),
            })?;
            self.search.max_concurrency = parsed.max(1);
        }
        Ok(())
    }

    /// Set the record store backend.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Set the progress channel capacity.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.events.channel_capacity = capacity.max(1);
        self
    }

    /// Set the narrative generation timeout.
    pub fn narrative_timeout(mut self, timeout: Duration) -> Self {
        self.narrative.timeout_secs = timeout.as_secs();
        self
    }
}
