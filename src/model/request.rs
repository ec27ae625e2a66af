//! Raw trip request as submitted by a caller.

use serde::{Deserialize, Serialize};

/// Free-text trip request. Every field is optional text; the normalizer
/// decides what each one means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRequest {
    pub destination: String,
    pub dates: String,
    pub budget: String,
    pub travelers: String,
    pub constraints: String,
    pub interests: String,
    pub special_requests: String,
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, dates: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            dates: dates.into(),
            ..Default::default()
        }
    }

    pub fn budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = budget.into();
        self
    }

    pub fn travelers(mut self, travelers: impl Into<String>) -> Self {
        self.travelers = travelers.into();
        self
    }

    pub fn constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = constraints.into();
        self
    }

    pub fn interests(mut self, interests: impl Into<String>) -> Self {
        self.interests = interests.into();
        self
    }

    pub fn special_requests(mut self, special_requests: impl Into<String>) -> Self {
        self.special_requests = special_requests.into();
        self
    }
}
