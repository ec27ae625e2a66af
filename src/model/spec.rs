//! Normalized trip specification produced by stage 1.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Accessibility tag the optimizer validates every activity against
pub const WHEELCHAIR_TAG: &str = "wheelchair_accessible";

/// Validated, structured form of a trip request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSpec {
    pub destination: Destination,
    pub dates: DateRange,
    pub travelers: Travelers,
    pub budget: Budget,
    pub constraints: Constraints,
    /// Ordered, de-duplicated; the first interest seeds attraction search
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub special_requests: String,
}

impl NormalizedSpec {
    pub fn duration_days(&self) -> u32 {
        self.dates.duration_days
    }

    pub fn requires_wheelchair(&self) -> bool {
        self.constraints.accessibility.contains(WHEELCHAIR_TAG)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub city: String,
    pub country: String,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.country.is_empty() {
            write!(f, "{}", self.city)
        } else {
            write!(f, "{}, {}", self.city, self.country)
        }
    }
}

/// Inclusive date range. `duration_days == (end - start) + 1`, always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub duration_days: u32,
}

impl DateRange {
    /// `None` when `end` precedes `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        let days = (end - start).num_days();
        if days < 0 {
            return None;
        }
        Some(Self {
            start,
            end,
            duration_days: days as u32 + 1,
        })
    }

    /// Calendar date of a 1-based day index
    pub fn date_of_day(&self, day: u32) -> NaiveDate {
        self.start + chrono::Days::new(u64::from(day.saturating_sub(1)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Travelers {
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub amount_per_day: Decimal,
    pub currency: String,
    pub flexibility: BudgetFlexibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetFlexibility {
    Strict,
    Flexible,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub accessibility: BTreeSet<String>,
    pub dietary: BTreeSet<String>,
    pub pace: Pace,
    pub other: BTreeSet<String>,
}

/// Trip pace; decides how many slots a day holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    #[default]
    Moderate,
    Packed,
}

impl Pace {
    /// Total activity slots per day, meals included
    pub fn slots(self) -> usize {
        match self {
            Pace::Relaxed => 3,
            Pace::Moderate => 4,
            Pace::Packed => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pace::Relaxed => "relaxed",
            Pace::Moderate => "moderate",
            Pace::Packed => "packed",
        }
    }
}
