//! Day-by-day itinerary produced by the optimizer.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Slot window, rendered `HH:MM-HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Window from `(hour, minute)` pairs; out-of-range components give
    /// midnight
    pub fn hm(start: (u32, u32), end: (u32, u32)) -> Self {
        let time = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        Self {
            start: time(start),
            end: time(end),
        }
    }

    pub fn minutes(&self) -> u32 {
        (self.end - self.start).num_minutes().max(0) as u32
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid time window '{}'", s))?;
        let parse = |part: &str| {
            NaiveTime::parse_from_str(part.trim(), "%H:%M")
                .map_err(|e| format!("invalid time '{}': {}", part, e))
        };
        Ok(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }
}

impl From<TimeWindow> for String {
    fn from(window: TimeWindow) -> Self {
        window.to_string()
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Attraction,
    Meal,
}

/// One scheduled stop. The travel leg, when present, departs this stop for
/// the next one in the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub time: TimeWindow,
    pub kind: ActivityKind,
    pub candidate_id: String,
    pub name: String,
    pub description: String,
    pub duration_minutes: u32,
    pub cost: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel: Option<TravelLeg>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelLeg {
    pub from: String,
    pub to: String,
    pub mode: TravelMode,
    pub duration_minutes: u32,
    pub cost: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Transit,
    Walking,
}

impl TravelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Transit => "transit",
            TravelMode::Walking => "walking",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub date: NaiveDate,
    pub theme: String,
    pub neighborhood: String,
    pub activities: Vec<Activity>,
    #[serde(rename = "day_summary")]
    pub summary: DaySummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Activity costs plus travel-leg costs
    pub total_cost: Decimal,
    pub total_walking_km: f64,
    pub activities_count: usize,
    /// Constraint name -> status line
    pub constraint_satisfaction: BTreeMap<String, String>,
}

/// Keys are 1-based day indices, one per day in the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub days: BTreeMap<u32, DayPlan>,
    #[serde(rename = "overall_summary")]
    pub summary: OverallSummary,
    pub currency: String,
    /// Built without any candidates
    #[serde(default)]
    pub degenerate: bool,
}

impl Itinerary {
    pub fn day(&self, day: u32) -> Option<&DayPlan> {
        self.days.get(&day)
    }

    pub fn activity_count(&self) -> usize {
        self.days.values().map(|d| d.activities.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_budget: Decimal,
    pub avg_per_day: Decimal,
    pub constraint_compliance: String,
    pub optimizations_applied: Vec<String>,
    pub potential_issues: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_round_trip_string() {
        let window = TimeWindow::hm((9, 0), (11, 30));
        assert_eq!(window.to_string(), "09:00-11:30");
        assert_eq!(window.minutes(), 150);
        let parsed: TimeWindow = "09:00-11:30".parse().unwrap();
        assert_eq!(parsed, window);
        assert!("9am".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn test_time_window_serializes_as_string() {
        let json = serde_json::to_string(&TimeWindow::hm((18, 0), (19, 30))).unwrap();
        assert_eq!(json, "\"18:00-19:30\"");
    }
}
