//! Stage 1: free-text trip request -> validated `NormalizedSpec`.
//!
//! Rule-based and deterministic. Problems are split into conflicts, which
//! halt the pipeline, and clarifications, which are surfaced as
//! informational notes while best-effort defaults fill the gap.

pub mod budget;
pub mod constraints;
pub mod dates;
pub mod destination;

use std::sync::LazyLock;

use chrono::{Days, Local, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::NormalizeConfig;
use crate::error::{PlannerError, Result};
use crate::model::money::{format_money, round_money};
use crate::model::{
    Budget, BudgetFlexibility, Constraints, DateRange, NormalizedSpec, Travelers, TripRequest,
};

use budget::{parse_budget, BudgetPeriod};
use constraints::{extract_constraints, mentions_luxury};
use dates::parse_dates;
use destination::{parse_destination, DestinationIssue};

static FAMILY_OF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"family of (\d+)").expect("family regex"));

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("number regex"));

static INTEREST_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;/\n]|\band\b|&").expect("interest split regex"));

/// Output of stage 1
#[derive(Debug, Clone)]
pub struct Normalization {
    pub spec: NormalizedSpec,
    /// Infeasible or contradictory requirements; any entry is fatal
    pub conflicts: Vec<String>,
    /// Ambiguities resolved with defaults
    pub clarifications: Vec<String>,
}

impl Normalization {
    pub fn is_feasible(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// The spec, or `ValidationConflict` when any conflict was found
    pub fn into_result(self) -> Result<NormalizedSpec> {
        if self.conflicts.is_empty() {
            Ok(self.spec)
        } else {
            Err(PlannerError::ValidationConflict {
                conflicts: self.conflicts,
            })
        }
    }
}

/// Builds a `NormalizedSpec` from a `TripRequest`
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizeConfig,
    today: Option<NaiveDate>,
}

impl Normalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self {
            config,
            today: None,
        }
    }

    /// Fix the reference date used for relative expressions
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn normalize(&self, request: &TripRequest) -> Normalization {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let mut conflicts = Vec::new();
        let mut clarifications = Vec::new();

        // Destination
        let (destination, issue) = parse_destination(&request.destination);
        match issue {
            Some(DestinationIssue::Empty) => conflicts.push(DestinationIssue::Empty.message()),
            Some(issue) => clarifications.push(issue.message()),
            None => {}
        }

        // Dates
        let dates = self.resolve_dates(&request.dates, today, &mut conflicts, &mut clarifications);

        // Travelers
        let travelers = parse_travelers(&request.travelers, &mut conflicts, &mut clarifications);

        // Constraints and pace
        let constraint_text = if request.special_requests.trim().is_empty() {
            request.constraints.clone()
        } else {
            format!("{}, {}", request.constraints, request.special_requests)
        };
        let tags = extract_constraints(&constraint_text);
        if tags.pace_conflict {
            conflicts.push("Conflicting pace requirements: both relaxed and packed".to_string());
        }
        let constraints = Constraints {
            accessibility: tags.accessibility,
            dietary: tags.dietary,
            pace: tags.pace.unwrap_or_default(),
            other: tags.other,
        };

        // Budget
        let budget = self.resolve_budget(
            &request.budget,
            dates.duration_days,
            &mut conflicts,
            &mut clarifications,
        );
        let luxury_text = format!(
            "{} {} {} {}",
            request.budget, request.constraints, request.interests, request.special_requests
        );
        if mentions_luxury(&luxury_text)
            && budget.amount_per_day < self.config.luxury_min_daily_budget
        {
            conflicts.push(format!(
                "Budget of {}/day is too low for luxury expectations (needs at least {}/day)",
                format_money(budget.amount_per_day, &budget.currency),
                format_money(self.config.luxury_min_daily_budget, &budget.currency),
            ));
        }

        let spec = NormalizedSpec {
            destination,
            dates,
            travelers,
            budget,
            constraints,
            interests: parse_interests(&request.interests),
            special_requests: request.special_requests.trim().to_string(),
        };
        debug!(
            destination = %spec.destination,
            days = spec.duration_days(),
            conflicts = conflicts.len(),
            clarifications = clarifications.len(),
            "Normalized trip request"
        );
        Normalization {
            spec,
            conflicts,
            clarifications,
        }
    }

    fn resolve_dates(
        &self,
        text: &str,
        today: NaiveDate,
        conflicts: &mut Vec<String>,
        clarifications: &mut Vec<String>,
    ) -> DateRange {
        let fallback_start = today.checked_add_days(Days::new(1)).unwrap_or(today);
        let default_range = || {
            let days = self.config.default_trip_days.max(1);
            let end = fallback_start
                .checked_add_days(Days::new(u64::from(days - 1)))
                .unwrap_or(fallback_start);
            DateRange::new(fallback_start, end).unwrap_or(DateRange {
                start: fallback_start,
                end: fallback_start,
                duration_days: 1,
            })
        };

        let Some(span) = parse_dates(text, today) else {
            let range = default_range();
            clarifications.push(format!(
                "Could not understand dates '{}'; assuming {} days starting {}",
                text.trim(),
                range.duration_days,
                range.start
            ));
            return range;
        };

        match DateRange::new(span.start, span.end) {
            Some(range) => {
                if range.duration_days > self.config.max_trip_days {
                    conflicts.push(format!(
                        "Trip of {} days exceeds the maximum of {} days",
                        range.duration_days, self.config.max_trip_days
                    ));
                }
                range
            }
            None => {
                conflicts.push(format!(
                    "End date {} is before start date {}",
                    span.end, span.start
                ));
                DateRange {
                    start: span.start,
                    end: span.start,
                    duration_days: 1,
                }
            }
        }
    }

    fn resolve_budget(
        &self,
        text: &str,
        duration_days: u32,
        conflicts: &mut Vec<String>,
        clarifications: &mut Vec<String>,
    ) -> Budget {
        let Some(parsed) = parse_budget(text) else {
            let currency = self.config.default_currency.clone();
            clarifications.push(format!(
                "No budget given; assuming {}/day",
                format_money(self.config.default_daily_budget, &currency)
            ));
            return Budget {
                amount_per_day: self.config.default_daily_budget,
                currency,
                flexibility: BudgetFlexibility::Flexible,
            };
        };

        let currency = parsed
            .currency
            .unwrap_or_else(|| self.config.default_currency.clone());
        let amount_per_day = match parsed.period {
            BudgetPeriod::Daily => parsed.amount,
            BudgetPeriod::Total => {
                round_money(parsed.amount / Decimal::from(duration_days.max(1)))
            }
        };

        if amount_per_day <= Decimal::ZERO {
            conflicts.push("Budget must be greater than zero".to_string());
        } else if amount_per_day < self.config.min_daily_budget {
            conflicts.push(format!(
                "Budget of {}/day is below the minimum of {}/day",
                format_money(amount_per_day, &currency),
                format_money(self.config.min_daily_budget, &currency)
            ));
        }

        Budget {
            amount_per_day,
            currency,
            flexibility: if parsed.flexible {
                BudgetFlexibility::Flexible
            } else {
                BudgetFlexibility::Strict
            },
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeConfig::default())
    }
}

fn parse_travelers(
    text: &str,
    conflicts: &mut Vec<String>,
    clarifications: &mut Vec<String>,
) -> Travelers {
    let lower = text.trim().to_lowercase();
    let count = if lower.is_empty() || lower.contains("solo") || lower == "me" {
        Some(1)
    } else if lower.contains("couple") {
        Some(2)
    } else if let Some(caps) = FAMILY_OF.captures(&lower) {
        caps[1].parse().ok()
    } else {
        FIRST_NUMBER
            .find(&lower)
            .and_then(|m| m.as_str().parse::<u32>().ok())
    };

    match count {
        Some(0) => {
            conflicts.push("Traveler count must be at least 1".to_string());
            Travelers { count: 1 }
        }
        Some(count) => Travelers { count },
        None => {
            clarifications.push(format!(
                "Could not understand traveler count '{}'; assuming 1",
                text.trim()
            ));
            Travelers { count: 1 }
        }
    }
}

/// Lowercased, de-duplicated, in the order given
fn parse_interests(text: &str) -> Vec<String> {
    let mut interests: Vec<String> = Vec::new();
    for part in INTEREST_SPLIT.split(&text.to_lowercase()) {
        let interest = part.trim();
        if !interest.is_empty() && !interests.iter().any(|i| i == interest) {
            interests.push(interest.to_string());
        }
    }
    interests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Pace, WHEELCHAIR_TAG};

    fn normalizer() -> Normalizer {
        Normalizer::default().with_today(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap())
    }

    fn tokyo() -> TripRequest {
        TripRequest::new("Tokyo", "2026-11-02 to 2026-11-04")
            .budget("$60/day")
            .constraints("wheelchair, vegan")
            .interests("art, food, art")
    }

    #[test]
    fn test_tokyo_request() {
        let result = normalizer().normalize(&tokyo());
        assert!(result.is_feasible(), "{:?}", result.conflicts);
        assert!(result.clarifications.is_empty());

        let spec = result.into_result().unwrap();
        assert_eq!(spec.destination.country, "Japan");
        assert_eq!(spec.duration_days(), 3);
        assert_eq!(spec.budget.amount_per_day, Decimal::from(60));
        assert_eq!(spec.budget.currency, "USD");
        assert_eq!(spec.budget.flexibility, BudgetFlexibility::Strict);
        assert!(spec.constraints.accessibility.contains(WHEELCHAIR_TAG));
        assert!(spec.constraints.dietary.contains("vegan"));
        assert_eq!(spec.constraints.pace, Pace::Moderate);
        assert_eq!(spec.interests, vec!["art", "food"]);
        assert_eq!(spec.travelers.count, 1);
    }

    #[test]
    fn test_total_budget_is_split_per_day() {
        let request = TripRequest::new("Paris", "2026-11-02 to 2026-11-04").budget("€500 total");
        let spec = normalizer().normalize(&request).into_result().unwrap();
        assert_eq!(spec.budget.amount_per_day, Decimal::new(16667, 2));
        assert_eq!(spec.budget.currency, "EUR");
    }

    #[test]
    fn test_reversed_dates_conflict() {
        let request = TripRequest::new("Tokyo", "2026-11-04 to 2026-11-02").budget("$100");
        let result = normalizer().normalize(&request);
        assert_eq!(result.conflicts.len(), 1);
        assert!(result.conflicts[0].contains("before start date"));
        assert_eq!(result.spec.duration_days(), 1);
        assert!(matches!(
            result.into_result(),
            Err(PlannerError::ValidationConflict { .. })
        ));
    }

    #[test]
    fn test_luxury_on_shoestring_conflicts() {
        let request = TripRequest::new("Tokyo", "tomorrow")
            .budget("$40 per day")
            .special_requests("michelin dinners every night");
        let result = normalizer().normalize(&request);
        assert!(result.conflicts.iter().any(|c| c.contains("luxury")));
    }

    #[test]
    fn test_conflicts_accumulate() {
        let request = TripRequest::new("", "next week")
            .budget("0")
            .travelers("0")
            .constraints("relaxed but packed");
        let result = normalizer().normalize(&request);
        assert_eq!(result.conflicts.len(), 4, "{:?}", result.conflicts);
    }

    #[test]
    fn test_defaults_become_clarifications() {
        let request = TripRequest::new("Southeast Asia", "sometime soon");
        let result = normalizer().normalize(&request);
        assert!(result.is_feasible());
        assert_eq!(result.clarifications.len(), 3, "{:?}", result.clarifications);
        assert_eq!(result.spec.duration_days(), 3);
        assert_eq!(
            result.spec.dates.start,
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
        );
        assert_eq!(result.spec.budget.amount_per_day, Decimal::from(100));
    }

    #[test]
    fn test_trip_too_long() {
        let request = TripRequest::new("Tokyo", "6 weeks").budget("$200/day");
        let result = normalizer().normalize(&request);
        assert!(result.conflicts[0].contains("exceeds the maximum"));
    }

    #[test]
    fn test_absurd_duration_is_a_conflict_not_a_default() {
        let request = TripRequest::new("Tokyo", "700000000 weeks").budget("$200/day");
        let result = normalizer().normalize(&request);
        assert_eq!(result.conflicts.len(), 1, "{:?}", result.conflicts);
        assert_eq!(
            result.conflicts[0],
            "Trip of 3660 days exceeds the maximum of 30 days"
        );
        assert!(result
            .clarifications
            .iter()
            .all(|c| !c.starts_with("Could not understand dates")));
    }

    #[test]
    fn test_travelers() {
        let mut conflicts = Vec::new();
        let mut clarifications = Vec::new();
        assert_eq!(parse_travelers("family of 4", &mut conflicts, &mut clarifications).count, 4);
        assert_eq!(parse_travelers("a couple", &mut conflicts, &mut clarifications).count, 2);
        assert_eq!(parse_travelers("3 adults", &mut conflicts, &mut clarifications).count, 3);
        assert!(conflicts.is_empty() && clarifications.is_empty());
        parse_travelers("some friends", &mut conflicts, &mut clarifications);
        assert_eq!(clarifications.len(), 1);
    }
}
