//! Hard-constraint checks for a scheduled day.
//!
//! A failed check never removes the day; it is reported as a warning status
//! in `constraint_satisfaction`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::model::money::format_money;
use crate::model::{Activity, ActivityKind, NormalizedSpec, WHEELCHAIR_TAG};

pub const OK_MARK: &str = "✓";
pub const WARN_MARK: &str = "⚠️";

/// `"Vegan, gluten free"` from `{gluten_free, vegan}`; `None` when empty
pub fn dietary_label(spec: &NormalizedSpec) -> Option<String> {
    if spec.constraints.dietary.is_empty() {
        return None;
    }
    let joined = spec
        .constraints
        .dietary
        .iter()
        .map(|tag| tag.replace('_', " "))
        .collect::<Vec<_>>()
        .join(", ");
    let mut chars = joined.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
}

/// Constraint name -> status line for one day
pub fn check_day(
    spec: &NormalizedSpec,
    activities: &[Activity],
    total_cost: Decimal,
) -> BTreeMap<String, String> {
    let mut statuses = BTreeMap::new();

    if spec.requires_wheelchair() {
        let all_accessible = activities.iter().all(|a| a.accessibility_notes.is_some());
        statuses.insert(
            "wheelchair".to_string(),
            if all_accessible {
                format!("{} All venues wheelchair accessible", OK_MARK)
            } else {
                format!("{} Some venues not verified", WARN_MARK)
            },
        );
    }

    // No capability verifies these tags; report them rather than drop them
    for tag in spec
        .constraints
        .accessibility
        .iter()
        .filter(|tag| tag.as_str() != WHEELCHAIR_TAG)
    {
        statuses.insert(
            tag.clone(),
            format!("{} {} not verified", WARN_MARK, tag.replace('_', " ")),
        );
    }

    if !spec.constraints.dietary.is_empty() {
        let all_meals = activities
            .iter()
            .filter(|a| a.kind == ActivityKind::Meal)
            .all(|a| a.dietary_notes.is_some());
        let tags = spec
            .constraints
            .dietary
            .iter()
            .map(|tag| tag.replace('_', " "))
            .collect::<Vec<_>>()
            .join(", ");
        statuses.insert(
            "dietary".to_string(),
            if all_meals {
                format!("{} All meals have {} options", OK_MARK, tags)
            } else {
                format!("{} Limited dietary options", WARN_MARK)
            },
        );
    }

    statuses.insert("budget".to_string(), budget_status(spec, total_cost));
    statuses
}

/// `"✓ $45.00 (under $60.00)"` or `"⚠️ $75.00 (over budget by $15.00)"`
pub fn budget_status(spec: &NormalizedSpec, total_cost: Decimal) -> String {
    let currency = &spec.budget.currency;
    let limit = spec.budget.amount_per_day;
    if total_cost <= limit {
        format!(
            "{} {} (under {})",
            OK_MARK,
            format_money(total_cost, currency),
            format_money(limit, currency)
        )
    } else {
        format!(
            "{} {} (over budget by {})",
            WARN_MARK,
            format_money(total_cost, currency),
            format_money(total_cost - limit, currency)
        )
    }
}

/// A day is compliant when no status carries a warning
pub fn is_compliant(statuses: &BTreeMap<String, String>) -> bool {
    !statuses.values().any(|status| status.starts_with(WARN_MARK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TimeWindow, TripRequest};
    use crate::normalize::Normalizer;
    use chrono::NaiveDate;

    fn spec(constraints: &str) -> NormalizedSpec {
        Normalizer::default()
            .with_today(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
            .normalize(
                &TripRequest::new("Tokyo", "2030-04-01 to 2030-04-03")
                    .budget("$60/day")
                    .constraints(constraints),
            )
            .into_result()
            .unwrap()
    }

    fn meal(dietary: Option<&str>, accessible: bool) -> Activity {
        Activity {
            time: TimeWindow::hm((12, 0), (13, 0)),
            kind: ActivityKind::Meal,
            candidate_id: "r1".into(),
            name: "Ain Soph".into(),
            description: "Lunch at Ain Soph".into(),
            duration_minutes: 60,
            cost: Decimal::from(20),
            accessibility_notes: accessible.then(|| "Wheelchair accessible".to_string()),
            dietary_notes: dietary.map(str::to_string),
            quote: None,
            travel: None,
        }
    }

    #[test]
    fn test_all_constraints_met() {
        let spec = spec("wheelchair, vegan");
        let statuses = check_day(
            &spec,
            &[meal(Some("Vegan options available"), true)],
            Decimal::from(23),
        );
        assert_eq!(statuses["wheelchair"], "✓ All venues wheelchair accessible");
        assert_eq!(statuses["dietary"], "✓ All meals have vegan options");
        assert_eq!(statuses["budget"], "✓ $23.00 (under $60.00)");
        assert!(is_compliant(&statuses));
    }

    #[test]
    fn test_failures_are_flagged_not_dropped() {
        let spec = spec("wheelchair, vegan, step-free");
        let statuses = check_day(&spec, &[meal(None, false)], Decimal::new(7550, 2));
        assert_eq!(statuses["wheelchair"], "⚠️ Some venues not verified");
        assert_eq!(statuses["dietary"], "⚠️ Limited dietary options");
        assert_eq!(statuses["step_free"], "⚠️ step free not verified");
        assert_eq!(statuses["budget"], "⚠️ $75.50 (over budget by $15.50)");
        assert!(!is_compliant(&statuses));
    }

    #[test]
    fn test_budget_only_when_unconstrained() {
        let statuses = check_day(&spec(""), &[], Decimal::ZERO);
        assert_eq!(statuses.len(), 1);
        assert!(statuses["budget"].contains("under"));
    }

    #[test]
    fn test_dietary_label() {
        let spec = spec("vegan, gluten-free");
        assert_eq!(dietary_label(&spec).as_deref(), Some("Gluten free, vegan"));
    }
}
