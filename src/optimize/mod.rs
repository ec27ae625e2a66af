//! Stage 3: itinerary optimization.
//!
//! Walks the trip day by day. Each day takes the cluster at
//! `(day - 1) mod cluster_count`, fills the pace's slot template from it,
//! inserts fixed-estimate travel legs and records how every hard constraint
//! fared. Synchronous: no suspension points inside this stage.

pub mod schedule;
pub mod validate;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::cluster::{cluster, cluster_count, Cluster};
use crate::config::ScheduleConfig;
use crate::model::money::round_money;
use crate::model::{
    CandidateSet, DayPlan, DaySummary, Itinerary, NormalizedSpec, OverallSummary,
};

use schedule::{add_travel_legs, assemble, select, slot_template, NoteRules};
use validate::{check_day, dietary_label, is_compliant};

/// Diagnostic carried by every day of a degenerate itinerary
pub const NO_VENUES_NOTE: &str =
    "No venues found. Check the place search provider configuration.";

#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: ScheduleConfig,
}

impl Optimizer {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// Cluster the candidate pool and optimize over it. A degenerate result
    /// also lists the gatherer's diagnostics as open issues.
    pub fn plan(&self, spec: &NormalizedSpec, candidates: &CandidateSet) -> Itinerary {
        let clusters = cluster(candidates.all(), cluster_count(spec.duration_days()));
        let mut itinerary = self.optimize(spec, &clusters);
        if itinerary.degenerate {
            itinerary
                .summary
                .potential_issues
                .extend(candidates.summary.diagnostics.iter().cloned());
        }
        itinerary
    }

    /// One `DayPlan` per day in the trip, never failing
    pub fn optimize(&self, spec: &NormalizedSpec, clusters: &[Cluster]) -> Itinerary {
        if clusters.iter().all(Cluster::is_empty) {
            warn!(days = spec.duration_days(), "No candidates; building degenerate itinerary");
            return degenerate(spec);
        }

        let template = slot_template(spec.constraints.pace);
        let rules = NoteRules {
            wheelchair: spec.requires_wheelchair(),
            dietary_label: dietary_label(spec),
        };
        let mut days = BTreeMap::new();
        let mut issues = Vec::new();
        let mut compliant_days = 0u32;

        for day in 1..=spec.duration_days() {
            let cluster = &clusters[(day as usize - 1) % clusters.len()];
            let selection = select(cluster, spec.constraints.pace);
            let mut activities = assemble(&template, &selection, &rules);
            add_travel_legs(&mut activities, &self.config);

            let total_cost: Decimal = activities
                .iter()
                .map(|a| a.cost + a.travel.as_ref().map(|t| t.cost).unwrap_or_default())
                .sum();
            let total_walking_km = activities.len() as f64 * self.config.walking_km_per_activity;
            let constraint_satisfaction = check_day(spec, &activities, total_cost);

            if is_compliant(&constraint_satisfaction) {
                compliant_days += 1;
            }
            for (constraint, status) in &constraint_satisfaction {
                if status.starts_with(validate::WARN_MARK) {
                    issues.push(format!("Day {}: {} {}", day, constraint, status));
                }
            }
            if activities.len() < template.len() {
                issues.push(format!(
                    "Day {}: {} of {} slots filled in {}",
                    day,
                    activities.len(),
                    template.len(),
                    cluster.neighborhood
                ));
            }

            debug!(
                day,
                neighborhood = %cluster.neighborhood,
                activities = activities.len(),
                total_cost = %total_cost,
                "Day optimized"
            );
            days.insert(
                day,
                DayPlan {
                    day,
                    date: spec.dates.date_of_day(day),
                    theme: format!("Day {} - {}", day, cluster.neighborhood),
                    neighborhood: cluster.neighborhood.clone(),
                    summary: DaySummary {
                        total_cost,
                        total_walking_km,
                        activities_count: activities.len(),
                        constraint_satisfaction,
                    },
                    activities,
                },
            );
        }

        let total_budget: Decimal = days.values().map(|d| d.summary.total_cost).sum();
        let day_count = spec.duration_days().max(1);
        let optimizations = vec![
            format!("Clustered venues into {} neighborhoods", clusters.len()),
            "Kept each day within a single neighborhood to limit travel".to_string(),
            "Ranked venues by rating, review volume and social mentions".to_string(),
        ];

        info!(
            days = day_count,
            clusters = clusters.len(),
            compliant_days,
            total = %total_budget,
            "Itinerary optimized"
        );
        Itinerary {
            days,
            summary: OverallSummary {
                total_budget,
                avg_per_day: round_money(total_budget / Decimal::from(day_count)),
                constraint_compliance: format!(
                    "{}/{} days fully compliant",
                    compliant_days, day_count
                ),
                optimizations_applied: optimizations,
                potential_issues: issues,
            },
            currency: spec.budget.currency.clone(),
            degenerate: false,
        }
    }
}

/// Empty days with an explicit diagnostic instead of an error
fn degenerate(spec: &NormalizedSpec) -> Itinerary {
    let city = &spec.destination.city;
    let days = (1..=spec.duration_days())
        .map(|day| {
            let plan = DayPlan {
                day,
                date: spec.dates.date_of_day(day),
                theme: format!("Day {} - Explore {}", day, city),
                neighborhood: city.clone(),
                activities: Vec::new(),
                summary: DaySummary {
                    total_cost: Decimal::ZERO,
                    total_walking_km: 0.0,
                    activities_count: 0,
                    constraint_satisfaction: BTreeMap::from([(
                        "note".to_string(),
                        NO_VENUES_NOTE.to_string(),
                    )]),
                },
            };
            (day, plan)
        })
        .collect();

    Itinerary {
        days,
        summary: OverallSummary {
            total_budget: Decimal::ZERO,
            avg_per_day: Decimal::ZERO,
            constraint_compliance: "N/A - No venues found".to_string(),
            optimizations_applied: Vec::new(),
            potential_issues: vec![
                "Place search returned no venues; every day is unplanned".to_string(),
            ],
        },
        currency: spec.budget.currency.clone(),
        degenerate: true,
    }
}
