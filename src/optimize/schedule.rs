//! Slot templates, venue selection and day assembly.

use crate::cluster::Cluster;
use crate::config::ScheduleConfig;
use crate::model::{
    Activity, ActivityKind, Candidate, Category, Pace, TimeWindow, TravelLeg, TravelMode,
};

/// Social quotes shown on an activity are cut to this many characters
const QUOTE_CHARS: usize = 150;

/// Meals per day: lunch and dinner
pub const MEAL_SLOTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Attraction,
    Lunch,
    Dinner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub kind: SlotKind,
    pub window: TimeWindow,
    /// Prefix for the activity description
    pub verb: &'static str,
}

impl Slot {
    fn attraction(start: (u32, u32), end: (u32, u32), verb: &'static str) -> Self {
        Self {
            kind: SlotKind::Attraction,
            window: TimeWindow::hm(start, end),
            verb,
        }
    }

    fn lunch() -> Self {
        Self {
            kind: SlotKind::Lunch,
            window: TimeWindow::hm((12, 0), (13, 0)),
            verb: "Lunch at",
        }
    }

    fn dinner() -> Self {
        Self {
            kind: SlotKind::Dinner,
            window: TimeWindow::hm((18, 0), (19, 30)),
            verb: "Dinner at",
        }
    }
}

/// Fixed day template per pace; its length is `pace.slots()`
pub fn slot_template(pace: Pace) -> Vec<Slot> {
    match pace {
        Pace::Relaxed => vec![
            Slot::attraction((9, 0), (11, 30), "Visit"),
            Slot::lunch(),
            Slot::dinner(),
        ],
        Pace::Moderate => vec![
            Slot::attraction((9, 0), (11, 30), "Visit"),
            Slot::lunch(),
            Slot::attraction((14, 0), (17, 0), "Explore"),
            Slot::dinner(),
        ],
        Pace::Packed => vec![
            Slot::attraction((8, 30), (10, 0), "Visit"),
            Slot::attraction((10, 15), (11, 45), "Visit"),
            Slot::lunch(),
            Slot::attraction((13, 30), (15, 0), "Explore"),
            Slot::attraction((15, 15), (16, 45), "Explore"),
            Slot::dinner(),
        ],
    }
}

/// Venues picked for one day, best first
#[derive(Debug, Default)]
pub struct DaySelection<'a> {
    pub attractions: Vec<&'a Candidate>,
    /// Lunch, then dinner
    pub meals: Vec<&'a Candidate>,
}

/// Top `(slots - 2)` attractions and top two restaurants from the cluster,
/// ranked by relevance descending with input order breaking ties. A
/// revisited cluster yields the same picks.
pub fn select(cluster: &Cluster, pace: Pace) -> DaySelection<'_> {
    let attraction_slots = pace.slots().saturating_sub(MEAL_SLOTS);
    let attractions = rank(cluster, Category::Attraction)
        .into_iter()
        .take(attraction_slots)
        .collect();
    let meals = rank(cluster, Category::Restaurant)
        .into_iter()
        .take(MEAL_SLOTS)
        .collect();
    DaySelection { attractions, meals }
}

fn rank(cluster: &Cluster, category: Category) -> Vec<&Candidate> {
    let mut ranked: Vec<&Candidate> = cluster.of_category(category).collect();
    // Stable sort keeps input order on ties
    ranked.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    ranked
}

/// Which annotations the trip asks for
#[derive(Debug, Clone, Default)]
pub struct NoteRules {
    pub wheelchair: bool,
    /// Human label of the dietary tags, e.g. `Vegan, gluten free`
    pub dietary_label: Option<String>,
}

/// Fill the template in order, omitting slots without a venue
pub fn assemble(template: &[Slot], selection: &DaySelection<'_>, rules: &NoteRules) -> Vec<Activity> {
    let mut attractions = selection.attractions.iter();
    let mut activities = Vec::with_capacity(template.len());
    for slot in template {
        let venue = match slot.kind {
            SlotKind::Attraction => attractions.next(),
            SlotKind::Lunch => selection.meals.first(),
            SlotKind::Dinner => selection.meals.get(1),
        };
        if let Some(candidate) = venue {
            activities.push(activity(slot, candidate, rules));
        }
    }
    activities
}

fn activity(slot: &Slot, candidate: &Candidate, rules: &NoteRules) -> Activity {
    let kind = match slot.kind {
        SlotKind::Attraction => ActivityKind::Attraction,
        SlotKind::Lunch | SlotKind::Dinner => ActivityKind::Meal,
    };
    let accessibility_notes = (rules.wheelchair && candidate.flags.wheelchair_accessible)
        .then(|| "Wheelchair accessible".to_string());
    let dietary_notes = match (&rules.dietary_label, kind) {
        (Some(label), ActivityKind::Meal) if candidate.flags.dietary_friendly => {
            Some(format!("{} options available", label))
        }
        _ => None,
    };
    Activity {
        time: slot.window,
        kind,
        candidate_id: candidate.id.clone(),
        name: candidate.name.clone(),
        description: format!("{} {}", slot.verb, candidate.name),
        duration_minutes: slot.window.minutes(),
        cost: candidate.flags.cost,
        accessibility_notes,
        dietary_notes,
        quote: candidate
            .social
            .sample_quotes
            .first()
            .map(|q| q.chars().take(QUOTE_CHARS).collect()),
        travel: None,
    }
}

/// One fixed-estimate leg from each activity to the next
pub fn add_travel_legs(activities: &mut [Activity], config: &ScheduleConfig) {
    let names: Vec<String> = activities.iter().map(|a| a.name.clone()).collect();
    for (activity, next) in activities.iter_mut().zip(names.iter().skip(1)) {
        activity.travel = Some(TravelLeg {
            from: activity.name.clone(),
            to: next.clone(),
            mode: TravelMode::Transit,
            duration_minutes: config.travel_leg_minutes,
            cost: config.travel_leg_cost,
        });
    }
}
