//! Tokyo end-to-end scenario
//!
//! Three wheelchair-accessible vegan days on $60/day across two
//! neighborhoods. Covers:
//! - Neighborhood clustering and cluster rotation across days
//! - Revisited neighborhoods repeating the same relevance-ranked picks
//! - Slot limits, travel legs and per-day budget status
//! - Query limits, de-duplication and place caching through the pipeline
//!
//! Run with: cargo test --test tokyo_scenario

mod common;

use std::sync::Arc;

use rust_decimal::Decimal;

use common::*;
use wandr::cluster::{cluster, cluster_count};
use wandr::model::{
    ActivityKind, Candidate, CandidateSet, Category, ConstraintFlags, Itinerary, Location,
    NormalizedSpec, ProviderSignal, SocialSignal, TripRequest,
};
use wandr::normalize::Normalizer;
use wandr::optimize::Optimizer;

fn spec() -> NormalizedSpec {
    Normalizer::default()
        .with_today(today())
        .normalize(
            &TripRequest::new("Tokyo", "2030-04-01 to 2030-04-03")
                .budget("$60/day")
                .constraints("wheelchair, vegan"),
        )
        .into_result()
        .unwrap()
}

fn venue(id: &str, category: Category, neighborhood: &str, relevance: f64, cost: i64) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("{} place", id),
        category,
        location: Location {
            lat: 35.7,
            lng: 139.7,
            neighborhood: neighborhood.to_string(),
        },
        social: SocialSignal::default(),
        provider: ProviderSignal {
            rating: 4.5,
            review_count: 300,
            price_level: 2,
        },
        flags: ConstraintFlags {
            wheelchair_accessible: true,
            dietary_friendly: category == Category::Restaurant,
            cost: Decimal::from(cost),
        },
        relevance_score: relevance,
        why_relevant: String::new(),
    }
}

/// Asakusa is cheap, Shibuya is not
fn pool() -> CandidateSet {
    let attractions = vec![
        venue("a1", Category::Attraction, "Asakusa", 0.9, 0),
        venue("a2", Category::Attraction, "Asakusa", 0.8, 0),
        venue("a3", Category::Attraction, "Asakusa", 0.7, 0),
        venue("a4", Category::Attraction, "Shibuya", 0.9, 20),
        venue("a5", Category::Attraction, "Shibuya", 0.8, 20),
        venue("a6", Category::Attraction, "Shibuya", 0.7, 20),
    ];
    let restaurants = vec![
        venue("r1", Category::Restaurant, "Asakusa", 0.9, 10),
        venue("r2", Category::Restaurant, "Asakusa", 0.8, 10),
        venue("r3", Category::Restaurant, "Asakusa", 0.7, 10),
        venue("r4", Category::Restaurant, "Shibuya", 0.9, 20),
        venue("r5", Category::Restaurant, "Shibuya", 0.8, 20),
        venue("r6", Category::Restaurant, "Shibuya", 0.7, 20),
    ];
    CandidateSet {
        attractions,
        restaurants,
        ..CandidateSet::default()
    }
}

fn ids(itinerary: &Itinerary, day: u32, kind: ActivityKind) -> Vec<String> {
    itinerary
        .day(day)
        .unwrap()
        .activities
        .iter()
        .filter(|a| a.kind == kind)
        .map(|a| a.candidate_id.clone())
        .collect()
}

#[test]
fn test_pool_clusters_into_two_neighborhoods() {
    let spec = spec();
    let pool = pool();
    let clusters = cluster(pool.all(), cluster_count(spec.duration_days()));
    let names: Vec<&str> = clusters.iter().map(|c| c.neighborhood.as_str()).collect();
    assert_eq!(names, vec!["Asakusa", "Shibuya"]);
    assert!(clusters.iter().all(|c| c.len() == 6));
}

#[test]
fn test_three_days_rotate_through_clusters() {
    let spec = spec();
    let itinerary = Optimizer::default().plan(&spec, &pool());

    assert_eq!(itinerary.days.len(), 3);
    let neighborhoods: Vec<&str> = itinerary
        .days
        .values()
        .map(|d| d.neighborhood.as_str())
        .collect();
    assert_eq!(neighborhoods, vec!["Asakusa", "Shibuya", "Asakusa"]);

    assert_eq!(ids(&itinerary, 1, ActivityKind::Attraction), vec!["a1", "a2"]);
    assert_eq!(ids(&itinerary, 1, ActivityKind::Meal), vec!["r1", "r2"]);
    assert_eq!(ids(&itinerary, 2, ActivityKind::Attraction), vec!["a4", "a5"]);
    // Day 3 wraps around to Asakusa with the same ranking
    assert_eq!(
        ids(&itinerary, 3, ActivityKind::Attraction),
        ids(&itinerary, 1, ActivityKind::Attraction)
    );
    assert_eq!(ids(&itinerary, 3, ActivityKind::Meal), vec!["r1", "r2"]);
}

#[test]
fn test_days_respect_slots_and_budget_status() {
    let spec = spec();
    let itinerary = Optimizer::default().plan(&spec, &pool());
    let budget = spec.budget.amount_per_day;

    for day in itinerary.days.values() {
        assert!(day.activities.len() <= spec.constraints.pace.slots());
        assert_eq!(day.summary.activities_count, day.activities.len());

        let (last, rest) = day.activities.split_last().unwrap();
        assert!(rest.iter().all(|a| a.travel.is_some()));
        assert!(last.travel.is_none());

        let status = &day.summary.constraint_satisfaction["budget"];
        if day.summary.total_cost <= budget {
            assert!(status.contains("under"), "day {}: {}", day.day, status);
        } else {
            assert!(status.contains("over"), "day {}: {}", day.day, status);
        }
        assert!(day.summary.constraint_satisfaction["wheelchair"]
            .contains("All venues wheelchair accessible"));
    }

    // 20 for meals plus three $3.00 legs
    assert_eq!(itinerary.day(1).unwrap().summary.total_cost, Decimal::from(29));
    // 40 for sights, 40 for meals, same legs
    assert_eq!(itinerary.day(2).unwrap().summary.total_cost, Decimal::from(89));
    assert!(itinerary
        .summary
        .potential_issues
        .iter()
        .any(|issue| issue.starts_with("Day 2: budget")));
}

#[test]
fn test_meals_carry_dietary_notes() {
    let spec = spec();
    let itinerary = Optimizer::default().plan(&spec, &pool());
    for day in itinerary.days.values() {
        for activity in &day.activities {
            assert_eq!(
                activity.accessibility_notes.as_deref(),
                Some("Wheelchair accessible")
            );
            match activity.kind {
                ActivityKind::Meal => assert_eq!(
                    activity.dietary_notes.as_deref(),
                    Some("Vegan options available")
                ),
                ActivityKind::Attraction => assert!(activity.dietary_notes.is_none()),
            }
        }
    }
}

#[tokio::test]
async fn test_gathering_limits_and_deduplicates() {
    let restaurants = (1..=7)
        .map(|i| place(&format!("r{}", i), &format!("Vegan {}", i), "Asakusa", 2))
        .collect();
    let places = FakePlaces::new()
        .with(
            "museum",
            vec![
                place("m1", "Tokyo National Museum", "Asakusa", 2),
                place("m2", "Edo-Tokyo Museum", "Shibuya", 2),
            ],
        )
        .with(
            "tourist_attraction",
            vec![
                place("m1", "Tokyo National Museum", "Asakusa", 2),
                place("t1", "Senso-ji Temple", "Asakusa", 0),
            ],
        )
        .with("restaurant", restaurants);

    let result = tokyo_pipeline(places)
        .spawn(TripRequest::new("Tokyo", "2030-04-01 to 2030-04-03").constraints("vegan"))
        .1
        .await
        .unwrap()
        .into_result()
        .unwrap();

    let attraction_ids: Vec<&str> = result
        .candidates
        .attractions
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(attraction_ids, vec!["m1", "m2", "t1"]);
    assert_eq!(result.candidates.restaurants.len(), 5);
    // Restaurants price level 2 at 10 per level
    assert!(result
        .candidates
        .restaurants
        .iter()
        .all(|c| c.flags.cost == Decimal::from(20)));
}

#[tokio::test]
async fn test_repeat_request_is_served_from_place_cache() {
    let places = Arc::new(FakePlaces::tokyo());
    let pipeline = Arc::new(
        builder()
            .places(places.clone())
            .cache_places(true)
            .build(),
    );
    let request = TripRequest::new("Tokyo", "2030-04-01 to 2030-04-03")
        .budget("$60/day")
        .constraints("wheelchair, vegan");

    let first = pipeline.spawn(request.clone()).1.await.unwrap();
    assert!(first.is_completed());
    let calls = places.calls();
    assert!(calls > 0);

    let second = pipeline.spawn(request).1.await.unwrap();
    assert_eq!(places.calls(), calls);
    assert_eq!(
        first.result().unwrap().candidates,
        second.result().unwrap().candidates
    );
}
