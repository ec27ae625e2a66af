//! Stage 2: candidate gathering.
//!
//! Builds a fixed query plan from the spec, runs it against the place-search
//! capability with bounded concurrency and merges the results in plan order
//! once every query has settled. A failed query costs only its own slice of
//! candidates and leaves a diagnostic behind.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::model::{
    Candidate, CandidateSet, Category, ConstraintFlags, Location, NormalizedSpec, ProviderSignal,
    ResearchSummary, SocialSignal,
};
use crate::providers::{
    AccessibilityCheck, Geocode, LatLng, PlaceQuery, PlaceResult, PlaceSearch, Post,
    SocialSearch, StaticGeocodeTable,
};

const DEFAULT_RATING: f64 = 4.0;
const DEFAULT_REVIEW_COUNT: u32 = 100;
const DEFAULT_PRICE_LEVEL: u8 = 2;
const MAX_QUOTES: usize = 3;
const MAX_QUOTE_CHARS: usize = 200;
const TOP_NEIGHBORHOODS: usize = 3;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "love", "best", "great", "incredible", "recommend", "must", "perfect", "awesome",
    "beautiful", "excellent",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "worst", "avoid", "terrible", "disappointing", "overrated", "crowded", "expensive",
    "waste", "skip",
];

/// One entry of the query plan
#[derive(Debug, Clone)]
struct PlannedQuery {
    category: Category,
    query: PlaceQuery,
    limit: usize,
    why_relevant: String,
}

/// Queries place search (and optional enrichment capabilities) for stage 2
pub struct Gatherer {
    places: Option<Arc<dyn PlaceSearch>>,
    geocoder: Option<Arc<dyn Geocode>>,
    fallback_coordinates: StaticGeocodeTable,
    social: Option<Arc<dyn SocialSearch>>,
    accessibility: Option<Arc<dyn AccessibilityCheck>>,
    config: SearchConfig,
}

impl Gatherer {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            places: None,
            geocoder: None,
            fallback_coordinates: StaticGeocodeTable::default(),
            social: None,
            accessibility: None,
            config,
        }
    }

    pub fn places(mut self, places: Arc<dyn PlaceSearch>) -> Self {
        self.places = Some(places);
        self
    }

    pub fn geocoder(mut self, geocoder: Arc<dyn Geocode>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn fallback_coordinates(mut self, table: StaticGeocodeTable) -> Self {
        self.fallback_coordinates = table;
        self
    }

    pub fn social(mut self, social: Arc<dyn SocialSearch>) -> Self {
        self.social = Some(social);
        self
    }

    /// Only consulted when `search.verify_accessibility` is set
    pub fn accessibility(mut self, accessibility: Arc<dyn AccessibilityCheck>) -> Self {
        self.accessibility = Some(accessibility);
        self
    }

    /// Never fails; capability failures become diagnostics
    pub async fn gather(&self, spec: &NormalizedSpec) -> CandidateSet {
        let mut diagnostics = Vec::new();
        let mut set = CandidateSet::default();

        let Some(places) = &self.places else {
            warn!("No place search configured; gathering no candidates");
            diagnostics.push("Place search is not configured; no venues were searched".to_string());
            set.summary = summarize(&set, spec, 0, diagnostics);
            return set;
        };

        let origin = self.locate(&spec.destination.city, &mut diagnostics).await;
        let plan = self.plan(spec, origin);
        info!(
            destination = %spec.destination,
            queries = plan.len(),
            concurrency = self.config.max_concurrency,
            "Gathering candidates"
        );

        let outcomes: Vec<(PlannedQuery, Result<Vec<PlaceResult>, ProviderError>)> =
            stream::iter(plan)
                .map(|planned| {
                    let places = Arc::clone(places);
                    async move {
                        let result = places.search(&planned.query).await;
                        (planned, result)
                    }
                })
                .buffered(self.config.max_concurrency.max(1))
                .collect()
                .await;

        let mut seen = HashSet::new();
        for (planned, outcome) in outcomes {
            match outcome {
                Ok(results) => {
                    let before = set.category(planned.category).len();
                    for place in results.into_iter().take(planned.limit) {
                        if !seen.insert(place.place_id.clone()) {
                            continue;
                        }
                        let candidate = annotate(&planned, place, &spec.destination.city);
                        set.category_mut(planned.category).push(candidate);
                    }
                    debug!(
                        category = %planned.category,
                        query = %planned.query.text,
                        added = set.category(planned.category).len() - before,
                        "Query merged"
                    );
                }
                Err(e) => {
                    warn!(
                        category = %planned.category,
                        query = %planned.query.text,
                        error = %e,
                        "Place search failed"
                    );
                    diagnostics.push(format!(
                        "{} search '{}' failed: {}",
                        planned.category, planned.query.text, e
                    ));
                }
            }
        }

        if self.config.verify_accessibility && spec.requires_wheelchair() {
            self.verify_accessibility(&mut set, &mut diagnostics).await;
        }

        let posts_analyzed = self.enrich_social(&mut set, spec, &mut diagnostics).await;

        for category in Category::ALL {
            for candidate in set.category_mut(category) {
                candidate.relevance_score = relevance(&candidate.provider, &candidate.social);
            }
        }

        set.summary = summarize(&set, spec, posts_analyzed, diagnostics);
        info!(
            total = set.summary.total_candidates,
            attractions = set.attractions.len(),
            restaurants = set.restaurants.len(),
            cafes = set.cafes.len(),
            experiences = set.experiences.len(),
            diagnostics = set.summary.diagnostics.len(),
            "Candidates gathered"
        );
        set
    }

    /// Live geocoder, then the static table, then `(0, 0)`
    async fn locate(&self, city: &str, diagnostics: &mut Vec<String>) -> LatLng {
        if let Some(geocoder) = &self.geocoder {
            match geocoder.resolve(city).await {
                Ok(location) => return location,
                Err(e) => {
                    warn!(city, error = %e, "Geocoding failed; trying fallback table");
                    diagnostics.push(format!("Geocoding '{}' failed: {}", city, e));
                }
            }
        }
        match self.fallback_coordinates.lookup(city) {
            Some(location) => location,
            None => {
                warn!(city, "No coordinates for destination");
                diagnostics.push(format!(
                    "No coordinates known for '{}'; searching around (0, 0)",
                    city
                ));
                LatLng::ORIGIN
            }
        }
    }

    fn plan(&self, spec: &NormalizedSpec, origin: LatLng) -> Vec<PlannedQuery> {
        let query = |text: String, place_type: &str| PlaceQuery {
            text,
            location: origin,
            radius_meters: self.config.radius_meters,
            place_type: place_type.to_string(),
        };
        let seed = spec
            .interests
            .first()
            .map(String::as_str)
            .unwrap_or("popular");
        let dietary_prefix = spec
            .constraints
            .dietary
            .iter()
            .map(|tag| tag.replace('_', " "))
            .collect::<Vec<_>>()
            .join(" ");
        let with_dietary = |noun: &str| {
            if dietary_prefix.is_empty() {
                noun.to_string()
            } else {
                format!("{} {}", dietary_prefix, noun)
            }
        };

        let mut plan = Vec::new();
        for place_type in ["museum", "tourist_attraction"] {
            let label = place_type.replace('_', " ");
            plan.push(PlannedQuery {
                category: Category::Attraction,
                query: query(format!("{} {}", seed, label), place_type),
                limit: self.config.attractions_per_query,
                why_relevant: format!("Popular {}", label),
            });
        }
        plan.push(PlannedQuery {
            category: Category::Restaurant,
            query: query(with_dietary("restaurants"), "restaurant"),
            limit: self.config.restaurants_per_query,
            why_relevant: "Highly rated restaurant".to_string(),
        });
        plan.push(PlannedQuery {
            category: Category::Cafe,
            query: query(with_dietary("cafes"), "cafe"),
            limit: self.config.cafes_per_query,
            why_relevant: "Well reviewed cafe".to_string(),
        });
        for interest in spec.interests.iter().take(2) {
            plan.push(PlannedQuery {
                category: Category::Experience,
                query: query(format!("{} experience", interest), "point_of_interest"),
                limit: self.config.experiences_per_query,
                why_relevant: format!("Matches your interest in {}", interest),
            });
        }
        plan
    }

    async fn verify_accessibility(&self, set: &mut CandidateSet, diagnostics: &mut Vec<String>) {
        let Some(checker) = &self.accessibility else {
            return;
        };
        let ids: Vec<String> = set.all().map(|c| c.id.clone()).collect();
        let reports: Vec<(String, Result<Option<bool>, ProviderError>)> = stream::iter(ids)
            .map(|id| {
                let checker = Arc::clone(checker);
                async move {
                    let result = checker.check(&id).await.map(|r| r.wheelchair_accessible);
                    (id, result)
                }
            })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let mut failures = 0;
        let verified: BTreeMap<String, bool> = reports
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(accessible) => accessible.map(|a| (id, a)),
                Err(e) => {
                    debug!(place_id = %id, error = %e, "Accessibility check failed");
                    failures += 1;
                    None
                }
            })
            .collect();

        for category in Category::ALL {
            for candidate in set.category_mut(category) {
                if let Some(accessible) = verified.get(&candidate.id) {
                    candidate.flags.wheelchair_accessible = *accessible;
                }
            }
        }
        if failures > 0 {
            warn!(failures, "Accessibility verification incomplete");
            diagnostics.push(format!(
                "Accessibility could not be verified for {} venues",
                failures
            ));
        }
    }

    /// Mentions, quotes and sentiment per candidate. Returns posts analyzed.
    async fn enrich_social(
        &self,
        set: &mut CandidateSet,
        spec: &NormalizedSpec,
        diagnostics: &mut Vec<String>,
    ) -> usize {
        let Some(social) = &self.social else {
            return 0;
        };
        let categories: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| !set.category(*c).is_empty())
            .collect();
        let city = spec.destination.city.clone();
        let sources = self.config.social_sources.clone();
        let limit = self.config.social_limit;

        let results: Vec<(Category, Result<Vec<Post>, ProviderError>)> = stream::iter(categories)
            .map(|category| {
                let social = Arc::clone(social);
                let query = format!("{} {}", city, category.plural());
                let sources = sources.clone();
                async move { (category, social.search(&query, &sources, limit).await) }
            })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let mut analyzed = 0;
        for (category, result) in results {
            match result {
                Ok(posts) => {
                    analyzed += posts.len();
                    for candidate in set.category_mut(category) {
                        candidate.social = social_signal(&candidate.name, &posts);
                    }
                }
                Err(e) => {
                    warn!(category = %category, error = %e, "Social search failed");
                    diagnostics.push(format!("Social search for {} failed: {}", category.plural(), e));
                }
            }
        }
        analyzed
    }
}

/// Turn a raw search hit into a candidate with optimistic constraint flags:
/// accessible unless the provider says otherwise, meal venues dietary
/// friendly.
fn annotate(planned: &PlannedQuery, place: PlaceResult, city: &str) -> Candidate {
    let price_level = place.price_level.unwrap_or(DEFAULT_PRICE_LEVEL);
    let cost = match planned.category {
        Category::Restaurant => Decimal::from(price_level) * Decimal::from(10),
        Category::Cafe => Decimal::from(price_level) * Decimal::from(5),
        Category::Experience => place
            .price_level
            .map(|level| Decimal::from(level) * Decimal::from(10))
            .unwrap_or(Decimal::ZERO),
        Category::Attraction => Decimal::ZERO,
    };
    Candidate {
        id: place.place_id,
        name: place.name,
        category: planned.category,
        location: Location {
            lat: place.location.lat,
            lng: place.location.lng,
            neighborhood: neighborhood_of(&place.vicinity, city),
        },
        social: SocialSignal::default(),
        provider: ProviderSignal {
            rating: place.rating.unwrap_or(DEFAULT_RATING),
            review_count: place.user_ratings_total.unwrap_or(DEFAULT_REVIEW_COUNT),
            price_level,
        },
        flags: ConstraintFlags {
            wheelchair_accessible: place.wheelchair_accessible.unwrap_or(true),
            dietary_friendly: matches!(planned.category, Category::Restaurant | Category::Cafe),
            cost,
        },
        relevance_score: 0.0,
        why_relevant: planned.why_relevant.clone(),
    }
}

/// Last comma-separated component of the vicinity, or the city
fn neighborhood_of(vicinity: &str, city: &str) -> String {
    vicinity
        .rsplit(',')
        .map(str::trim)
        .find(|part| !part.is_empty())
        .unwrap_or(city)
        .to_string()
}

/// `0.7 * rating/5 + 0.3 * review confidence + social boost`, in `[0, 1]`
pub fn relevance(provider: &ProviderSignal, social: &SocialSignal) -> f64 {
    let rating = (provider.rating / 5.0).clamp(0.0, 1.0);
    let confidence = ((1.0 + f64::from(provider.review_count)).ln() / 1001f64.ln()).min(1.0);
    let mentions = (f64::from(social.mention_count) / 5.0).min(1.0);
    let boost = 0.1 * mentions * social.sentiment;
    (0.7 * rating + 0.3 * confidence + boost).clamp(0.0, 1.0)
}

fn social_signal(name: &str, posts: &[Post]) -> SocialSignal {
    let needle = name.trim().to_lowercase();
    let mut signal = SocialSignal::default();
    // An empty needle would match every post
    if needle.is_empty() {
        return signal;
    }
    let mut positive = 0u32;
    let mut negative = 0u32;

    for post in posts {
        let text = post.text();
        let lower = text.to_lowercase();
        if !lower.contains(&needle) {
            continue;
        }
        signal.mention_count += 1;
        let (pos, neg) = lexicon_counts(&lower);
        positive += pos;
        negative += neg;
        if signal.sample_quotes.len() < MAX_QUOTES {
            let source = if post.body.to_lowercase().contains(&needle) {
                &post.body
            } else {
                &post.title
            };
            signal
                .sample_quotes
                .push(source.trim().chars().take(MAX_QUOTE_CHARS).collect());
        }
        if !signal.sources.contains(&post.source) {
            signal.sources.push(post.source.clone());
        }
    }

    if signal.mention_count > 0 {
        signal.sentiment =
            (f64::from(positive) - f64::from(negative)) / (f64::from(positive + negative) + 1.0);
    }
    signal
}

fn lexicon_counts(lower: &str) -> (u32, u32) {
    let count = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count() as u32;
    (count(POSITIVE_WORDS), count(NEGATIVE_WORDS))
}

fn summarize(
    set: &CandidateSet,
    spec: &NormalizedSpec,
    social_posts_analyzed: usize,
    diagnostics: Vec<String>,
) -> ResearchSummary {
    let needs_wheelchair = spec.requires_wheelchair();
    let needs_dietary = !spec.constraints.dietary.is_empty();
    let constraint_failures = set
        .all()
        .filter(|c| {
            (needs_wheelchair && !c.flags.wheelchair_accessible)
                || (needs_dietary
                    && matches!(c.category, Category::Restaurant | Category::Cafe)
                    && !c.flags.dietary_friendly)
        })
        .count();

    // Count, then first appearance
    let mut counts: Vec<(String, usize)> = Vec::new();
    for candidate in set.all() {
        match counts
            .iter_mut()
            .find(|(name, _)| *name == candidate.location.neighborhood)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((candidate.location.neighborhood.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    ResearchSummary {
        total_candidates: set.len(),
        social_posts_analyzed,
        constraint_failures,
        top_neighborhoods: counts
            .into_iter()
            .take(TOP_NEIGHBORHOODS)
            .map(|(name, _)| name)
            .collect(),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TripRequest;
    use crate::normalize::Normalizer;
    use crate::providers::AccessibilityReport;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct FakePlaces {
        queries: Mutex<Vec<PlaceQuery>>,
        fail_type: Option<&'static str>,
    }

    impl FakePlaces {
        fn new(fail_type: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                queries: Mutex::new(Vec::new()),
                fail_type,
            })
        }
    }

    fn place(id: &str, vicinity: &str, rating: f64) -> PlaceResult {
        PlaceResult {
            place_id: id.to_string(),
            name: format!("Place {}", id),
            location: LatLng::new(35.7, 139.7),
            vicinity: vicinity.to_string(),
            rating: Some(rating),
            user_ratings_total: Some(500),
            price_level: Some(3),
            types: vec![],
            wheelchair_accessible: None,
        }
    }

    #[async_trait]
    impl PlaceSearch for FakePlaces {
        async fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceResult>, ProviderError> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail_type == Some(query.place_type.as_str()) {
                return Err(ProviderError::Other("quota exceeded".into()));
            }
            Ok(match query.place_type.as_str() {
                "museum" => vec![
                    place("m1", "1 Ueno Park, Taito", 4.6),
                    place("m2", "Roppongi, Minato", 4.2),
                    place("m3", "Ueno, Taito", 4.0),
                    place("m4", "Extra, Taito", 3.0),
                ],
                // m1 appears again and must be dropped
                "tourist_attraction" => vec![place("m1", "Taito", 4.6), place("t1", "", 4.9)],
                "restaurant" => vec![place("r1", "Asakusa, Taito", 4.4)],
                "cafe" => vec![place("c1", "Minato", 4.1)],
                _ => vec![place("e1", "Shibuya", 4.8)],
            })
        }
    }

    struct BrokenGeocode;

    #[async_trait]
    impl Geocode for BrokenGeocode {
        async fn resolve(&self, _city: &str) -> Result<LatLng, ProviderError> {
            Err(ProviderError::Unavailable("Geocoding".into()))
        }
    }

    struct FakeSocial;

    #[async_trait]
    impl SocialSearch for FakeSocial {
        async fn search(
            &self,
            query: &str,
            _sources: &[String],
            _limit: usize,
        ) -> Result<Vec<Post>, ProviderError> {
            if query.ends_with("restaurants") {
                return Err(ProviderError::Other("rate limited".into()));
            }
            Ok(vec![Post {
                id: "p1".into(),
                title: "Place m1 is amazing, a must".into(),
                body: String::new(),
                score: 10,
                url: "https://reddit.com/p1".into(),
                source: "travel".into(),
            }])
        }
    }

    struct NoStepFree;

    #[async_trait]
    impl AccessibilityCheck for NoStepFree {
        async fn check(&self, place_id: &str) -> Result<AccessibilityReport, ProviderError> {
            Ok(AccessibilityReport {
                place_id: place_id.to_string(),
                wheelchair_accessible: (place_id == "m2").then_some(false),
            })
        }
    }

    fn spec(interests: &str) -> NormalizedSpec {
        let request = TripRequest::new("Tokyo", "2030-04-01 to 2030-04-03")
            .budget("$80/day")
            .constraints("wheelchair, vegan")
            .interests(interests);
        Normalizer::default()
            .with_today(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
            .normalize(&request)
            .into_result()
            .unwrap()
    }

    #[tokio::test]
    async fn test_plan_order_limits_and_dedupe() {
        let places = FakePlaces::new(None);
        let gatherer = Gatherer::new(SearchConfig::default()).places(places.clone());
        let set = gatherer.gather(&spec("art")).await;

        let ids: Vec<&str> = set.attractions.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3", "t1"]);
        assert_eq!(set.attractions[0].location.neighborhood, "Taito");
        assert_eq!(set.attractions[3].location.neighborhood, "Tokyo");
        assert_eq!(set.restaurants[0].flags.cost, Decimal::from(30));
        assert_eq!(set.cafes[0].flags.cost, Decimal::from(15));
        assert_eq!(set.experiences.len(), 1);
        assert!(set.summary.diagnostics.is_empty());
        assert_eq!(set.summary.top_neighborhoods[0], "Taito");

        let queries = places.queries.lock().unwrap();
        assert_eq!(queries[0].text, "art museum");
        assert_eq!(queries[2].text, "vegan restaurants");
        assert_eq!(queries[0].location, LatLng::new(35.6762, 139.6503));
    }

    #[tokio::test]
    async fn test_failed_category_is_isolated() {
        let gatherer = Gatherer::new(SearchConfig::default()).places(FakePlaces::new(Some("restaurant")));
        let set = gatherer.gather(&spec("")).await;
        assert!(set.restaurants.is_empty());
        assert!(!set.attractions.is_empty());
        assert!(!set.cafes.is_empty());
        assert!(set.experiences.is_empty());
        assert_eq!(set.summary.diagnostics.len(), 1);
        assert!(set.summary.diagnostics[0].contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_missing_place_search_yields_empty_set() {
        let set = Gatherer::new(SearchConfig::default()).gather(&spec("art")).await;
        assert!(set.is_empty());
        assert_eq!(set.summary.diagnostics.len(), 1);
    }

    #[tokio::test]
    async fn test_geocode_falls_back_to_table_then_origin() {
        let places = FakePlaces::new(None);
        let gatherer = Gatherer::new(SearchConfig::default())
            .places(places.clone())
            .geocoder(Arc::new(BrokenGeocode))
            .fallback_coordinates(StaticGeocodeTable::empty());
        let set = gatherer.gather(&spec("art")).await;
        assert_eq!(set.summary.diagnostics.len(), 2);
        assert_eq!(places.queries.lock().unwrap()[0].location, LatLng::ORIGIN);
    }

    #[tokio::test]
    async fn test_social_enrichment_and_verification() {
        let config = SearchConfig {
            verify_accessibility: true,
            ..SearchConfig::default()
        };
        let gatherer = Gatherer::new(config)
            .places(FakePlaces::new(None))
            .social(Arc::new(FakeSocial))
            .accessibility(Arc::new(NoStepFree));
        let set = gatherer.gather(&spec("art")).await;

        let m1 = &set.attractions[0];
        assert_eq!(m1.social.mention_count, 1);
        assert!(m1.social.sentiment > 0.0);
        assert_eq!(m1.social.sources, vec!["travel"]);
        assert!(!set.attractions[1].flags.wheelchair_accessible);
        assert_eq!(set.summary.constraint_failures, 1);
        assert!(set.summary.social_posts_analyzed >= 1);
        assert!(set.summary.diagnostics.iter().any(|d| d.contains("rate limited")));
    }

    #[test]
    fn test_relevance_bounds() {
        let provider = ProviderSignal {
            rating: 5.0,
            review_count: 100_000,
            price_level: 2,
        };
        let glowing = SocialSignal {
            mention_count: 10,
            sentiment: 1.0,
            ..SocialSignal::default()
        };
        assert_eq!(relevance(&provider, &glowing), 1.0);

        let unknown = ProviderSignal {
            rating: 0.0,
            review_count: 0,
            price_level: 2,
        };
        assert_eq!(relevance(&unknown, &SocialSignal::default()), 0.0);
    }

    #[test]
    fn test_lexicon_sentiment() {
        let posts = vec![Post {
            id: "1".into(),
            title: "Senso-ji".into(),
            body: "senso-ji was crowded and overrated".into(),
            score: 1,
            url: String::new(),
            source: "travel".into(),
        }];
        let signal = social_signal("Senso-ji", &posts);
        assert_eq!(signal.mention_count, 1);
        assert!(signal.sentiment < 0.0);
        assert_eq!(signal.sample_quotes, vec!["senso-ji was crowded and overrated"]);
    }

    #[test]
    fn test_blank_name_collects_no_mentions() {
        let posts = vec![Post {
            id: "1".into(),
            title: "Best ramen in Tokyo".into(),
            body: "amazing".into(),
            score: 1,
            url: String::new(),
            source: "travel".into(),
        }];
        for name in ["", "   "] {
            let signal = social_signal(name, &posts);
            assert_eq!(signal.mention_count, 0);
            assert!(signal.sample_quotes.is_empty());
            assert_eq!(signal.sentiment, 0.0);
        }
    }

    #[test]
    fn test_neighborhood_is_trailing_vicinity_part() {
        assert_eq!(neighborhood_of("2-3-1 Asakusa, Taito", "Tokyo"), "Taito");
        assert_eq!(neighborhood_of("Shibuya, ", "Tokyo"), "Shibuya");
        assert_eq!(neighborhood_of("Omotesando", "Tokyo"), "Omotesando");
        assert_eq!(neighborhood_of("  ", "Tokyo"), "Tokyo");
        assert_eq!(neighborhood_of("", "Tokyo"), "Tokyo");
    }
}
