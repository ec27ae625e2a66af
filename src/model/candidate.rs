//! Venue candidates produced by the gatherer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Attraction,
    Restaurant,
    Cafe,
    Experience,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Attraction,
        Category::Restaurant,
        Category::Cafe,
        Category::Experience,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Attraction => "attraction",
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
            Category::Experience => "experience",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Category::Attraction => "attractions",
            Category::Restaurant => "restaurants",
            Category::Cafe => "cafes",
            Category::Experience => "experiences",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A venue annotated with constraint-satisfaction flags. Read-only after
/// stage 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub location: Location,
    pub social: SocialSignal,
    pub provider: ProviderSignal,
    pub flags: ConstraintFlags,
    /// In `[0, 1]`
    pub relevance_score: f64,
    #[serde(default)]
    pub why_relevant: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    /// Cluster key; compared by exact equality
    pub neighborhood: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialSignal {
    pub mention_count: u32,
    /// In `[-1, 1]`
    pub sentiment: f64,
    pub sample_quotes: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSignal {
    pub rating: f64,
    pub review_count: u32,
    pub price_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintFlags {
    pub wheelchair_accessible: bool,
    pub dietary_friendly: bool,
    pub cost: Decimal,
}

/// Stage 2 output, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    pub attractions: Vec<Candidate>,
    pub restaurants: Vec<Candidate>,
    pub cafes: Vec<Candidate>,
    #[serde(default)]
    pub experiences: Vec<Candidate>,
    pub summary: ResearchSummary,
}

impl CandidateSet {
    pub fn category(&self, category: Category) -> &[Candidate] {
        match category {
            Category::Attraction => &self.attractions,
            Category::Restaurant => &self.restaurants,
            Category::Cafe => &self.cafes,
            Category::Experience => &self.experiences,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut Vec<Candidate> {
        match category {
            Category::Attraction => &mut self.attractions,
            Category::Restaurant => &mut self.restaurants,
            Category::Cafe => &mut self.cafes,
            Category::Experience => &mut self.experiences,
        }
    }

    /// Every candidate in category order: attractions, restaurants, cafes,
    /// experiences
    pub fn all(&self) -> impl Iterator<Item = &Candidate> {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.category(category).iter())
    }

    pub fn len(&self) -> usize {
        Category::ALL
            .into_iter()
            .map(|category| self.category(category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub total_candidates: usize,
    pub social_posts_analyzed: usize,
    /// Candidates whose flags fail a stated constraint
    pub constraint_failures: usize,
    pub top_neighborhoods: Vec<String>,
    /// Contained provider failures, one line each
    #[serde(default)]
    pub diagnostics: Vec<String>,
}
