//! Constraint tag extraction.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Pace, WHEELCHAIR_TAG};

/// Keyword pattern -> canonical tag
static ACCESSIBILITY_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    rules(&[
        (r"wheel\s*chair", WHEELCHAIR_TAG),
        (r"step[\s-]?free|no stairs|without stairs", "step_free"),
        (r"hearing|deaf", "hearing_assistance"),
        (r"\bblind\b|visual(ly)?\s*impair|low vision", "visual_assistance"),
    ])
});

static DIETARY_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    rules(&[
        (r"\bvegan\b", "vegan"),
        (r"\bvegetarian\b|\bveggie\b", "vegetarian"),
        (r"\bhalal\b", "halal"),
        (r"\bkosher\b", "kosher"),
        (r"gluten[\s-]?free|celiac|coeliac", "gluten_free"),
        (r"dairy[\s-]?free|lactose", "dairy_free"),
        (r"nut[\s-]?free|nut allerg", "nut_free"),
    ])
});

static RELAXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(relax\w*|slow|leisurely|easy[\s-]?going|laid[\s-]?back|chill)\b")
        .expect("relaxed pace regex")
});

static PACKED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(packed|busy|fast[\s-]?paced|intense|see everything|as much as possible)\b")
        .expect("packed pace regex")
});

static MODERATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(moderate|balanced)\b").expect("moderate pace regex"));

static LUXURY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(5[\s-]?star|five[\s-]?star|luxury|luxurious|michelin|fine dining)\b")
        .expect("luxury regex")
});

static FRAGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\n]|\band\b|\bplus\b").expect("fragment split regex"));

fn rules(table: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    table
        .iter()
        .map(|(pattern, tag)| (Regex::new(pattern).expect("constraint regex"), *tag))
        .collect()
}

/// Tags found in free-text constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintTags {
    pub accessibility: BTreeSet<String>,
    pub dietary: BTreeSet<String>,
    /// `None` when no pace keyword appeared
    pub pace: Option<Pace>,
    /// Both relaxed and packed keywords appeared
    pub pace_conflict: bool,
    /// Fragments no rule recognized
    pub other: BTreeSet<String>,
}

/// Extract tags from every fragment of `text`
pub fn extract_constraints(text: &str) -> ConstraintTags {
    let lower = text.to_lowercase();
    let mut tags = ConstraintTags::default();
    let mut relaxed = false;
    let mut packed = false;
    let mut moderate = false;

    for fragment in FRAGMENT_SPLIT.split(&lower) {
        let fragment = fragment.trim().trim_end_matches('.').trim();
        if fragment.is_empty() {
            continue;
        }
        let mut matched = false;
        for (pattern, tag) in ACCESSIBILITY_RULES.iter() {
            if pattern.is_match(fragment) {
                tags.accessibility.insert((*tag).to_string());
                matched = true;
            }
        }
        for (pattern, tag) in DIETARY_RULES.iter() {
            if pattern.is_match(fragment) {
                tags.dietary.insert((*tag).to_string());
                matched = true;
            }
        }
        if RELAXED.is_match(fragment) {
            relaxed = true;
            matched = true;
        }
        if PACKED.is_match(fragment) {
            packed = true;
            matched = true;
        }
        if MODERATE.is_match(fragment) {
            moderate = true;
            matched = true;
        }
        // "pace" and "none" alone carry no constraint
        if !matched && !matches!(fragment, "none" | "n/a" | "no" | "pace") {
            tags.other.insert(fragment.to_string());
        }
    }

    tags.pace_conflict = relaxed && packed;
    tags.pace = match (relaxed, packed, moderate) {
        (true, false, _) => Some(Pace::Relaxed),
        (false, true, _) => Some(Pace::Packed),
        (false, false, true) => Some(Pace::Moderate),
        _ => None,
    };
    tags
}

/// Whether the text asks for luxury-tier venues
pub fn mentions_luxury(text: &str) -> bool {
    LUXURY.is_match(&text.to_lowercase())
}
