//! Destination parsing.

use crate::model::Destination;

/// Lowercase city -> (display city, country)
const KNOWN_CITIES: &[(&str, &str, &str)] = &[
    ("tokyo", "Tokyo", "Japan"),
    ("kyoto", "Kyoto", "Japan"),
    ("osaka", "Osaka", "Japan"),
    ("hyderabad", "Hyderabad", "India"),
    ("mumbai", "Mumbai", "India"),
    ("delhi", "Delhi", "India"),
    ("new delhi", "New Delhi", "India"),
    ("bangalore", "Bangalore", "India"),
    ("paris", "Paris", "France"),
    ("london", "London", "United Kingdom"),
    ("edinburgh", "Edinburgh", "United Kingdom"),
    ("rome", "Rome", "Italy"),
    ("florence", "Florence", "Italy"),
    ("barcelona", "Barcelona", "Spain"),
    ("madrid", "Madrid", "Spain"),
    ("lisbon", "Lisbon", "Portugal"),
    ("berlin", "Berlin", "Germany"),
    ("amsterdam", "Amsterdam", "Netherlands"),
    ("prague", "Prague", "Czech Republic"),
    ("vienna", "Vienna", "Austria"),
    ("istanbul", "Istanbul", "Turkey"),
    ("new york", "New York", "United States"),
    ("san francisco", "San Francisco", "United States"),
    ("chicago", "Chicago", "United States"),
    ("mexico city", "Mexico City", "Mexico"),
    ("toronto", "Toronto", "Canada"),
    ("bangkok", "Bangkok", "Thailand"),
    ("singapore", "Singapore", "Singapore"),
    ("seoul", "Seoul", "South Korea"),
    ("sydney", "Sydney", "Australia"),
];

const REGIONS: &[&str] = &[
    "asia",
    "southeast asia",
    "europe",
    "western europe",
    "eastern europe",
    "scandinavia",
    "africa",
    "north america",
    "south america",
    "central america",
    "latin america",
    "middle east",
    "oceania",
    "caribbean",
    "the caribbean",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationIssue {
    Empty,
    Region(String),
    UnknownCountry(String),
}

impl DestinationIssue {
    pub fn message(&self) -> String {
        match self {
            DestinationIssue::Empty => "Destination is required".to_string(),
            DestinationIssue::Region(region) => format!(
                "'{}' is a region rather than a city; planning around it as a single destination",
                region
            ),
            DestinationIssue::UnknownCountry(city) => format!(
                "Could not determine the country for '{}'; add it as 'City, Country' for better results",
                city
            ),
        }
    }
}

/// Parse `City` or `City, Country`
pub fn parse_destination(text: &str) -> (Destination, Option<DestinationIssue>) {
    let text = text.trim();
    if text.is_empty() {
        return (
            Destination {
                city: String::new(),
                country: String::new(),
            },
            Some(DestinationIssue::Empty),
        );
    }

    let (city_part, country_part) = match text.split_once(',') {
        Some((city, country)) => (city.trim(), country.trim()),
        None => (text, ""),
    };
    let key = city_part.to_lowercase();

    if REGIONS.contains(&key.as_str()) {
        let region = title_case(city_part);
        return (
            Destination {
                city: region.clone(),
                country: title_case(country_part),
            },
            Some(DestinationIssue::Region(region)),
        );
    }

    let known = KNOWN_CITIES.iter().find(|(name, _, _)| *name == key);
    let city = known
        .map(|(_, display, _)| display.to_string())
        .unwrap_or_else(|| title_case(city_part));
    let country = if !country_part.is_empty() {
        title_case(country_part)
    } else if let Some((_, _, country)) = known {
        country.to_string()
    } else {
        let issue = DestinationIssue::UnknownCountry(city.clone());
        return (
            Destination {
                city,
                country: String::new(),
            },
            Some(issue),
        );
    };
    (Destination { city, country }, None)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            if word.len() <= 3 && word.chars().all(|c| c.is_ascii_uppercase()) {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
