//! Stage 4: narrative composition.
//!
//! Asks the text-generation capability for second-person prose and falls
//! back to the deterministic markdown renderer on any failure: provider
//! error, timeout, empty output, or (when verification is on) prose that
//! dropped an accessibility or dietary annotation.

pub mod fallback;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::NarrativeConfig;
use crate::model::money::format_money;
use crate::model::{Itinerary, NormalizedSpec};
use crate::providers::TextGenerator;

pub const SYSTEM_PROMPT: &str = "You are a travel writer creating personalized itineraries.

Your job:
1. Transform the structured itinerary into a warm, practical narrative
2. Weave in traveler quotes where available
3. Keep every accessibility and dietary note exactly as written
4. Keep every cost figure exactly as written

FORMAT:
- Day headers with the day's theme
- Time blocks (Morning/Afternoon/Evening)
- Each venue gets a short description, practical info and its notes
- A budget line at the end of each day

NEVER:
- Drop or reword accessibility or dietary information
- Invent venues that are not in the itinerary
- Use overly promotional language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
    /// Why generated prose was not used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl Narrative {
    fn fallback(spec: &NormalizedSpec, itinerary: &Itinerary, reason: String) -> Self {
        warn!(reason = %reason, "Using fallback narrative");
        Self {
            text: fallback::render(spec, itinerary),
            source: NarrativeSource::Fallback,
            fallback_reason: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == NarrativeSource::Fallback
    }
}

pub struct Narrator {
    generator: Option<Arc<dyn TextGenerator>>,
    config: NarrativeConfig,
}

impl Narrator {
    pub fn new(config: NarrativeConfig) -> Self {
        Self {
            generator: None,
            config,
        }
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Never fails; every failure path yields the fallback document
    pub async fn narrate(&self, spec: &NormalizedSpec, itinerary: &Itinerary) -> Narrative {
        let Some(generator) = &self.generator else {
            return Narrative::fallback(spec, itinerary, "text generation is not configured".into());
        };
        let prompt = match user_prompt(spec, itinerary) {
            Ok(prompt) => prompt,
            Err(e) => {
                return Narrative::fallback(spec, itinerary, format!("could not encode itinerary: {}", e))
            }
        };

        let timeout = self.config.timeout();
        let text = match tokio::time::timeout(timeout, generator.complete(SYSTEM_PROMPT, &prompt)).await
        {
            Err(_) => {
                return Narrative::fallback(
                    spec,
                    itinerary,
                    format!("{} timed out after {}s", generator.name(), timeout.as_secs()),
                )
            }
            Ok(Err(e)) => return Narrative::fallback(spec, itinerary, e.to_string()),
            Ok(Ok(text)) => text,
        };

        if text.trim().is_empty() {
            return Narrative::fallback(spec, itinerary, "generated text was empty".into());
        }
        if self.config.verify_annotations {
            if let Some(missing) = missing_annotation(&text, itinerary) {
                return Narrative::fallback(
                    spec,
                    itinerary,
                    format!("generated text dropped the note '{}'", missing),
                );
            }
        }

        info!(generator = generator.name(), chars = text.len(), "Narrative generated");
        Narrative {
            text,
            source: NarrativeSource::Generated,
            fallback_reason: None,
        }
    }
}

pub fn user_prompt(
    spec: &NormalizedSpec,
    itinerary: &Itinerary,
) -> Result<String, serde_json::Error> {
    let constraints = serde_json::to_string(&spec.constraints)?;
    let data = serde_json::to_string_pretty(itinerary)?;
    Ok(format!(
        "Transform this itinerary into an engaging travel plan.

DESTINATION: {}
DURATION: {} days
BUDGET: {}/day
CONSTRAINTS: {}

ITINERARY DATA:
{}

Write in second person (\"You'll start your day...\").
Include traveler quotes where available.
Keep descriptions concise but vivid.
Always include practical info (cost, duration, accessibility).",
        spec.destination,
        spec.duration_days(),
        format_money(spec.budget.amount_per_day, &spec.budget.currency),
        constraints,
        data
    ))
}

/// First accessibility/dietary note absent from `text` (case-insensitive)
pub fn missing_annotation<'a>(text: &str, itinerary: &'a Itinerary) -> Option<&'a str> {
    let haystack = text.to_lowercase();
    itinerary
        .days
        .values()
        .flat_map(|day| day.activities.iter())
        .flat_map(|a| a.accessibility_notes.iter().chain(a.dietary_notes.iter()))
        .map(String::as_str)
        .find(|note| !haystack.contains(&note.to_lowercase()))
}
