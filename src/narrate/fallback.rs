//! Deterministic markdown rendering of an itinerary.
//!
//! Used whenever generated prose is unavailable or rejected. Walks the
//! itinerary in day order and prints every cost, duration and annotation it
//! carries, with no embellishment.

use std::fmt::Write;

use crate::model::money::format_money;
use crate::model::{Activity, DayPlan, Itinerary, NormalizedSpec, WHEELCHAIR_TAG};
use crate::optimize::validate::dietary_label;

pub fn render(spec: &NormalizedSpec, itinerary: &Itinerary) -> String {
    let mut out = String::new();
    let currency = &itinerary.currency;

    let _ = writeln!(
        out,
        "# Your {}-Day {} Adventure\n",
        spec.duration_days(),
        spec.destination.city
    );

    let mut badges = Vec::new();
    if spec.requires_wheelchair() {
        badges.push("♿ Wheelchair Accessible".to_string());
    }
    for tag in spec
        .constraints
        .accessibility
        .iter()
        .filter(|t| t.as_str() != WHEELCHAIR_TAG)
    {
        badges.push(format!("♿ {}", tag.replace('_', " ")));
    }
    if let Some(label) = dietary_label(spec) {
        badges.push(format!("🌱 {} Options", label));
    }
    badges.push(format!(
        "{}/day",
        format_money(spec.budget.amount_per_day, &spec.budget.currency)
    ));
    let _ = writeln!(out, "*{}*\n\n---\n", badges.join(" • "));

    for day in itinerary.days.values() {
        render_day(&mut out, day, currency);
    }

    let summary = &itinerary.summary;
    let _ = writeln!(out, "## Trip Summary\n");
    let _ = writeln!(out, "- Total: {}", format_money(summary.total_budget, currency));
    let _ = writeln!(out, "- Average per day: {}", format_money(summary.avg_per_day, currency));
    let _ = writeln!(out, "- Compliance: {}", summary.constraint_compliance);
    if !summary.potential_issues.is_empty() {
        let _ = writeln!(out, "\n### Things to Watch\n");
        for issue in &summary.potential_issues {
            let _ = writeln!(out, "- {}", issue);
        }
    }
    out
}

fn render_day(out: &mut String, day: &DayPlan, currency: &str) {
    let _ = writeln!(out, "## {}\n", day.theme);
    let _ = writeln!(out, "*{} • {}*\n", day.date, day.neighborhood);

    if day.activities.is_empty() {
        let _ = writeln!(out, "_No activities scheduled._\n");
    }
    for activity in &day.activities {
        render_activity(out, activity, currency);
    }

    let _ = writeln!(
        out,
        "**Day {} Total:** {}\n",
        day.day,
        format_money(day.summary.total_cost, currency)
    );
    for (constraint, status) in &day.summary.constraint_satisfaction {
        let _ = writeln!(out, "- {}: {}", constraint, status);
    }
    let _ = writeln!(out);
}

fn render_activity(out: &mut String, activity: &Activity, currency: &str) {
    let _ = writeln!(out, "### {}: {}\n", activity.time, activity.name);
    let _ = writeln!(out, "{}\n", activity.description);
    if let Some(quote) = &activity.quote {
        let _ = writeln!(out, "💬 *\"{}\"*\n", quote);
    }
    let _ = writeln!(out, "**Details:**");
    let _ = writeln!(out, "- 💰 {}", format_money(activity.cost, currency));
    let _ = writeln!(out, "- ⏱️ {} minutes", activity.duration_minutes);
    if let Some(notes) = &activity.accessibility_notes {
        let _ = writeln!(out, "- ♿ {}", notes);
    }
    if let Some(notes) = &activity.dietary_notes {
        let _ = writeln!(out, "- 🌱 {}", notes);
    }
    if let Some(leg) = &activity.travel {
        let _ = writeln!(
            out,
            "- 🚇 {} min {} to {} ({})",
            leg.duration_minutes,
            leg.mode.as_str(),
            leg.to,
            format_money(leg.cost, currency)
        );
    }
    let _ = writeln!(out, "\n---\n");
}
