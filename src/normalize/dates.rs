//! Date expression parsing.
//!
//! Recognizes ISO dates, month-name dates and ranges, a handful of relative
//! anchors (`tomorrow`, `next weekend`, ...) and durations (`5 days`,
//! `3 nights`). A duration combined with a single anchor sets the end date.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;

const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("iso date regex"));

static MONTH_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?P<m1>{MONTHS})[a-z]*\.?\s+(?P<d1>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(?P<y1>\d{{4}}))?\s*(?:-|–|to|through|until)\s*(?:(?P<m2>{MONTHS})[a-z]*\.?\s+)?(?P<d2>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(?P<y2>\d{{4}}))?"
    ))
    .expect("month range regex")
});

static MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?P<m>{MONTHS})[a-z]*\.?\s+(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(?P<y>\d{{4}}))?"
    ))
    .expect("month date regex")
});

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<n>\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(?P<unit>days?|nights?|weeks?)\b",
    )
    .expect("duration regex")
});

static NEXT_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnext week\b").expect("next week regex"));

/// Span as written; `end` may precede `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    fn starting(start: NaiveDate, days: Option<u32>) -> Option<Self> {
        match days {
            Some(days) => Some(Self {
                start,
                end: plus(start, days.saturating_sub(1))?,
            }),
            None => Some(Self::single(start)),
        }
    }
}

/// Parse a free-text date expression relative to `today`
pub fn parse_dates(text: &str, today: NaiveDate) -> Option<DateSpan> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    let duration = parse_duration(&text);

    if let Some(span) = iso_span(&text, duration) {
        return Some(span);
    }
    if let Some(span) = month_range(&text, today) {
        return Some(span);
    }
    if let Some(start) = month_date(&text, today) {
        return DateSpan::starting(start, duration);
    }
    if let Some(span) = relative_span(&text, today) {
        return match duration {
            Some(_) => DateSpan::starting(span.start, duration),
            None => Some(span),
        };
    }
    duration.and_then(|days| DateSpan::starting(plus(today, 1)?, Some(days)))
}

/// Durations beyond this are capped; anything this long already fails the
/// trip-length check
const MAX_DURATION_DAYS: u64 = 3660;

/// Trip length in days; nights count as `n + 1` days
fn parse_duration(text: &str) -> Option<u32> {
    let caps = DURATION.captures(text)?;
    let n: u64 = match &caps["n"] {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        // `\d+` fails to parse only on overflow
        digits => digits.parse().unwrap_or(u64::MAX),
    };
    if n == 0 {
        return None;
    }
    let unit = &caps["unit"];
    let days = if unit.starts_with("night") {
        n.saturating_add(1)
    } else if unit.starts_with("week") {
        n.saturating_mul(7)
    } else {
        n
    };
    u32::try_from(days.min(MAX_DURATION_DAYS)).ok()
}

fn iso_span(text: &str, duration: Option<u32>) -> Option<DateSpan> {
    let dates: Vec<NaiveDate> = ISO_DATE
        .captures_iter(text)
        .filter_map(|caps| {
            ymd(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            )
        })
        .collect();
    match dates.as_slice() {
        [] => None,
        [start] => DateSpan::starting(*start, duration),
        [start, end, ..] => Some(DateSpan {
            start: *start,
            end: *end,
        }),
    }
}

fn month_range(text: &str, today: NaiveDate) -> Option<DateSpan> {
    let caps = MONTH_RANGE.captures(text)?;
    let m1 = month_number(&caps["m1"])?;
    let d1: u32 = caps["d1"].parse().ok()?;
    let m2 = caps
        .name("m2")
        .and_then(|m| month_number(m.as_str()))
        .unwrap_or(m1);
    let d2: u32 = caps["d2"].parse().ok()?;
    let y1 = caps.name("y1").and_then(|y| y.as_str().parse::<i32>().ok());
    let y2 = caps.name("y2").and_then(|y| y.as_str().parse::<i32>().ok());

    let (start, end) = match (y1, y2) {
        (Some(a), Some(b)) => (ymd(a, m1, d1)?, ymd(b, m2, d2)?),
        (None, Some(b)) => {
            let start_year = if m1 > m2 { b - 1 } else { b };
            (ymd(start_year, m1, d1)?, ymd(b, m2, d2)?)
        }
        (Some(a), None) => {
            let start = ymd(a, m1, d1)?;
            (start, end_after(start, m1, m2, d2)?)
        }
        (None, None) => {
            let start = upcoming(today, m1, d1)?;
            (start, end_after(start, m1, m2, d2)?)
        }
    };
    Some(DateSpan { start, end })
}

/// End date in the start's year, or the next one when the range crosses
/// New Year
fn end_after(start: NaiveDate, m1: u32, m2: u32, d2: u32) -> Option<NaiveDate> {
    let end = ymd(start.year(), m2, d2)?;
    if end < start && m2 != m1 {
        ymd(start.year() + 1, m2, d2)
    } else {
        Some(end)
    }
}

fn month_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = MONTH_DATE.captures(text)?;
    let month = month_number(&caps["m"])?;
    let day: u32 = caps["d"].parse().ok()?;
    match caps.name("y").and_then(|y| y.as_str().parse::<i32>().ok()) {
        Some(year) => ymd(year, month, day),
        None => upcoming(today, month, day),
    }
}

fn relative_span(text: &str, today: NaiveDate) -> Option<DateSpan> {
    // Monday = 0 .. Sunday = 6
    let weekday = today.weekday().num_days_from_monday();

    if text.contains("next weekend") {
        let saturday = if weekday == 6 {
            plus(today, 6)?
        } else {
            plus(today, 5 - weekday + 7)?
        };
        return Some(DateSpan {
            start: saturday,
            end: plus(saturday, 1)?,
        });
    }
    if text.contains("weekend") {
        if weekday == 6 {
            return Some(DateSpan::single(today));
        }
        let saturday = plus(today, 5 - weekday)?;
        return Some(DateSpan {
            start: saturday,
            end: plus(saturday, 1)?,
        });
    }
    if NEXT_WEEK.is_match(text) {
        let monday = plus(today, 7 - weekday)?;
        return Some(DateSpan {
            start: monday,
            end: plus(monday, 6)?,
        });
    }
    if text.contains("next month") {
        let (year, month) = next_month(today.year(), today.month());
        let first = ymd(year, month, 1)?;
        let (after_year, after_month) = next_month(year, month);
        let last = ymd(after_year, after_month, 1)?.pred_opt()?;
        return Some(DateSpan {
            start: first,
            end: last,
        });
    }
    if text.contains("day after tomorrow") {
        return Some(DateSpan::single(plus(today, 2)?));
    }
    if text.contains("tomorrow") {
        return Some(DateSpan::single(plus(today, 1)?));
    }
    if text.contains("today") {
        return Some(DateSpan::single(today));
    }
    None
}

/// The next occurrence of a month/day on or after `today`
fn upcoming(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let date = ymd(today.year(), month, day)?;
    if date < today {
        ymd(today.year() + 1, month, day)
    } else {
        Some(date)
    }
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?;
    MONTHS
        .split('|')
        .position(|m| m == prefix)
        .map(|index| index as u32 + 1)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn plus(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-10-14 is a Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn span(text: &str) -> DateSpan {
        parse_dates(text, today()).unwrap_or_else(|| panic!("no dates in '{}'", text))
    }

    #[test]
    fn test_iso_range() {
        let s = span("2026-05-15 to 2026-05-20");
        assert_eq!((s.start, s.end), (d(2026, 5, 15), d(2026, 5, 20)));
    }

    #[test]
    fn test_reversed_iso_range_is_kept_as_written() {
        let s = span("2026-05-20 to 2026-05-15");
        assert!(s.end < s.start);
    }

    #[test]
    fn test_month_range_without_year_rolls_forward() {
        let s = span("May 15-20");
        assert_eq!((s.start, s.end), (d(2027, 5, 15), d(2027, 5, 20)));
    }

    #[test]
    fn test_month_range_across_months() {
        let s = span("May 28 - June 2, 2027");
        assert_eq!((s.start, s.end), (d(2027, 5, 28), d(2027, 6, 2)));

        let s = span("December 28 to January 3");
        assert_eq!((s.start, s.end), (d(2026, 12, 28), d(2027, 1, 3)));
    }

    #[test]
    fn test_single_month_date_with_duration() {
        let s = span("5 days from June 3rd");
        assert_eq!((s.start, s.end), (d(2027, 6, 3), d(2027, 6, 7)));
    }

    #[test]
    fn test_relative_anchors() {
        assert_eq!(span("tomorrow").start, d(2026, 10, 15));
        assert_eq!(span("today").end, d(2026, 10, 14));

        let weekend = span("this weekend");
        assert_eq!((weekend.start, weekend.end), (d(2026, 10, 17), d(2026, 10, 18)));

        let next_weekend = span("next weekend");
        assert_eq!(next_weekend.start, d(2026, 10, 24));

        let week = span("next week");
        assert_eq!((week.start, week.end), (d(2026, 10, 19), d(2026, 10, 25)));

        let month = span("sometime next month");
        assert_eq!((month.start, month.end), (d(2026, 11, 1), d(2026, 11, 30)));
    }

    #[test]
    fn test_durations_start_tomorrow() {
        let s = span("5 days");
        assert_eq!((s.start, s.end), (d(2026, 10, 15), d(2026, 10, 19)));

        let s = span("a week");
        assert_eq!(s.end, d(2026, 10, 21));

        let s = span("3 nights starting 2026-11-02");
        assert_eq!((s.start, s.end), (d(2026, 11, 2), d(2026, 11, 5)));
    }

    #[test]
    fn test_oversized_durations_are_capped() {
        for text in ["700000000 weeks", "4294967295 nights", "99999999999999999999 days"] {
            let s = span(text);
            assert_eq!(s.start, d(2026, 10, 15));
            assert_eq!((s.end - s.start).num_days() + 1, 3660, "{}", text);
        }
    }

    #[test]
    fn test_unrecognized() {
        assert!(parse_dates("whenever works", today()).is_none());
        assert!(parse_dates("  ", today()).is_none());
        assert!(parse_dates("0 days", today()).is_none());
        assert!(parse_dates("february 30", today()).is_none());
    }
}
