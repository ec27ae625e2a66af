//! Budget expression parsing.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<neg>-)?\s*(?P<sym>[$€£¥₹])?\s*(?P<amt>\d[\d,]*(?:\.\d+)?)\s*(?P<k>k\b)?\s*(?P<code>usd|eur|gbp|jpy|inr|cad|aud|chf|dollars?|euros?|pounds?|yen|rupees?)?",
    )
    .expect("budget amount regex")
});

static TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(total|overall|in all|whole trip|entire trip|for the trip)\b")
        .expect("total budget regex")
});

static FLEXIBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\b(flexible|around|about|approx\w*|roughly|give or take)\b|~)")
        .expect("flexible budget regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetPeriod {
    Daily,
    Total,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBudget {
    pub amount: Decimal,
    /// ISO code when the text named one
    pub currency: Option<String>,
    pub period: BudgetPeriod,
    pub flexible: bool,
}

/// Parse a free-text budget; `None` when no amount is present
pub fn parse_budget(text: &str) -> Option<ParsedBudget> {
    let text = text.trim().to_lowercase();
    let caps = AMOUNT.captures(&text)?;
    let digits = caps["amt"].replace(',', "");
    let mut amount: Decimal = digits.parse().ok()?;
    if caps.name("k").is_some() {
        amount *= Decimal::from(1000);
    }
    if caps.name("neg").is_some() {
        amount = -amount;
    }
    let currency = caps
        .name("sym")
        .or_else(|| caps.name("code"))
        .and_then(|m| currency_code(m.as_str()))
        .map(str::to_string);
    let period = if TOTAL.is_match(&text) {
        BudgetPeriod::Total
    } else {
        BudgetPeriod::Daily
    };
    Some(ParsedBudget {
        amount,
        currency,
        period,
        flexible: FLEXIBLE.is_match(&text),
    })
}

fn currency_code(token: &str) -> Option<&'static str> {
    let code = match token {
        "$" | "usd" | "dollar" | "dollars" => "USD",
        "€" | "eur" | "euro" | "euros" => "EUR",
        "£" | "gbp" | "pound" | "pounds" => "GBP",
        "¥" | "jpy" | "yen" => "JPY",
        "₹" | "inr" | "rupee" | "rupees" => "INR",
        "cad" => "CAD",
        "aud" => "AUD",
        "chf" => "CHF",
        _ => return None,
    };
    Some(code)
}
