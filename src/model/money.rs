//! Currency-aware money formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Symbol for the common currencies, if there is one
pub fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// Round to the two-decimal precision used for every money figure
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `$12.50` for known symbols, `12.50 CHF` otherwise
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let amount = round_money(amount);
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let magnitude = format!("{:.2}", amount.abs());
    let sign = if negative { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, magnitude),
        None => format!("{}{} {}", sign, magnitude, currency),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::new(1250, 2), "USD"), "$12.50");
        assert_eq!(format_money(Decimal::from(3), "EUR"), "€3.00");
        assert_eq!(format_money(Decimal::new(-5, 0), "USD"), "-$5.00");
        assert_eq!(format_money(Decimal::new(12345, 3), "CHF"), "12.35 CHF");
    }
}
