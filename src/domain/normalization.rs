use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

pub const NORMALIZED_DESCRIPTION_MAX_CHARS: usize = 40;

/// Lowercases, keeps alphanumerics only and truncates, so that
/// `"COFFEE-SHOP #12"` and `"coffee shop 12"` share a grouping key.
pub fn normalize_description(description: &str) -> String {
    description
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(NORMALIZED_DESCRIPTION_MAX_CHARS)
        .collect()
}

/// Rounds to cents and pins the scale at two places so the textual form is
/// stable (`42` and `42.0` both become `42.00`).
pub fn normalize_amount(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

pub fn normalize_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp. Partial or impossible
/// dates yield `None`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}
