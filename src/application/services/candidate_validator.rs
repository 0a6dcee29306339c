use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::application::ports::RawCandidate;
use crate::domain::normalization::parse_calendar_date;
use crate::domain::{CandidateTransaction, ExtractionCatalog, TransactionKind};

use super::text_sanitizer::{present, sanitize_field_text};

pub const MIN_DESCRIPTION_LENGTH: usize = 3;

/// Turns one raw candidate into a validated, normalized candidate with a
/// fresh temp id, or `None` if it breaks an invariant.
pub fn validate_candidate(
    raw: RawCandidate,
    catalog: &ExtractionCatalog,
) -> Option<CandidateTransaction> {
    let kind: TransactionKind = raw.kind.as_deref()?.parse().ok()?;
    let amount = validate_amount(raw.amount?)?;
    let date = parse_calendar_date(raw.date.as_deref()?)?;
    let description = validate_description(raw.description.as_deref()?)?;

    let mut candidate = CandidateTransaction::new(kind, amount, date, description);
    candidate.notes = present(raw.notes);
    candidate.possible_duplicate = raw.possible_duplicate.unwrap_or(false);
    candidate.category_id = present(raw.category_id).filter(|id| {
        catalog
            .category(id)
            .is_some_and(|category| category.kind.accepts(kind))
    });

    let source = present(raw.source_account_id).filter(|id| catalog.has_account(id));
    let destination = present(raw.destination_account_id).filter(|id| catalog.has_account(id));
    match kind {
        TransactionKind::Expense => {
            candidate.source_account_id = source;
        }
        TransactionKind::Income => {
            candidate.destination_account_id = destination;
        }
        TransactionKind::Transfer => {
            candidate.category_id = None;
            candidate.source_account_id = source;
            candidate.destination_account_id = destination;
        }
    }

    Some(candidate)
}

fn validate_amount(raw: f64) -> Option<Decimal> {
    if !raw.is_finite() {
        return None;
    }
    let amount = Decimal::from_f64(raw)?.round_dp(2);
    (amount > Decimal::ZERO).then_some(amount)
}

fn validate_description(raw: &str) -> Option<String> {
    let description = sanitize_field_text(raw);
    if description.chars().count() < MIN_DESCRIPTION_LENGTH {
        return None;
    }
    if description.ends_with("...") || description.ends_with('\u{2026}') {
        return None;
    }
    Some(description)
}
