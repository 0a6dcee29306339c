use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{TempId, TransactionKind};

/// An extracted, validated record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTransaction {
    pub temp_id: TempId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub notes: Option<String>,
    pub category_id: Option<String>,
    pub source_account_id: Option<String>,
    pub destination_account_id: Option<String>,
    pub possible_duplicate: bool,
    pub duplicate: Option<DuplicateMatch>,
}

impl CandidateTransaction {
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        date: NaiveDate,
        description: String,
    ) -> Self {
        Self {
            temp_id: TempId::new(),
            kind,
            amount,
            date,
            description,
            notes: None,
            category_id: None,
            source_account_id: None,
            destination_account_id: None,
            possible_duplicate: false,
            duplicate: None,
        }
    }

    pub fn mark_duplicate_of(&mut self, duplicate: DuplicateMatch) {
        self.possible_duplicate = true;
        self.duplicate = Some(duplicate);
    }

    pub fn duplicate_of_id(&self) -> Option<&str> {
        self.duplicate.as_ref().map(|d| d.original_id.as_str())
    }
}

/// Where a candidate's suspected original lives, plus enough of it to
/// display without a second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateMatch {
    pub original_id: String,
    pub original: DuplicateOfSummary,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateOfSummary {
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}
