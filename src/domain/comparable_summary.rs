use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::normalization::{normalize_amount, normalize_date, normalize_description};
use super::{CandidateTransaction, DuplicateOfSummary, RecentTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    New,
    Existing,
}

/// Projection used only for duplicate comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparableSummary {
    pub id: String,
    pub provenance: Provenance,
    pub date: NaiveDate,
    pub normalized_date: String,
    pub amount: Decimal,
    pub normalized_amount: Decimal,
    pub description: String,
    pub normalized_description: String,
    /// Already flagged as a possible duplicate, either by the store or by
    /// the extraction model.
    pub possible_duplicate: bool,
    pub discovery_order: usize,
}

impl ComparableSummary {
    pub fn from_candidate(candidate: &CandidateTransaction, discovery_order: usize) -> Self {
        Self::build(
            candidate.temp_id.as_str().to_string(),
            Provenance::New,
            candidate.date,
            candidate.amount,
            &candidate.description,
            candidate.possible_duplicate,
            discovery_order,
        )
    }

    pub fn from_recent(recent: &RecentTransaction, discovery_order: usize) -> Self {
        Self::build(
            recent.id.to_string(),
            Provenance::Existing,
            recent.date,
            recent.amount,
            &recent.description,
            recent.possible_duplicate,
            discovery_order,
        )
    }

    fn build(
        id: String,
        provenance: Provenance,
        date: NaiveDate,
        amount: Decimal,
        description: &str,
        possible_duplicate: bool,
        discovery_order: usize,
    ) -> Self {
        Self {
            id,
            provenance,
            date,
            normalized_date: normalize_date(date),
            amount,
            normalized_amount: normalize_amount(amount),
            description: description.to_string(),
            normalized_description: normalize_description(description),
            possible_duplicate,
            discovery_order,
        }
    }

    pub fn grouping_key(&self) -> (String, String, String) {
        (
            self.normalized_date.clone(),
            self.normalized_amount.to_string(),
            self.normalized_description.clone(),
        )
    }

    pub fn as_duplicate_of(&self) -> DuplicateOfSummary {
        DuplicateOfSummary {
            description: self.description.clone(),
            date: self.date,
            amount: self.amount,
        }
    }
}
