use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{
    CandidateTransaction, DuplicateOfSummary, DuplicateReferenceState, DuplicateReferenceStatus,
    TransactionId, TransactionKind,
};

/// One line of the newline-delimited JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ImportChunk {
    Progress(ProgressData),
    Transaction(Box<TransactionData>),
    Complete(CompleteData),
    Error(ErrorData),
}

impl ImportChunk {
    pub fn progress(page_number: usize, total_pages: usize) -> Self {
        Self::Progress(ProgressData {
            page_number,
            total_pages,
        })
    }

    pub fn complete(total_transactions: usize, created_count: usize) -> Self {
        Self::Complete(CompleteData {
            total_transactions,
            created_count,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorData {
            error: message.into(),
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Error(_))
    }

    /// Serializes to a single NDJSON line including the trailing newline.
    pub fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressData {
    pub page_number: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub transaction: ResolvedTransaction,
    pub duplicate_reference_status: DuplicateReferenceStatus,
    pub page_number: usize,
    pub total_so_far: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteData {
    pub total_transactions: usize,
    pub created_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorData {
    pub error: String,
}

/// A candidate with its persistence outcome folded in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTransaction {
    pub id: Option<TransactionId>,
    pub temp_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub notes: Option<String>,
    pub category_id: Option<String>,
    pub source_account_id: Option<String>,
    pub destination_account_id: Option<String>,
    pub possible_duplicate: bool,
    pub duplicate_of_transaction_id: Option<TransactionId>,
    pub duplicate_of_temp_id: Option<String>,
    pub duplicate_of: Option<DuplicateOfSummary>,
    pub duplicate_reason: Option<String>,
}

impl ResolvedTransaction {
    pub fn new(
        candidate: &CandidateTransaction,
        id: Option<TransactionId>,
        reference: &DuplicateReferenceState,
    ) -> Self {
        let duplicate_of_temp_id = match reference {
            DuplicateReferenceState::Pending(temp_id) => Some(temp_id.clone()),
            _ => None,
        };
        Self {
            id,
            temp_id: candidate.temp_id.as_str().to_string(),
            kind: candidate.kind,
            amount: candidate.amount,
            date: candidate.date,
            description: candidate.description.clone(),
            notes: candidate.notes.clone(),
            category_id: candidate.category_id.clone(),
            source_account_id: candidate.source_account_id.clone(),
            destination_account_id: candidate.destination_account_id.clone(),
            possible_duplicate: candidate.possible_duplicate,
            duplicate_of_transaction_id: reference.durable_id(),
            duplicate_of_temp_id,
            duplicate_of: candidate.duplicate.as_ref().map(|d| d.original.clone()),
            duplicate_reason: candidate.duplicate.as_ref().and_then(|d| d.reason.clone()),
        }
    }
}
