use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::{HouseholdId, TransactionId, TransactionKind};

/// A durably stored ledger record.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTransaction {
    pub id: TransactionId,
    pub household_id: HouseholdId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub notes: Option<String>,
    pub category_id: Option<String>,
    pub source_account_id: Option<String>,
    pub destination_account_id: Option<String>,
    pub possible_duplicate: bool,
    pub duplicate_of_transaction_id: Option<TransactionId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub household_id: HouseholdId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub notes: Option<String>,
    pub category_id: Option<String>,
    pub source_account_id: Option<String>,
    pub destination_account_id: Option<String>,
    pub possible_duplicate: bool,
    pub duplicate_of_transaction_id: Option<TransactionId>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub possible_duplicate: Option<bool>,
    pub duplicate_of_transaction_id: Option<TransactionId>,
}

/// Projection of a stored record supplied as duplicate-check context.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentTransaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub possible_duplicate: bool,
}

impl From<&StoredTransaction> for RecentTransaction {
    fn from(stored: &StoredTransaction) -> Self {
        Self {
            id: stored.id,
            date: stored.date,
            amount: stored.amount,
            description: stored.description.clone(),
            possible_duplicate: stored.possible_duplicate,
        }
    }
}
