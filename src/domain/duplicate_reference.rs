use serde::Serialize;

use super::TransactionId;

/// Outcome of resolving a candidate's duplicate-of reference at persistence
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateReferenceState {
    None,
    Existing(TransactionId),
    New(TransactionId),
    Pending(String),
}

impl DuplicateReferenceState {
    pub fn status(&self) -> DuplicateReferenceStatus {
        match self {
            DuplicateReferenceState::None => DuplicateReferenceStatus::None,
            DuplicateReferenceState::Existing(_) => DuplicateReferenceStatus::Existing,
            DuplicateReferenceState::New(_) => DuplicateReferenceStatus::New,
            DuplicateReferenceState::Pending(_) => DuplicateReferenceStatus::Pending,
        }
    }

    pub fn durable_id(&self) -> Option<TransactionId> {
        match self {
            DuplicateReferenceState::Existing(id) | DuplicateReferenceState::New(id) => Some(*id),
            DuplicateReferenceState::None | DuplicateReferenceState::Pending(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateReferenceStatus {
    None,
    Existing,
    New,
    Pending,
}
