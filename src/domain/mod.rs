mod candidate_transaction;
mod catalog;
mod comparable_summary;
mod document;
mod duplicate_link;
mod duplicate_reference;
mod household_id;
mod import_chunk;
mod import_event;
pub mod normalization;
mod stored_transaction;
mod transaction_id;
mod transaction_kind;

pub use candidate_transaction::{CandidateTransaction, DuplicateMatch, DuplicateOfSummary};
pub use catalog::{Account, Category, CategoryKind, ExtractionCatalog};
pub use comparable_summary::{ComparableSummary, Provenance};
pub use document::{ContentType, DocumentId, PageDocument, StatementDocument};
pub use duplicate_link::DuplicateLink;
pub use duplicate_reference::{DuplicateReferenceState, DuplicateReferenceStatus};
pub use household_id::HouseholdId;
pub use import_chunk::{
    CompleteData, ErrorData, ImportChunk, ProgressData, ResolvedTransaction, TransactionData,
};
pub use import_event::ImportEvent;
pub use stored_transaction::{
    NewTransaction, RecentTransaction, StoredTransaction, TransactionPatch,
};
pub use transaction_id::{TempId, TransactionId};
pub use transaction_kind::TransactionKind;
