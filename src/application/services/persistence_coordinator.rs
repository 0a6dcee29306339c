use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{Stream, StreamExt};
use tokio::sync::mpsc;

use crate::application::ports::{RepositoryError, TransactionStore};
use crate::domain::{
    CandidateTransaction, DuplicateReferenceState, HouseholdId, ImportChunk, ImportEvent,
    NewTransaction, RecentTransaction, ResolvedTransaction, StoredTransaction, TransactionData,
    TransactionId, TransactionPatch,
};

use super::extraction_driver::ExtractionDriverError;

/// Counts reported once the event stream has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub total_transactions: usize,
    pub created_count: usize,
    pub abandoned_pending: usize,
    pub disconnected: bool,
    pub failed: bool,
}

/// Identity tables for one run. Keys are plain strings: temp ids of
/// candidates and textual durable ids.
#[derive(Debug, Default)]
struct IdentityMaps {
    existing: HashMap<String, TransactionId>,
    durable: HashMap<String, TransactionId>,
    pending: HashMap<String, Vec<TransactionId>>,
}

impl IdentityMaps {
    fn with_existing(recent: &[RecentTransaction]) -> Self {
        Self {
            existing: recent.iter().map(|r| (r.id.to_string(), r.id)).collect(),
            ..Self::default()
        }
    }

    fn resolve(&self, reference: Option<&str>) -> DuplicateReferenceState {
        let Some(key) = reference else {
            return DuplicateReferenceState::None;
        };
        if let Some(id) = self.existing.get(key) {
            return DuplicateReferenceState::Existing(*id);
        }
        if let Some(id) = self.durable.get(key) {
            return DuplicateReferenceState::New(*id);
        }
        DuplicateReferenceState::Pending(key.to_string())
    }

    fn record_created(&mut self, temp_id: &str, id: TransactionId) {
        self.durable.insert(temp_id.to_string(), id);
        self.durable.insert(id.to_string(), id);
    }

    fn take_dependents(&mut self, temp_id: &str) -> Vec<TransactionId> {
        self.pending.remove(temp_id).unwrap_or_default()
    }

    fn register_pending(&mut self, awaited: String, dependent: TransactionId) {
        self.pending.entry(awaited).or_default().push(dependent);
    }
}

/// Consumes extraction events in order, persists each candidate, resolves
/// duplicate references against the identity maps and writes one output
/// chunk per event.
pub struct PersistenceCoordinator {
    store: Arc<dyn TransactionStore>,
    household_id: HouseholdId,
    maps: IdentityMaps,
    summary: ImportSummary,
}

impl PersistenceCoordinator {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        household_id: HouseholdId,
        recent: &[RecentTransaction],
    ) -> Self {
        Self {
            store,
            household_id,
            maps: IdentityMaps::with_existing(recent),
            summary: ImportSummary::default(),
        }
    }

    /// Drives `events` to completion, or until `sender`'s receiver goes away.
    /// A write already in flight when the client disconnects is finished
    /// before the loop stops; no further pages are pulled afterwards.
    pub async fn run<S>(mut self, events: S, sender: mpsc::Sender<ImportChunk>) -> ImportSummary
    where
        S: Stream<Item = Result<ImportEvent, ExtractionDriverError>> + Send + Unpin,
    {
        let mut events = events;

        loop {
            if sender.is_closed() {
                self.mark_disconnected();
                break;
            }
            let Some(event) = events.next().await else {
                break;
            };

            let chunk = match event {
                Ok(ImportEvent::Progress {
                    page_number,
                    total_pages,
                }) => ImportChunk::progress(page_number, total_pages),
                Ok(ImportEvent::Transaction {
                    candidate,
                    page_number,
                }) => self.handle_transaction(*candidate, page_number).await,
                Err(e) => {
                    tracing::error!(error = %e, "Import aborted");
                    self.summary.failed = true;
                    self.abandon_pending();
                    if sender.send(ImportChunk::error(e.to_string())).await.is_err() {
                        self.summary.disconnected = true;
                    }
                    return self.summary;
                }
            };

            if sender.send(chunk).await.is_err() {
                self.mark_disconnected();
                break;
            }
        }

        self.abandon_pending();
        if !self.summary.disconnected {
            let complete =
                ImportChunk::complete(self.summary.total_transactions, self.summary.created_count);
            if sender.send(complete).await.is_err() {
                self.summary.disconnected = true;
            }
        }

        tracing::info!(
            total_transactions = self.summary.total_transactions,
            created_count = self.summary.created_count,
            abandoned_pending = self.summary.abandoned_pending,
            disconnected = self.summary.disconnected,
            "Import finished"
        );
        self.summary
    }

    async fn handle_transaction(
        &mut self,
        candidate: CandidateTransaction,
        page_number: usize,
    ) -> ImportChunk {
        self.summary.total_transactions += 1;
        let reference = self.maps.resolve(candidate.duplicate_of_id());

        let outcome = self.persist(&candidate, &reference).await;
        let (id, error) = match outcome {
            Ok(stored) => {
                self.summary.created_count += 1;
                self.maps.record_created(candidate.temp_id.as_str(), stored.id);
                self.backfill_dependents(candidate.temp_id.as_str(), stored.id)
                    .await;
                if let DuplicateReferenceState::Pending(awaited) = &reference {
                    tracing::debug!(
                        temp_id = %candidate.temp_id,
                        awaited = %awaited,
                        "Duplicate original not persisted yet, deferring reference"
                    );
                    self.maps.register_pending(awaited.clone(), stored.id);
                }
                (Some(stored.id), None)
            }
            Err(e) => {
                tracing::warn!(
                    temp_id = %candidate.temp_id,
                    page_number,
                    error = %e,
                    "Failed to persist transaction"
                );
                (None, Some(format!("Failed to save transaction: {}", e)))
            }
        };

        ImportChunk::Transaction(Box::new(TransactionData {
            transaction: ResolvedTransaction::new(&candidate, id, &reference),
            duplicate_reference_status: reference.status(),
            page_number,
            total_so_far: self.summary.total_transactions,
            error,
        }))
    }

    async fn persist(
        &self,
        candidate: &CandidateTransaction,
        reference: &DuplicateReferenceState,
    ) -> Result<StoredTransaction, RepositoryError> {
        let new_transaction = NewTransaction {
            household_id: self.household_id,
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
        };
        self.store.create(&new_transaction).await
    }

    async fn backfill_dependents(&mut self, temp_id: &str, original: TransactionId) {
        let dependents = self.maps.take_dependents(temp_id);
        if dependents.is_empty() {
            return;
        }

        let patch = TransactionPatch {
            possible_duplicate: Some(true),
            duplicate_of_transaction_id: Some(original),
        };
        for dependent in dependents {
            match self.store.update(dependent, &patch).await {
                Ok(()) => tracing::debug!(
                    transaction_id = %dependent,
                    duplicate_of = %original,
                    "Backfilled duplicate reference"
                ),
                Err(e) => tracing::warn!(
                    transaction_id = %dependent,
                    duplicate_of = %original,
                    error = %e,
                    "Failed to backfill duplicate reference"
                ),
            }
        }
    }

    fn abandon_pending(&mut self) {
        for (awaited, dependents) in self.maps.pending.drain() {
            for dependent in dependents {
                tracing::warn!(
                    transaction_id = %dependent,
                    awaited = %awaited,
                    "Abandoning duplicate reference whose original was never persisted"
                );
                self.summary.abandoned_pending += 1;
            }
        }
    }

    fn mark_disconnected(&mut self) {
        tracing::warn!("Client disconnected, stopping import");
        self.summary.disconnected = true;
    }
}
