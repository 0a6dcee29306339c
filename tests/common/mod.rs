#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use ledger_intake::application::ports::{
    DuplicateClassifier, DuplicateClassifierError, ExtractionError, PageExtractionRequest,
    PageSegmenter, RawCandidate, RepositoryError, SegmenterError, TransactionExtractor,
    TransactionStore,
};
use ledger_intake::application::services::{
    DuplicateDetector, ExtractionDriver, PageExtractor, StatementImportService,
};
use ledger_intake::domain::{
    ComparableSummary, ContentType, DuplicateLink, HouseholdId, ImportChunk, NewTransaction,
    PageDocument, RecentTransaction, StatementDocument, StoredTransaction, TransactionId,
    TransactionPatch,
};
use ledger_intake::infrastructure::persistence::{
    InMemoryCatalogRepository, InMemoryTransactionStore,
};

pub fn raw(kind: &str, amount: f64, date: &str, description: &str) -> RawCandidate {
    RawCandidate {
        kind: Some(kind.to_string()),
        amount: Some(amount),
        date: Some(date.to_string()),
        description: Some(description.to_string()),
        ..RawCandidate::default()
    }
}

pub fn expense(amount: f64, date: &str, description: &str) -> RawCandidate {
    raw("EXPENSE", amount, date, description)
}

pub fn pdf_document() -> StatementDocument {
    StatementDocument::new(
        "statement.pdf".to_string(),
        ContentType::Pdf,
        b"%PDF-1.5 stub".to_vec(),
    )
}

/// Pretends every document has `pages` pages.
pub struct StubSegmenter {
    pages: usize,
}

impl StubSegmenter {
    pub fn with_pages(pages: usize) -> Self {
        Self { pages }
    }
}

#[async_trait::async_trait]
impl PageSegmenter for StubSegmenter {
    async fn split(
        &self,
        document: &StatementDocument,
    ) -> Result<Vec<PageDocument>, SegmenterError> {
        Ok((0..self.pages)
            .map(|index| PageDocument {
                index,
                content_type: document.content_type,
                data: vec![index as u8],
            })
            .collect())
    }
}

pub struct FailingSegmenter;

#[async_trait::async_trait]
impl PageSegmenter for FailingSegmenter {
    async fn split(
        &self,
        _document: &StatementDocument,
    ) -> Result<Vec<PageDocument>, SegmenterError> {
        Err(SegmenterError::ParseFailed("not a PDF".to_string()))
    }
}

/// Returns a fixed list of raw candidates per page number; pages listed in
/// `failing` error out.
#[derive(Default)]
pub struct ScriptedExtractor {
    pages: HashMap<usize, Vec<RawCandidate>>,
    failing: Vec<usize>,
    calls: Mutex<Vec<usize>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page_number: usize, candidates: Vec<RawCandidate>) -> Self {
        self.pages.insert(page_number, candidates);
        self
    }

    pub fn failing_page(mut self, page_number: usize) -> Self {
        self.failing.push(page_number);
        self
    }

    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TransactionExtractor for ScriptedExtractor {
    async fn extract_page(
        &self,
        request: PageExtractionRequest<'_>,
    ) -> Result<Vec<RawCandidate>, ExtractionError> {
        self.calls.lock().unwrap().push(request.page_number);
        if self.failing.contains(&request.page_number) {
            return Err(ExtractionError::RequestFailed("upstream 500".to_string()));
        }
        Ok(self
            .pages
            .get(&request.page_number)
            .cloned()
            .unwrap_or_default())
    }
}

/// Cross-check that never finds anything beyond the heuristic.
pub struct SilentClassifier;

#[async_trait::async_trait]
impl DuplicateClassifier for SilentClassifier {
    async fn classify(
        &self,
        _comparables: &[ComparableSummary],
        _hints: &[DuplicateLink],
    ) -> Result<Vec<DuplicateLink>, DuplicateClassifierError> {
        Ok(vec![])
    }
}

pub struct FailingClassifier;

#[async_trait::async_trait]
impl DuplicateClassifier for FailingClassifier {
    async fn classify(
        &self,
        _comparables: &[ComparableSummary],
        _hints: &[DuplicateLink],
    ) -> Result<Vec<DuplicateLink>, DuplicateClassifierError> {
        Err(DuplicateClassifierError::RateLimited)
    }
}

/// Links records by description: each `(duplicate, original)` pair becomes a
/// link between the first comparables carrying those descriptions.
pub struct DescriptionLinkClassifier {
    pairs: Vec<(String, String)>,
    pub hints_seen: Mutex<Vec<DuplicateLink>>,
    calls: Mutex<usize>,
}

impl DescriptionLinkClassifier {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            pairs: pairs
                .iter()
                .map(|(d, o)| (d.to_string(), o.to_string()))
                .collect(),
            hints_seen: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl DuplicateClassifier for DescriptionLinkClassifier {
    async fn classify(
        &self,
        comparables: &[ComparableSummary],
        hints: &[DuplicateLink],
    ) -> Result<Vec<DuplicateLink>, DuplicateClassifierError> {
        *self.calls.lock().unwrap() += 1;
        self.hints_seen.lock().unwrap().extend(hints.iter().cloned());
        let find = |description: &str| {
            comparables
                .iter()
                .find(|c| c.description == description)
                .map(|c| c.id.clone())
        };
        Ok(self
            .pairs
            .iter()
            .filter_map(|(duplicate, original)| {
                Some(DuplicateLink {
                    duplicate_id: find(duplicate)?,
                    original_id: find(original)?,
                    reason: Some("Cross-check match".to_string()),
                })
            })
            .collect())
    }
}

/// Delegates to the in-memory store, recording updates and failing creates
/// for listed descriptions. A gated description parks its create until
/// `release` is notified, signalling `entered` first.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryTransactionStore,
    fail_descriptions: Vec<String>,
    fail_updates: bool,
    gate_description: Option<String>,
    pub entered: Notify,
    pub release: Notify,
    pub updates: Mutex<Vec<(TransactionId, TransactionPatch)>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, description: &str) -> Self {
        self.fail_descriptions.push(description.to_string());
        self
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn gated_on(mut self, description: &str) -> Self {
        self.gate_description = Some(description.to_string());
        self
    }

    pub fn stored(&self) -> Vec<StoredTransaction> {
        self.inner.snapshot()
    }

    pub fn stored_by_description(&self, description: &str) -> Option<StoredTransaction> {
        self.stored()
            .into_iter()
            .find(|t| t.description == description)
    }
}

#[async_trait::async_trait]
impl TransactionStore for RecordingStore {
    async fn create(
        &self,
        transaction: &NewTransaction,
    ) -> Result<StoredTransaction, RepositoryError> {
        if self.fail_descriptions.contains(&transaction.description) {
            return Err(RepositoryError::ConstraintViolation("duplicate key".to_string()));
        }
        if self.gate_description.as_deref() == Some(transaction.description.as_str()) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.create(transaction).await
    }

    async fn update(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<(), RepositoryError> {
        self.updates.lock().unwrap().push((id, patch.clone()));
        if self.fail_updates {
            return Err(RepositoryError::ConnectionFailed("connection reset".to_string()));
        }
        self.inner.update(id, patch).await
    }

    async fn get_by_id(
        &self,
        id: TransactionId,
    ) -> Result<Option<StoredTransaction>, RepositoryError> {
        self.inner.get_by_id(id).await
    }

    async fn list_recent(
        &self,
        household_id: HouseholdId,
        limit: usize,
    ) -> Result<Vec<RecentTransaction>, RepositoryError> {
        self.inner.list_recent(household_id, limit).await
    }
}

pub fn driver(
    segmenter: Arc<dyn PageSegmenter>,
    extractor: Arc<dyn TransactionExtractor>,
    classifier: Arc<dyn DuplicateClassifier>,
) -> Arc<ExtractionDriver> {
    let page_extractor = Arc::new(PageExtractor::new(
        extractor,
        DuplicateDetector::new(classifier),
    ));
    Arc::new(ExtractionDriver::new(segmenter, page_extractor))
}

pub fn import_service(
    driver: Arc<ExtractionDriver>,
    store: Arc<dyn TransactionStore>,
) -> StatementImportService {
    StatementImportService::new(
        driver,
        store,
        Arc::new(InMemoryCatalogRepository::new()),
        100,
        16,
    )
}

/// Drains every chunk a run produces.
pub async fn collect_chunks(
    mut receiver: tokio::sync::mpsc::Receiver<ImportChunk>,
) -> Vec<ImportChunk> {
    let mut chunks = Vec::new();
    while let Some(chunk) = receiver.recv().await {
        chunks.push(chunk);
    }
    chunks
}
