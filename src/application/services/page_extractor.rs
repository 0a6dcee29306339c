use std::sync::Arc;

use crate::application::ports::{ExtractionError, PageExtractionRequest, TransactionExtractor};
use crate::domain::CandidateTransaction;

use super::candidate_validator::validate_candidate;
use super::comparable_set::ComparableSet;
use super::duplicate_detector::DuplicateDetector;

pub struct PageExtractor {
    extractor: Arc<dyn TransactionExtractor>,
    detector: DuplicateDetector,
}

impl PageExtractor {
    pub fn new(extractor: Arc<dyn TransactionExtractor>, detector: DuplicateDetector) -> Self {
        Self {
            extractor,
            detector,
        }
    }

    /// Extracts, validates and duplicate-annotates one page. Invalid raw
    /// candidates are dropped; only a failed extraction call is an error.
    pub async fn extract(
        &self,
        request: PageExtractionRequest<'_>,
        comparables: &ComparableSet,
    ) -> Result<Vec<CandidateTransaction>, ExtractionError> {
        let raw_candidates = self.extractor.extract_page(request).await?;
        let raw_count = raw_candidates.len();

        let mut candidates: Vec<CandidateTransaction> = raw_candidates
            .into_iter()
            .filter_map(|raw| validate_candidate(raw, request.catalog))
            .collect();

        if candidates.len() < raw_count {
            tracing::debug!(
                page_number = request.page_number,
                dropped = raw_count - candidates.len(),
                "Dropped invalid candidates"
            );
        }

        if candidates.is_empty() {
            return Ok(candidates);
        }

        let snapshot = comparables.with_page(&candidates);
        self.detector.annotate(&snapshot, &mut candidates).await;

        Ok(candidates)
    }
}
