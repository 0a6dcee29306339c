use std::pin::Pin;
use std::sync::Arc;

use futures::stream::Stream;

use crate::application::ports::{PageExtractionRequest, PageSegmenter, SegmenterError};
use crate::domain::{
    ExtractionCatalog, ImportEvent, PageDocument, RecentTransaction, StatementDocument,
};

use super::comparable_set::ComparableSet;
use super::page_extractor::PageExtractor;

pub type ImportEventStream =
    Pin<Box<dyn Stream<Item = Result<ImportEvent, ExtractionDriverError>> + Send + 'static>>;

/// Sequences segmentation and per-page extraction into a lazy, page-ordered
/// event stream. A page is only extracted when the consumer polls for it.
pub struct ExtractionDriver {
    segmenter: Arc<dyn PageSegmenter>,
    page_extractor: Arc<PageExtractor>,
}

impl ExtractionDriver {
    pub fn new(segmenter: Arc<dyn PageSegmenter>, page_extractor: Arc<PageExtractor>) -> Self {
        Self {
            segmenter,
            page_extractor,
        }
    }

    pub fn events(
        &self,
        document: StatementDocument,
        catalog: ExtractionCatalog,
        recent: Vec<RecentTransaction>,
    ) -> ImportEventStream {
        let segmenter = Arc::clone(&self.segmenter);
        let page_extractor = Arc::clone(&self.page_extractor);

        Box::pin(async_stream::stream! {
            let pages = if document.content_type.is_image() {
                vec![PageDocument {
                    index: 0,
                    content_type: document.content_type,
                    data: document.data,
                }]
            } else {
                match segmenter.split(&document).await {
                    Ok(pages) => pages,
                    Err(e) => {
                        tracing::error!(error = %e, "Statement could not be segmented into pages");
                        yield Err(ExtractionDriverError::Segmentation(e));
                        return;
                    }
                }
            };

            let total_pages = pages.len();
            let mut comparables = ComparableSet::from_recent(&recent);
            tracing::info!(total_pages, context = comparables.len(), "Starting page extraction");

            for page in &pages {
                let page_number = page.page_number();
                yield Ok(ImportEvent::Progress { page_number, total_pages });

                let request = PageExtractionRequest {
                    page,
                    catalog: &catalog,
                    page_number,
                    total_pages,
                };
                let candidates = match page_extractor.extract(request, &comparables).await {
                    Ok(candidates) => candidates,
                    Err(e) => {
                        tracing::warn!(
                            page_number,
                            error = %e,
                            "Page extraction failed, continuing with next page"
                        );
                        Vec::new()
                    }
                };

                tracing::debug!(page_number, extracted = candidates.len(), "Page extracted");
                comparables.append(&candidates);

                for candidate in candidates {
                    yield Ok(ImportEvent::Transaction {
                        candidate: Box::new(candidate),
                        page_number,
                    });
                }
            }
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionDriverError {
    #[error("segmentation: {0}")]
    Segmentation(#[from] SegmenterError),
}
