use async_trait::async_trait;

use crate::domain::{PageDocument, StatementDocument};

#[async_trait]
pub trait PageSegmenter: Send + Sync {
    /// Splits a paginated document into single-page documents, in page order.
    async fn split(
        &self,
        document: &StatementDocument,
    ) -> Result<Vec<PageDocument>, SegmenterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SegmenterError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("document could not be parsed: {0}")]
    ParseFailed(String),
    #[error("document has no pages")]
    NoPages,
    #[error("page {page_number} could not be isolated: {reason}")]
    PageIsolationFailed { page_number: usize, reason: String },
    #[error("segmentation timed out")]
    TimedOut,
}
