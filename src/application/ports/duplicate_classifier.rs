use async_trait::async_trait;

use crate::domain::{ComparableSummary, DuplicateLink};

/// Advisory cross-check. Callers must treat any error as "no extra links".
#[async_trait]
pub trait DuplicateClassifier: Send + Sync {
    async fn classify(
        &self,
        comparables: &[ComparableSummary],
        hints: &[DuplicateLink],
    ) -> Result<Vec<DuplicateLink>, DuplicateClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DuplicateClassifierError {
    #[error("classification request failed: {0}")]
    RequestFailed(String),
    #[error("classification rate limited")]
    RateLimited,
    #[error("invalid classification response: {0}")]
    InvalidResponse(String),
}
