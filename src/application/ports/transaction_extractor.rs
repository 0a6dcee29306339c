use async_trait::async_trait;

use crate::domain::{ExtractionCatalog, PageDocument};

/// Candidate fields exactly as the extraction capability reported them.
/// Missing and null values are both `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    pub kind: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<String>,
    pub source_account_id: Option<String>,
    pub destination_account_id: Option<String>,
    pub possible_duplicate: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
pub struct PageExtractionRequest<'a> {
    pub page: &'a PageDocument,
    pub catalog: &'a ExtractionCatalog,
    pub page_number: usize,
    pub total_pages: usize,
}

#[async_trait]
pub trait TransactionExtractor: Send + Sync {
    async fn extract_page(
        &self,
        request: PageExtractionRequest<'_>,
    ) -> Result<Vec<RawCandidate>, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction request failed: {0}")]
    RequestFailed(String),
    #[error("extraction rate limited")]
    RateLimited,
    #[error("invalid extraction response: {0}")]
    InvalidResponse(String),
}
