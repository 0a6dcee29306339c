mod catalog_repository;
mod duplicate_classifier;
mod page_segmenter;
mod repository_error;
mod transaction_extractor;
mod transaction_store;

pub use catalog_repository::CatalogRepository;
pub use duplicate_classifier::{DuplicateClassifier, DuplicateClassifierError};
pub use page_segmenter::{PageSegmenter, SegmenterError};
pub use repository_error::RepositoryError;
pub use transaction_extractor::{
    ExtractionError, PageExtractionRequest, RawCandidate, TransactionExtractor,
};
pub use transaction_store::TransactionStore;
