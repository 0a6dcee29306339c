mod candidate_validator;
mod comparable_set;
mod duplicate_detector;
mod extraction_driver;
mod page_extractor;
mod persistence_coordinator;
mod statement_import_service;
mod text_sanitizer;

pub use candidate_validator::{MIN_DESCRIPTION_LENGTH, validate_candidate};
pub use comparable_set::ComparableSet;
pub use duplicate_detector::{DuplicateDetector, find_exact_duplicates};
pub use extraction_driver::{ExtractionDriver, ExtractionDriverError, ImportEventStream};
pub use page_extractor::PageExtractor;
pub use persistence_coordinator::{ImportSummary, PersistenceCoordinator};
pub use statement_import_service::{
    ImportContext, ImportRun, StatementImportError, StatementImportService,
};
pub use text_sanitizer::sanitize_field_text;
