use super::CandidateTransaction;

/// Produced by the extraction driver, strictly in page order.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    Progress {
        page_number: usize,
        total_pages: usize,
    },
    Transaction {
        candidate: Box<CandidateTransaction>,
        page_number: usize,
    },
}
