use crate::domain::{CandidateTransaction, ComparableSummary, RecentTransaction};

/// Running universe for duplicate detection: stored context records first,
/// then every candidate extracted so far, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ComparableSet {
    summaries: Vec<ComparableSummary>,
}

impl ComparableSet {
    pub fn from_recent(recent: &[RecentTransaction]) -> Self {
        let summaries = recent
            .iter()
            .enumerate()
            .map(|(order, r)| ComparableSummary::from_recent(r, order))
            .collect();
        Self { summaries }
    }

    /// Snapshot of the set with `page` appended, leaving `self` untouched.
    pub fn with_page(&self, page: &[CandidateTransaction]) -> Vec<ComparableSummary> {
        let mut snapshot = self.summaries.clone();
        snapshot.extend(self.summarize(page));
        snapshot
    }

    pub fn append(&mut self, page: &[CandidateTransaction]) {
        let summaries = self.summarize(page);
        self.summaries.extend(summaries);
    }

    pub fn as_slice(&self) -> &[ComparableSummary] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    fn summarize(&self, page: &[CandidateTransaction]) -> Vec<ComparableSummary> {
        let start = self.summaries.len();
        page.iter()
            .enumerate()
            .map(|(offset, c)| ComparableSummary::from_candidate(c, start + offset))
            .collect()
    }
}
