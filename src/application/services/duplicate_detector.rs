use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::DuplicateClassifier;
use crate::domain::{
    CandidateTransaction, ComparableSummary, DuplicateLink, DuplicateMatch, Provenance,
};

/// Two-pass duplicate detection: an exact-key heuristic followed by an
/// advisory cross-check whose links win over the heuristic's.
pub struct DuplicateDetector {
    classifier: Arc<dyn DuplicateClassifier>,
}

impl DuplicateDetector {
    pub fn new(classifier: Arc<dyn DuplicateClassifier>) -> Self {
        Self { classifier }
    }

    /// `comparables` must already contain a summary for every candidate in
    /// `candidates`. Only `candidates` are annotated.
    pub async fn annotate(
        &self,
        comparables: &[ComparableSummary],
        candidates: &mut [CandidateTransaction],
    ) {
        let heuristic_links = find_exact_duplicates(comparables);
        let applied = apply_links(comparables, candidates, &heuristic_links);
        tracing::debug!(
            found = heuristic_links.len(),
            applied,
            "Heuristic duplicate pass complete"
        );

        if comparables.len() < 2 {
            return;
        }

        match self.classifier.classify(comparables, &heuristic_links).await {
            Ok(links) => {
                let applied = apply_links(comparables, candidates, &links);
                tracing::debug!(
                    returned = links.len(),
                    applied,
                    "Duplicate cross-check complete"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Duplicate cross-check failed, keeping heuristic results only"
                );
            }
        }
    }
}

/// Groups by (normalized date, amount, description). In each group of two or
/// more the canonical record is the earliest `existing` one, else the
/// earliest `new` one; every other `new` member links to it.
pub fn find_exact_duplicates(comparables: &[ComparableSummary]) -> Vec<DuplicateLink> {
    let mut group_order: Vec<(String, String, String)> = Vec::new();
    let mut groups: HashMap<(String, String, String), Vec<&ComparableSummary>> = HashMap::new();

    for summary in comparables {
        let key = summary.grouping_key();
        let members = groups.entry(key.clone()).or_default();
        if members.is_empty() {
            group_order.push(key);
        }
        members.push(summary);
    }

    let mut links = Vec::new();
    for key in &group_order {
        let Some(members) = groups.get(key) else {
            continue;
        };
        if members.len() < 2 {
            continue;
        }
        let Some(canonical) = members
            .iter()
            .min_by_key(|s| (s.provenance != Provenance::Existing, s.discovery_order))
        else {
            continue;
        };

        for member in members {
            if member.id == canonical.id || member.provenance != Provenance::New {
                continue;
            }
            links.push(DuplicateLink {
                duplicate_id: member.id.clone(),
                original_id: canonical.id.clone(),
                reason: Some(heuristic_reason(canonical)),
            });
        }
    }

    links
}

fn heuristic_reason(canonical: &ComparableSummary) -> String {
    format!(
        "Same date, amount and description as \"{}\" on {} for {}",
        canonical.description, canonical.normalized_date, canonical.normalized_amount
    )
}

/// Applies links whose duplicate side is one of `candidates`. Returns how
/// many were applied.
fn apply_links(
    comparables: &[ComparableSummary],
    candidates: &mut [CandidateTransaction],
    links: &[DuplicateLink],
) -> usize {
    let by_id: HashMap<&str, &ComparableSummary> =
        comparables.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut applied = 0;

    for link in links {
        if link.duplicate_id == link.original_id {
            tracing::debug!(id = %link.duplicate_id, "Ignoring self-referencing duplicate link");
            continue;
        }
        let Some(original) = by_id.get(link.original_id.as_str()) else {
            tracing::debug!(original_id = %link.original_id, "Ignoring link to unknown original");
            continue;
        };
        match by_id.get(link.duplicate_id.as_str()) {
            Some(duplicate) if duplicate.provenance == Provenance::New => {}
            _ => {
                tracing::debug!(
                    duplicate_id = %link.duplicate_id,
                    "Ignoring link whose duplicate side is not a new record"
                );
                continue;
            }
        }
        if points_back(candidates, &link.original_id, &link.duplicate_id) {
            tracing::debug!(
                duplicate_id = %link.duplicate_id,
                original_id = %link.original_id,
                "Ignoring link that would form a duplicate cycle"
            );
            continue;
        }
        let Some(candidate) = candidates
            .iter_mut()
            .find(|c| c.temp_id.as_str() == link.duplicate_id)
        else {
            continue;
        };

        candidate.mark_duplicate_of(DuplicateMatch {
            original_id: original.id.clone(),
            original: original.as_duplicate_of(),
            reason: link.reason.clone(),
        });
        applied += 1;
    }

    applied
}

fn points_back(candidates: &[CandidateTransaction], from: &str, to: &str) -> bool {
    candidates
        .iter()
        .find(|c| c.temp_id.as_str() == from)
        .and_then(|c| c.duplicate_of_id())
        .is_some_and(|target| target == to)
}
