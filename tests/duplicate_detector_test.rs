mod common;

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledger_intake::application::services::{ComparableSet, DuplicateDetector, find_exact_duplicates};
use ledger_intake::domain::{
    CandidateTransaction, RecentTransaction, TransactionId, TransactionKind,
};

use common::{DescriptionLinkClassifier, FailingClassifier, SilentClassifier};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn amount(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn candidate(day: u32, value: &str, description: &str) -> CandidateTransaction {
    CandidateTransaction::new(
        TransactionKind::Expense,
        amount(value),
        date(day),
        description.to_string(),
    )
}

fn recent(day: u32, value: &str, description: &str) -> RecentTransaction {
    RecentTransaction {
        id: TransactionId::new(),
        date: date(day),
        amount: amount(value),
        description: description.to_string(),
        possible_duplicate: false,
    }
}

#[tokio::test]
async fn given_same_key_on_one_page_when_annotating_then_later_links_to_earlier() {
    let detector = DuplicateDetector::new(Arc::new(SilentClassifier));
    let mut page = vec![
        candidate(5, "42.00", "Coffee Shop"),
        candidate(5, "42", "COFFEE-SHOP"),
    ];
    let comparables = ComparableSet::default().with_page(&page);

    detector.annotate(&comparables, &mut page).await;

    assert!(page[0].duplicate.is_none());
    assert!(page[1].possible_duplicate);
    assert_eq!(page[1].duplicate_of_id(), Some(page[0].temp_id.as_str()));
    let duplicate = page[1].duplicate.as_ref().unwrap();
    assert_eq!(duplicate.original.description, "Coffee Shop");
    assert!(duplicate.reason.as_deref().unwrap().contains("Coffee Shop"));
}

#[tokio::test]
async fn given_stored_match_when_annotating_then_links_to_existing_record() {
    let detector = DuplicateDetector::new(Arc::new(SilentClassifier));
    let stored = recent(5, "42.00", "Coffee Shop");
    let set = ComparableSet::from_recent(std::slice::from_ref(&stored));
    let mut page = vec![candidate(5, "42.00", "Coffee Shop")];
    let comparables = set.with_page(&page);

    detector.annotate(&comparables, &mut page).await;

    assert_eq!(page[0].duplicate_of_id(), Some(stored.id.to_string().as_str()));
}

#[tokio::test]
async fn given_stored_and_new_in_same_group_when_grouping_then_existing_is_canonical() {
    let stored = recent(5, "9.99", "Streaming");
    let set = ComparableSet::from_recent(std::slice::from_ref(&stored));
    let page = vec![
        candidate(5, "9.99", "Streaming"),
        candidate(5, "9.99", "streaming"),
    ];
    let comparables = set.with_page(&page);

    let links = find_exact_duplicates(&comparables);

    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.original_id == stored.id.to_string()));
    assert!(links.iter().all(|l| l.duplicate_id != stored.id.to_string()));
}

#[test]
fn given_two_stored_records_with_same_key_when_grouping_then_no_links() {
    let comparables = ComparableSet::from_recent(&[
        recent(5, "9.99", "Streaming"),
        recent(5, "9.99", "Streaming"),
    ]);

    assert!(find_exact_duplicates(comparables.as_slice()).is_empty());
}

#[test]
fn given_different_amount_or_date_when_grouping_then_no_links() {
    let page = vec![
        candidate(5, "9.99", "Streaming"),
        candidate(5, "10.99", "Streaming"),
        candidate(6, "9.99", "Streaming"),
    ];
    let comparables = ComparableSet::default().with_page(&page);

    assert!(find_exact_duplicates(&comparables).is_empty());
}

#[tokio::test]
async fn given_earlier_page_candidate_when_annotating_later_page_then_only_current_page_mutated() {
    let detector = DuplicateDetector::new(Arc::new(SilentClassifier));
    let mut set = ComparableSet::default();
    let first_page = vec![candidate(5, "42.00", "Coffee Shop")];
    set.append(&first_page);

    let mut second_page = vec![candidate(5, "42.00", "Coffee Shop")];
    let comparables = set.with_page(&second_page);
    detector.annotate(&comparables, &mut second_page).await;

    assert_eq!(
        second_page[0].duplicate_of_id(),
        Some(first_page[0].temp_id.as_str())
    );
    assert!(first_page[0].duplicate.is_none());
}

#[tokio::test]
async fn given_cross_check_link_when_annotating_then_overrides_heuristic() {
    let classifier = Arc::new(DescriptionLinkClassifier::new(&[("Coffee-Shop", "Bakery")]));
    let detector = DuplicateDetector::new(classifier.clone());
    let mut page = vec![
        candidate(5, "3.00", "Bakery"),
        candidate(5, "42.00", "Coffee Shop"),
        candidate(5, "42.00", "Coffee-Shop"),
    ];
    let comparables = ComparableSet::default().with_page(&page);

    detector.annotate(&comparables, &mut page).await;

    assert_eq!(page[2].duplicate_of_id(), Some(page[0].temp_id.as_str()));
    assert_eq!(
        page[2].duplicate.as_ref().unwrap().reason.as_deref(),
        Some("Cross-check match")
    );
}

#[tokio::test]
async fn given_heuristic_links_when_cross_checking_then_they_are_sent_as_hints() {
    let classifier = Arc::new(DescriptionLinkClassifier::new(&[]));
    let detector = DuplicateDetector::new(classifier.clone());
    let mut page = vec![
        candidate(5, "42.00", "Coffee Shop"),
        candidate(5, "42.00", "Coffee Shop"),
    ];
    let comparables = ComparableSet::default().with_page(&page);

    detector.annotate(&comparables, &mut page).await;

    let hints = classifier.hints_seen.lock().unwrap().clone();
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].duplicate_id, page[1].temp_id.as_str());
    assert!(page[1].possible_duplicate);
}

#[tokio::test]
async fn given_cross_check_failure_when_annotating_then_heuristic_results_survive() {
    let detector = DuplicateDetector::new(Arc::new(FailingClassifier));
    let mut page = vec![
        candidate(5, "42.00", "Coffee Shop"),
        candidate(5, "42.00", "Coffee Shop"),
    ];
    let comparables = ComparableSet::default().with_page(&page);

    detector.annotate(&comparables, &mut page).await;

    assert_eq!(page[1].duplicate_of_id(), Some(page[0].temp_id.as_str()));
}

#[tokio::test]
async fn given_link_with_existing_duplicate_side_when_annotating_then_ignored() {
    let classifier = Arc::new(DescriptionLinkClassifier::new(&[("Rent", "Groceries")]));
    let detector = DuplicateDetector::new(classifier);
    let set = ComparableSet::from_recent(&[recent(1, "900.00", "Rent")]);
    let mut page = vec![candidate(2, "50.00", "Groceries")];
    let comparables = set.with_page(&page);

    detector.annotate(&comparables, &mut page).await;

    assert!(page[0].duplicate.is_none());
}

#[tokio::test]
async fn given_link_that_would_form_cycle_when_annotating_then_second_link_skipped() {
    let classifier = Arc::new(DescriptionLinkClassifier::new(&[
        ("Taxi", "Train"),
        ("Train", "Taxi"),
    ]));
    let detector = DuplicateDetector::new(classifier);
    let mut page = vec![candidate(5, "20.00", "Train"), candidate(5, "18.00", "Taxi")];
    let comparables = ComparableSet::default().with_page(&page);

    detector.annotate(&comparables, &mut page).await;

    assert_eq!(page[1].duplicate_of_id(), Some(page[0].temp_id.as_str()));
    assert!(page[0].duplicate.is_none());
}

#[tokio::test]
async fn given_single_comparable_when_annotating_then_cross_check_skipped() {
    let classifier = Arc::new(DescriptionLinkClassifier::new(&[("Train", "Train")]));
    let detector = DuplicateDetector::new(classifier.clone());
    let mut page = vec![candidate(5, "20.00", "Train")];
    let comparables = ComparableSet::default().with_page(&page);

    detector.annotate(&comparables, &mut page).await;

    assert!(page[0].duplicate.is_none());
    assert_eq!(classifier.call_count(), 0);
}
