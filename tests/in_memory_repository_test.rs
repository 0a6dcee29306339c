use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledger_intake::application::ports::{CatalogRepository, RepositoryError, TransactionStore};
use ledger_intake::domain::{
    Category, CategoryKind, HouseholdId, NewTransaction, TransactionId, TransactionKind,
    TransactionPatch,
};
use ledger_intake::infrastructure::persistence::{
    InMemoryCatalogRepository, InMemoryTransactionStore,
};
use ledger_intake::presentation::ImportSettings;

fn new_transaction(household_id: HouseholdId, day: u32, description: &str) -> NewTransaction {
    NewTransaction {
        household_id,
        kind: TransactionKind::Expense,
        amount: Decimal::from_str("10.00").unwrap(),
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        description: description.to_string(),
        notes: None,
        category_id: None,
        source_account_id: None,
        destination_account_id: None,
        possible_duplicate: false,
        duplicate_of_transaction_id: None,
    }
}

#[tokio::test]
async fn given_created_transaction_when_patching_then_only_given_fields_change() {
    let store = InMemoryTransactionStore::new();
    let household_id = HouseholdId::new();
    let original = store.create(&new_transaction(household_id, 1, "Rent")).await.unwrap();
    let duplicate = store.create(&new_transaction(household_id, 1, "Rent again")).await.unwrap();

    store
        .update(
            duplicate.id,
            &TransactionPatch {
                possible_duplicate: Some(true),
                duplicate_of_transaction_id: Some(original.id),
            },
        )
        .await
        .unwrap();

    let patched = store.get_by_id(duplicate.id).await.unwrap().unwrap();
    assert!(patched.possible_duplicate);
    assert_eq!(patched.duplicate_of_transaction_id, Some(original.id));
    assert_eq!(patched.description, "Rent again");
}

#[tokio::test]
async fn given_unknown_id_when_patching_then_not_found() {
    let store = InMemoryTransactionStore::new();

    let result = store
        .update(TransactionId::new(), &TransactionPatch::default())
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn given_several_households_when_listing_recent_then_scoped_newest_first_and_limited() {
    let store = InMemoryTransactionStore::new();
    let household_id = HouseholdId::new();
    for (day, description) in [(3, "Third"), (1, "First"), (2, "Second")] {
        store
            .create(&new_transaction(household_id, day, description))
            .await
            .unwrap();
    }
    store
        .create(&new_transaction(HouseholdId::new(), 9, "Neighbour"))
        .await
        .unwrap();

    let recent = store.list_recent(household_id, 2).await.unwrap();

    let descriptions: Vec<&str> = recent.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Third", "Second"]);
}

#[tokio::test]
async fn given_seeded_household_when_listing_catalog_then_returns_its_entries() {
    let household_id = HouseholdId::new();
    let repository = InMemoryCatalogRepository::new().with_household(
        household_id,
        vec![Category {
            id: "cat-food".to_string(),
            name: "Food".to_string(),
            kind: CategoryKind::Expense,
        }],
        vec![],
    );

    assert_eq!(repository.list_categories(household_id).await.unwrap().len(), 1);
    assert!(repository.list_categories(HouseholdId::new()).await.unwrap().is_empty());
    assert!(repository.list_accounts(household_id).await.unwrap().is_empty());
}

#[test]
fn given_default_import_settings_when_read_then_match_pipeline_limits() {
    let settings = ImportSettings::default();
    assert_eq!(settings.recent_transactions_limit, 100);
    assert_eq!(settings.max_pages, 50);
    assert_eq!(settings.max_upload_bytes(), 20 * 1024 * 1024);
    assert_eq!(settings.chunk_buffer, 16);
}
