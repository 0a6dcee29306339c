use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::application::ports::{CatalogRepository, RepositoryError, TransactionStore};
use crate::domain::{
    Account, Category, HouseholdId, NewTransaction, RecentTransaction, StoredTransaction,
    TransactionId, TransactionPatch,
};

/// Process-local ledger used when no database is configured.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    transactions: Mutex<Vec<StoredTransaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<StoredTransaction> {
        self.transactions
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::ConnectionFailed("in-memory store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(
        &self,
        transaction: &NewTransaction,
    ) -> Result<StoredTransaction, RepositoryError> {
        let stored = StoredTransaction {
            id: TransactionId::new(),
            household_id: transaction.household_id,
            kind: transaction.kind,
            amount: transaction.amount,
            date: transaction.date,
            description: transaction.description.clone(),
            notes: transaction.notes.clone(),
            category_id: transaction.category_id.clone(),
            source_account_id: transaction.source_account_id.clone(),
            destination_account_id: transaction.destination_account_id.clone(),
            possible_duplicate: transaction.possible_duplicate,
            duplicate_of_transaction_id: transaction.duplicate_of_transaction_id,
            created_at: Utc::now(),
        };
        self.transactions
            .lock()
            .map_err(poisoned)?
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<(), RepositoryError> {
        let mut transactions = self.transactions.lock().map_err(poisoned)?;
        let stored = transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if let Some(flag) = patch.possible_duplicate {
            stored.possible_duplicate = flag;
        }
        if let Some(original) = patch.duplicate_of_transaction_id {
            stored.duplicate_of_transaction_id = Some(original);
        }
        Ok(())
    }

    async fn get_by_id(
        &self,
        id: TransactionId,
    ) -> Result<Option<StoredTransaction>, RepositoryError> {
        Ok(self
            .transactions
            .lock()
            .map_err(poisoned)?
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn list_recent(
        &self,
        household_id: HouseholdId,
        limit: usize,
    ) -> Result<Vec<RecentTransaction>, RepositoryError> {
        let transactions = self.transactions.lock().map_err(poisoned)?;
        let mut owned: Vec<&StoredTransaction> = transactions
            .iter()
            .filter(|t| t.household_id == household_id)
            .collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        Ok(owned
            .into_iter()
            .take(limit)
            .map(RecentTransaction::from)
            .collect())
    }
}

/// Static catalog keyed by household.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    categories: HashMap<HouseholdId, Vec<Category>>,
    accounts: HashMap<HouseholdId, Vec<Account>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_household(
        mut self,
        household_id: HouseholdId,
        categories: Vec<Category>,
        accounts: Vec<Account>,
    ) -> Self {
        self.categories.insert(household_id, categories);
        self.accounts.insert(household_id, accounts);
        self
    }
}

#[async_trait::async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_categories(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<Category>, RepositoryError> {
        Ok(self
            .categories
            .get(&household_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_accounts(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<Account>, RepositoryError> {
        Ok(self.accounts.get(&household_id).cloned().unwrap_or_default())
    }
}
