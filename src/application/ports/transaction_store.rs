use async_trait::async_trait;

use crate::domain::{
    HouseholdId, NewTransaction, RecentTransaction, StoredTransaction, TransactionId,
    TransactionPatch,
};

use super::RepositoryError;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn create(&self, transaction: &NewTransaction)
    -> Result<StoredTransaction, RepositoryError>;

    async fn update(&self, id: TransactionId, patch: &TransactionPatch)
    -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: TransactionId)
    -> Result<Option<StoredTransaction>, RepositoryError>;

    async fn list_recent(
        &self,
        household_id: HouseholdId,
        limit: usize,
    ) -> Result<Vec<RecentTransaction>, RepositoryError>;
}
