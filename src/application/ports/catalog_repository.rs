use async_trait::async_trait;

use crate::domain::{Account, Category, HouseholdId};

use super::RepositoryError;

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_categories(&self, household_id: HouseholdId)
    -> Result<Vec<Category>, RepositoryError>;

    async fn list_accounts(&self, household_id: HouseholdId)
    -> Result<Vec<Account>, RepositoryError>;
}
