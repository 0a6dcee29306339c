use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{CatalogRepository, RepositoryError};
use crate::domain::{Account, Category, CategoryKind, HouseholdId};

pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    #[instrument(skip(self), fields(household_id = %household_id))]
    async fn list_categories(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, name, kind
            FROM categories
            WHERE household_id = $1
            ORDER BY name
            "#,
        )
        .bind(household_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter()
            .map(|row| -> Result<Category, RepositoryError> {
                let kind: String = row
                    .try_get("kind")
                    .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?;
                Ok(Category {
                    id: row
                        .try_get("id")
                        .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?,
                    name: row
                        .try_get("name")
                        .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?,
                    kind: kind
                        .parse::<CategoryKind>()
                        .map_err(RepositoryError::CorruptRow)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self), fields(household_id = %household_id))]
    async fn list_accounts(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, name, kind
            FROM accounts
            WHERE household_id = $1
            ORDER BY name
            "#,
        )
        .bind(household_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?;

        rows.iter()
            .map(|row| -> Result<Account, RepositoryError> {
                Ok(Account {
                    id: row
                        .try_get("id")
                        .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?,
                    name: row
                        .try_get("name")
                        .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?,
                    kind: row
                        .try_get("kind")
                        .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?,
                })
            })
            .collect()
    }
}
