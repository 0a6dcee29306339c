use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::error::ErrorKind;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, TransactionStore};
use crate::domain::{
    HouseholdId, NewTransaction, RecentTransaction, StoredTransaction, TransactionId,
    TransactionKind, TransactionPatch,
};

pub struct PgTransactionStore {
    pool: PgPool,
}

impl PgTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, household_id, kind, amount, date, description, notes, category_id,
    source_account_id, destination_account_id, possible_duplicate,
    duplicate_of_transaction_id, created_at
"#;

fn query_failed(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if !matches!(db.kind(), ErrorKind::Other) => {
            RepositoryError::ConstraintViolation(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::ConnectionFailed(e.to_string())
        }
        _ => RepositoryError::QueryFailed(e.to_string()),
    }
}

fn corrupt_row(e: sqlx::Error) -> RepositoryError {
    RepositoryError::CorruptRow(e.to_string())
}

fn map_row(row: &PgRow) -> Result<StoredTransaction, RepositoryError> {
    let kind: String = row.try_get("kind").map_err(corrupt_row)?;
    let kind = kind
        .parse::<TransactionKind>()
        .map_err(RepositoryError::CorruptRow)?;
    let duplicate_of: Option<Uuid> = row
        .try_get("duplicate_of_transaction_id")
        .map_err(corrupt_row)?;

    Ok(StoredTransaction {
        id: TransactionId::from_uuid(row.try_get("id").map_err(corrupt_row)?),
        household_id: HouseholdId::from_uuid(row.try_get("household_id").map_err(corrupt_row)?),
        kind,
        amount: row.try_get::<Decimal, _>("amount").map_err(corrupt_row)?,
        date: row.try_get::<NaiveDate, _>("date").map_err(corrupt_row)?,
        description: row.try_get("description").map_err(corrupt_row)?,
        notes: row.try_get("notes").map_err(corrupt_row)?,
        category_id: row.try_get("category_id").map_err(corrupt_row)?,
        source_account_id: row.try_get("source_account_id").map_err(corrupt_row)?,
        destination_account_id: row.try_get("destination_account_id").map_err(corrupt_row)?,
        possible_duplicate: row.try_get("possible_duplicate").map_err(corrupt_row)?,
        duplicate_of_transaction_id: duplicate_of.map(TransactionId::from_uuid),
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(corrupt_row)?,
    })
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    #[instrument(skip(self, transaction), fields(household_id = %transaction.household_id))]
    async fn create(
        &self,
        transaction: &NewTransaction,
    ) -> Result<StoredTransaction, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO transactions (
                id, household_id, kind, amount, date, description, notes, category_id,
                source_account_id, destination_account_id, possible_duplicate,
                duplicate_of_transaction_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(TransactionId::new().as_uuid())
            .bind(transaction.household_id.as_uuid())
            .bind(transaction.kind.as_str())
            .bind(transaction.amount)
            .bind(transaction.date)
            .bind(&transaction.description)
            .bind(&transaction.notes)
            .bind(&transaction.category_id)
            .bind(&transaction.source_account_id)
            .bind(&transaction.destination_account_id)
            .bind(transaction.possible_duplicate)
            .bind(transaction.duplicate_of_transaction_id.map(|id| id.as_uuid()))
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(query_failed)?;

        map_row(&row)
    }

    #[instrument(skip(self, patch), fields(transaction_id = %id))]
    async fn update(
        &self,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET possible_duplicate = COALESCE($1, possible_duplicate),
                duplicate_of_transaction_id = COALESCE($2, duplicate_of_transaction_id)
            WHERE id = $3
            "#,
        )
        .bind(patch.possible_duplicate)
        .bind(patch.duplicate_of_transaction_id.map(|id| id.as_uuid()))
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(transaction_id = %id))]
    async fn get_by_id(
        &self,
        id: TransactionId,
    ) -> Result<Option<StoredTransaction>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM transactions WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed)?;

        row.as_ref().map(map_row).transpose()
    }

    #[instrument(skip(self), fields(household_id = %household_id))]
    async fn list_recent(
        &self,
        household_id: HouseholdId,
        limit: usize,
    ) -> Result<Vec<RecentTransaction>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, amount, description, possible_duplicate
            FROM transactions
            WHERE household_id = $1
            ORDER BY date DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(household_id.as_uuid())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter()
            .map(|row| -> Result<RecentTransaction, RepositoryError> {
                Ok(RecentTransaction {
                    id: TransactionId::from_uuid(row.try_get("id").map_err(corrupt_row)?),
                    date: row.try_get("date").map_err(corrupt_row)?,
                    amount: row.try_get("amount").map_err(corrupt_row)?,
                    description: row.try_get("description").map_err(corrupt_row)?,
                    possible_duplicate: row.try_get("possible_duplicate").map_err(corrupt_row)?,
                })
            })
            .collect()
    }
}
