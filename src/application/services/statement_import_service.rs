use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{CatalogRepository, RepositoryError, TransactionStore};
use crate::domain::{
    ExtractionCatalog, HouseholdId, ImportChunk, RecentTransaction, StatementDocument,
};

use super::extraction_driver::ExtractionDriver;
use super::persistence_coordinator::{ImportSummary, PersistenceCoordinator};

/// Read-only inputs fetched once before a run starts.
#[derive(Debug, Clone, Default)]
pub struct ImportContext {
    pub catalog: ExtractionCatalog,
    pub recent: Vec<RecentTransaction>,
}

pub struct ImportRun {
    pub chunks: mpsc::Receiver<ImportChunk>,
    pub handle: tokio::task::JoinHandle<ImportSummary>,
}

pub struct StatementImportService {
    driver: Arc<ExtractionDriver>,
    store: Arc<dyn TransactionStore>,
    catalog_repository: Arc<dyn CatalogRepository>,
    recent_transactions_limit: usize,
    chunk_buffer: usize,
}

impl StatementImportService {
    pub fn new(
        driver: Arc<ExtractionDriver>,
        store: Arc<dyn TransactionStore>,
        catalog_repository: Arc<dyn CatalogRepository>,
        recent_transactions_limit: usize,
        chunk_buffer: usize,
    ) -> Self {
        Self {
            driver,
            store,
            catalog_repository,
            recent_transactions_limit,
            chunk_buffer: chunk_buffer.max(1),
        }
    }

    pub async fn load_context(
        &self,
        household_id: HouseholdId,
    ) -> Result<ImportContext, StatementImportError> {
        let categories = self
            .catalog_repository
            .list_categories(household_id)
            .await
            .map_err(StatementImportError::Catalog)?;
        let accounts = self
            .catalog_repository
            .list_accounts(household_id)
            .await
            .map_err(StatementImportError::Catalog)?;
        let recent = self
            .store
            .list_recent(household_id, self.recent_transactions_limit)
            .await
            .map_err(StatementImportError::RecentTransactions)?;

        Ok(ImportContext {
            catalog: ExtractionCatalog::new(categories, accounts),
            recent,
        })
    }

    pub async fn import(
        &self,
        household_id: HouseholdId,
        document: StatementDocument,
    ) -> Result<ImportRun, StatementImportError> {
        let context = self.load_context(household_id).await?;
        Ok(self.start(household_id, document, context))
    }

    /// Spawns the run; chunks arrive on the returned receiver in production
    /// order and the channel closes after the terminal chunk.
    pub fn start(
        &self,
        household_id: HouseholdId,
        document: StatementDocument,
        context: ImportContext,
    ) -> ImportRun {
        let span = tracing::info_span!(
            "statement_import",
            household_id = %household_id,
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
            content_type = document.content_type.as_mime(),
        );

        let (sender, receiver) = mpsc::channel(self.chunk_buffer);
        let coordinator =
            PersistenceCoordinator::new(Arc::clone(&self.store), household_id, &context.recent);
        let events = self
            .driver
            .events(document, context.catalog, context.recent);

        let handle = tokio::spawn(coordinator.run(events, sender).instrument(span));

        ImportRun {
            chunks: receiver,
            handle,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StatementImportError {
    #[error("catalog: {0}")]
    Catalog(RepositoryError),
    #[error("recent transactions: {0}")]
    RecentTransactions(RepositoryError),
}
