use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use ledger_intake::application::ports::{CatalogRepository, TransactionStore};
use ledger_intake::application::services::{
    DuplicateDetector, ExtractionDriver, PageExtractor, StatementImportService,
};
use ledger_intake::infrastructure::document::LopdfPageSegmenter;
use ledger_intake::infrastructure::llm::{
    LlmDuplicateClassifier, VlmTransactionExtractor, create_chat_completion_client,
};
use ledger_intake::infrastructure::observability::{TracingConfig, init_tracing};
use ledger_intake::infrastructure::persistence::{
    InMemoryCatalogRepository, InMemoryTransactionStore, PgCatalogRepository,
    PgTransactionStore, PoolOptions, create_pool, run_migrations,
};
use ledger_intake::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.enable_json,
        level: settings.logging.level.clone(),
    });

    let (store, catalog_repository): (Arc<dyn TransactionStore>, Arc<dyn CatalogRepository>) =
        match &settings.database {
            Some(database) => {
                let options = PoolOptions {
                    max_connections: database.max_connections,
                    acquire_timeout: Duration::from_secs(database.acquire_timeout_seconds),
                    connect_attempts: database.connect_attempts,
                };
                let pool = create_pool(&database.url, options)
                    .await
                    .context("Failed to connect to the ledger database")?;
                run_migrations(&pool)
                    .await
                    .context("Failed to apply migrations")?;
                (
                    Arc::new(PgTransactionStore::new(pool.clone())),
                    Arc::new(PgCatalogRepository::new(pool)),
                )
            }
            None => {
                tracing::warn!("No database configured, using in-memory stores");
                (
                    Arc::new(InMemoryTransactionStore::new()),
                    Arc::new(InMemoryCatalogRepository::new()),
                )
            }
        };

    let extraction_client =
        create_chat_completion_client(&settings.llm, &settings.llm.extraction_model)?;
    let duplicate_client =
        create_chat_completion_client(&settings.llm, &settings.llm.duplicate_model)?;

    let detector = DuplicateDetector::new(Arc::new(LlmDuplicateClassifier::new(duplicate_client)));
    let page_extractor = Arc::new(PageExtractor::new(
        Arc::new(VlmTransactionExtractor::new(extraction_client)),
        detector,
    ));
    let segmenter = Arc::new(LopdfPageSegmenter::new(settings.import.max_pages));
    let driver = Arc::new(ExtractionDriver::new(segmenter, page_extractor));

    let import_service = Arc::new(StatementImportService::new(
        driver,
        store,
        catalog_repository,
        settings.import.recent_transactions_limit,
        settings.import.chunk_buffer,
    ));

    let router = create_router(AppState::new(import_service, settings.import.clone()));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        address = %addr,
        environment = %environment,
        provider = %settings.llm.provider,
        "Listening"
    );

    axum::serve(listener, router).await?;

    Ok(())
}
