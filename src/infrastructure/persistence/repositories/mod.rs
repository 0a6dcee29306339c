mod in_memory_repository;
mod pg_catalog_repository;
mod pg_transaction_store;

pub use in_memory_repository::InMemoryCatalogRepository;
pub use in_memory_repository::InMemoryTransactionStore;
pub use pg_catalog_repository::PgCatalogRepository;
pub use pg_transaction_store::PgTransactionStore;
