mod pg_pool;
mod repositories;

pub use repositories::InMemoryCatalogRepository;
pub use repositories::InMemoryTransactionStore;
pub use repositories::PgCatalogRepository;
pub use repositories::PgTransactionStore;

pub use pg_pool::{PoolOptions, create_pool, run_migrations};
