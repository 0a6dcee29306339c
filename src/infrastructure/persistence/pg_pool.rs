use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::{info, instrument, warn};

use crate::application::ports::RepositoryError;

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Connection pool sizing and startup retry budget.
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub connect_attempts: u32,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
            connect_attempts: 6,
        }
    }
}

/// Opens the ledger pool, backing off between attempts while the database comes up.
#[instrument(skip(url))]
pub async fn create_pool(url: &str, options: PoolOptions) -> Result<PgPool, RepositoryError> {
    let attempts = options.connect_attempts.max(1);
    let mut backoff = INITIAL_BACKOFF;

    for attempt in 1..=attempts {
        let connected = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(url)
            .await;

        match connected {
            Ok(pool) => {
                info!(
                    max_connections = options.max_connections,
                    attempt, "Ledger database pool ready"
                );
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(
                    error = %e,
                    attempt,
                    attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    "Ledger database unreachable, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            Err(e) => return Err(RepositoryError::ConnectionFailed(e.to_string())),
        }
    }

    Err(RepositoryError::ConnectionFailed(
        "no connection attempts were made".to_string(),
    ))
}

/// Applies the embedded ledger migrations.
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(format!("migration failed: {e}")))?;
    info!("Database migrations applied");
    Ok(())
}
