use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::{DbService, SqliteStore};
use crate::reporting::Reporter;
use crate::scheduling::Scheduler;
use crate::utils::AppError;

/// Server state shared by every handler
///
/// Immutable after startup. Cloning is cheap: the pool is reference counted
/// and the config is only a handful of strings.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | configuration (read only) |
/// | pool | SqlitePool | SQLite connection pool |
/// | store | SqliteStore | record store handed to the core services |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    store: SqliteStore,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let store = SqliteStore::new(pool.clone());
        Self {
            config,
            pool,
            store,
        }
    }

    /// Create the working directory and open the database
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to create work dir {}: {e}",
                config.work_dir
            ))
        })?;

        let db = DbService::new(&config.database_path).await?;
        tracing::info!(path = %config.database_path, "Server state initialized");
        Ok(Self::new(config.clone(), db.pool))
    }

    /// State over a private in-memory database
    pub async fn in_memory(config: Config) -> Result<Self, AppError> {
        let db = DbService::open_in_memory().await?;
        Ok(Self::new(config, db.pool))
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn scheduler(&self) -> Scheduler<'_, SqliteStore> {
        Scheduler::new(&self.store, &self.config)
    }

    pub fn reporter(&self) -> Reporter<'_, SqliteStore> {
        Reporter::new(&self.store, &self.config)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        DbService {
            pool: self.pool.clone(),
        }
        .ping()
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_creates_work_dir_and_database() {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = dir.path().join("nested");
        let config = Config {
            work_dir: work_dir.to_string_lossy().into_owned(),
            database_path: work_dir.join("salon.db").to_string_lossy().into_owned(),
            ..Config::default()
        };

        let state = ServerState::initialize(&config).await.unwrap();
        assert!(work_dir.join("salon.db").exists());
        state.ping().await.unwrap();
    }

    #[tokio::test]
    async fn in_memory_state_serves_empty_schedule() {
        let state = ServerState::in_memory(Config::default()).await.unwrap();
        let day = state.scheduler().day_schedule(1, "2024-03-15").await.unwrap();
        assert!(day.is_empty());
    }
}
