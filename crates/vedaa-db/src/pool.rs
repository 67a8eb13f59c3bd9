//! # Opening the Shop Database
//!
//! One SQLite file per shop, or a private in-memory database for tests.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path) / DbConfig::in_memory()                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await   open pool, apply migrations              │
//! │       │                                                                 │
//! │       ├── db.items()              → ItemRepository                      │
//! │       ├── db.settings()           → SettingsRepository                  │
//! │       └── db.invoice_sequences()  → InvoiceSequenceRepository           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases run in WAL mode so catalogue reads never wait on an
//! invoice counter write; writers queue behind `busy_timeout`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::invoice_sequence::InvoiceSequenceRepository;
use crate::repository::item::ItemRepository;
use crate::repository::settings::SettingsRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the shop's data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// SQLite file, created on first open.
    File(PathBuf),
    /// Private to one connection; gone when the pool closes.
    Memory,
}

/// Database configuration.
///
/// ```rust,ignore
/// let config = DbConfig::new("./vedaa.db").pool_size(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Connections kept open. A counter rarely needs more than a few.
    pub pool_size: u32,

    /// How long a caller waits for a free connection.
    pub acquire_timeout: Duration,

    /// How long SQLite retries a locked database before failing a write.
    pub busy_timeout: Duration,

    /// Apply pending migrations when opening.
    pub migrate_on_open: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            pool_size: 4,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
            migrate_on_open: true,
        }
    }

    /// Fresh, migrated database on a single connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            pool_size: 1,
            ..DbConfig::new(PathBuf::new())
        }
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn migrate_on_open(mut self, migrate: bool) -> Self {
        self.migrate_on_open = migrate;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == DbLocation::Memory
    }

    /// The file path, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            DbLocation::File(path) => Some(path),
            DbLocation::Memory => None,
        }
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            DbLocation::Memory => SqliteConnectOptions::new().in_memory(true),
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
        };
        options.foreign_keys(true).busy_timeout(self.busy_timeout)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.pool_size)
            .acquire_timeout(self.acquire_timeout);

        match self.location {
            // Recycling the only connection would drop the whole database.
            DbLocation::Memory => options.min_connections(1).idle_timeout(None).max_lifetime(None),
            DbLocation::File(_) => options.idle_timeout(Duration::from_secs(600)),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the shop database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?;

        match config.path() {
            Some(path) => info!(path = %path.display(), pool_size = config.pool_size, "Shop database opened"),
            None => debug!("In-memory database opened"),
        }

        let db = Database { pool };
        if config.migrate_on_open {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The jewelry catalogue.
    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    /// Per-user pricing preferences.
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.pool.clone())
    }

    /// Per-day invoice counters.
    pub fn invoice_sequences(&self) -> InvoiceSequenceRepository {
        InvoiceSequenceRepository::new(self.pool.clone())
    }

    pub async fn close(&self) {
        debug!("Closing shop database");
        self.pool.close().await;
    }

    /// Whether the database answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_ready() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(db.items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reapplying_migrations() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.run_migrations().await.unwrap();

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_file_database_persists_across_opens() {
        let path = std::env::temp_dir().join(format!("vedaa-pool-test-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let day = chrono::NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let next = db.invoice_sequences().next(day).await.unwrap();
        assert_eq!(next, 1);
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path).pool_size(1)).await.unwrap();
        assert_eq!(reopened.invoice_sequences().current(day).await.unwrap(), 1);
        reopened.close().await;

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[test]
    fn test_config() {
        let config = DbConfig::new("/tmp/vedaa.db").pool_size(0);
        assert_eq!(config.pool_size, 1);
        assert_eq!(config.path(), Some(Path::new("/tmp/vedaa.db")));
        assert!(!config.is_in_memory());

        let memory = DbConfig::in_memory();
        assert!(memory.is_in_memory());
        assert_eq!(memory.path(), None);
    }
}
