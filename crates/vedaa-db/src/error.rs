//! # Database Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error ──────┐                                                    │
//! │  MigrateError ─────┤                                                    │
//! │  serde_json ───────┼──►  DbError  ──►  CounterError (apps/counter)      │
//! │  ValidationError ──┤                                                    │
//! │  CoreError ────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite reports constraint failures as text, e.g.
//! `UNIQUE constraint failed: jewelry_items.id`; those become `Duplicate`
//! and `Rejected` so callers never parse messages themselves.

use thiserror::Error;
use vedaa_core::{CoreError, ValidationError};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// `column` is `table.column` as SQLite names it.
    #[error("Duplicate value for {column}")]
    Duplicate { column: String },

    /// A CHECK constraint in the schema rejected the row.
    #[error("Rejected by schema: {0}")]
    Rejected(String),

    /// The database file could not be opened or the pool is closed.
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("Database busy, try again")]
    Busy,

    #[error("Migration failed: {0}")]
    Migration(String),

    /// Any other SQL failure.
    #[error("Query failed: {0}")]
    Query(String),

    /// A stored value could not be read back, such as a non-decimal weight.
    #[error("Corrupt {column} in stored row: {value}")]
    CorruptValue { column: String, value: String },

    #[error("Settings document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(column: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::CorruptValue {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether retrying the same call later might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DbError::Busy | DbError::Unavailable(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "(query)"),
            sqlx::Error::Database(db_err) => classify_sqlite_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::Unavailable("pool closed".to_string()),
            sqlx::Error::Io(io) => DbError::Unavailable(io.to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

fn classify_sqlite_message(message: &str) -> DbError {
    if let Some(column) = message.strip_prefix("UNIQUE constraint failed: ") {
        return DbError::Duplicate {
            column: column.to_string(),
        };
    }
    if message.starts_with("CHECK constraint failed") {
        return DbError::Rejected(message.to_string());
    }
    if message.contains("database is locked") {
        return DbError::Busy;
    }
    DbError::Query(message.to_string())
}

pub type DbResult<T> = Result<T, DbError>;
