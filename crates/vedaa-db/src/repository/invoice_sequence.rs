//! # Invoice Sequence Repository
//!
//! Monotonic per-day counter behind `INV-YYYYMMDD-NNN` numbers.
//!
//! ## One Statement, No Race
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INSERT (day, 1)                                                        │
//! │  ON CONFLICT(day) DO UPDATE SET last_value = last_value + 1             │
//! │                     WHERE last_value < 999                              │
//! │  RETURNING last_value                                                   │
//! │                                                                         │
//! │  first call of the day   → 1                                            │
//! │  later calls             → previous + 1                                 │
//! │  after 999               → no row returned → InvoiceSequenceExhausted   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The increment and read happen in a single SQLite statement, so two
//! counter sessions can never receive the same number.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use vedaa_core::invoice::format_invoice_number;
use vedaa_core::{CoreError, MAX_DAILY_INVOICE_SEQUENCE};

use crate::error::DbResult;

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Repository for `invoice_sequences`.
#[derive(Debug, Clone)]
pub struct InvoiceSequenceRepository {
    pool: SqlitePool,
}

impl InvoiceSequenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceSequenceRepository { pool }
    }

    /// Reserves the next sequence number for `date` (1..=999).
    pub async fn next(&self, date: NaiveDate) -> DbResult<u16> {
        let day = day_key(date);

        let issued: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_sequences (day, last_value) VALUES (?1, 1)
            ON CONFLICT(day) DO UPDATE SET last_value = last_value + 1
                WHERE last_value < ?2
            RETURNING last_value
            "#,
        )
        .bind(&day)
        .bind(i64::from(MAX_DAILY_INVOICE_SEQUENCE))
        .fetch_optional(&self.pool)
        .await?;

        match issued.and_then(|v| u16::try_from(v).ok()) {
            Some(value) => {
                debug!(day = %day, sequence = value, "Invoice sequence reserved");
                Ok(value)
            }
            None => {
                warn!(day = %day, "Invoice sequence exhausted");
                Err(CoreError::InvoiceSequenceExhausted {
                    date: day,
                    max: MAX_DAILY_INVOICE_SEQUENCE,
                }
                .into())
            }
        }
    }

    /// Reserves the next number and formats it as `INV-YYYYMMDD-NNN`.
    pub async fn next_invoice_number(&self, date: NaiveDate) -> DbResult<String> {
        let sequence = self.next(date).await?;
        Ok(format_invoice_number(date, sequence)?)
    }

    /// Last number issued for `date`, 0 if none.
    pub async fn current(&self, date: NaiveDate) -> DbResult<u16> {
        let last: Option<i64> = sqlx::query_scalar("SELECT last_value FROM invoice_sequences WHERE day = ?1")
            .bind(day_key(date))
            .fetch_optional(&self.pool)
            .await?;

        Ok(last.and_then(|v| u16::try_from(v).ok()).unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> InvoiceSequenceRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().invoice_sequences()
    }

    fn christmas() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
    }

    #[tokio::test]
    async fn test_sequence_starts_at_one_and_increments() {
        let repo = repo().await;
        assert_eq!(repo.current(christmas()).await.unwrap(), 0);
        assert_eq!(repo.next(christmas()).await.unwrap(), 1);
        assert_eq!(repo.next(christmas()).await.unwrap(), 2);
        assert_eq!(repo.current(christmas()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sequences_are_per_day() {
        let repo = repo().await;
        let boxing_day = christmas().succ_opt().unwrap();
        repo.next(christmas()).await.unwrap();
        repo.next(christmas()).await.unwrap();
        assert_eq!(repo.next(boxing_day).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_next_invoice_number_format() {
        let repo = repo().await;
        assert_eq!(repo.next_invoice_number(christmas()).await.unwrap(), "INV-20241225-001");
        assert_eq!(repo.next_invoice_number(christmas()).await.unwrap(), "INV-20241225-002");
    }

    #[tokio::test]
    async fn test_exhausted_after_999() {
        let repo = repo().await;
        sqlx::query("INSERT INTO invoice_sequences (day, last_value) VALUES (?1, ?2)")
            .bind("2024-12-25")
            .bind(998_i64)
            .execute(&repo.pool)
            .await
            .unwrap();

        assert_eq!(repo.next(christmas()).await.unwrap(), 999);
        let err = repo.next(christmas()).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvoiceSequenceExhausted { max: 999, .. })
        ));
        assert_eq!(repo.current(christmas()).await.unwrap(), 999);
    }
}
