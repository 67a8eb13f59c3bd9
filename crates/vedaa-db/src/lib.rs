//! # vedaa-db: Database Layer for Vedaa Jewellers
//!
//! SQLite storage for everything the pricing engine does NOT own: the
//! jewelry catalogue, per-user settings and the per-day invoice counter.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Vedaa Jewellers Data Flow                          │
//! │                                                                         │
//! │  Counter CLI (quote / invoice / items / settings)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vedaa-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐  ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories    │  │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                  │  │  (embedded)  │  │   │
//! │  │   │               │    │ ItemRepository   │  │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SettingsRepo     │  │ 001_initial  │  │   │
//! │  │   │ WAL, FKs      │    │ InvoiceSequence  │  │  _schema.sql │  │   │
//! │  │   └───────────────┘    └──────────────────┘  └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (vedaa.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Items, settings and invoice sequences
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vedaa_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("vedaa.db")).await?;
//!
//! let rings = db.items().list_filtered(&ItemFilter::category("Rings")).await?;
//! let settings = db.settings().load(DEFAULT_USER_ID).await?;
//! let seq = db.invoice_sequences().next(today).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};

pub use repository::invoice_sequence::InvoiceSequenceRepository;
pub use repository::item::{ItemFilter, ItemRepository};
pub use repository::settings::SettingsRepository;
