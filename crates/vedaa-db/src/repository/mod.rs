//! # Repository Module
//!
//! One repository per table, each holding a clone of the pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.items()              ItemRepository                                 │
//! │  ├── list / list_filtered(category, status, query)                      │
//! │  ├── get / add / update(patch) / delete                                 │
//! │  └── count                                                              │
//! │                                                                         │
//! │  db.settings()           SettingsRepository                             │
//! │  └── load (defaults when absent) / save / update(patch) / reset         │
//! │                                                                         │
//! │  db.invoice_sequences()  InvoiceSequenceRepository                      │
//! │  └── next(date) → 1..=999, atomically                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are built at runtime with `query_as::<_, Row>`; decimals travel
//! as TEXT and are parsed back into `Decimal` when a row is mapped.

pub mod invoice_sequence;
pub mod item;
pub mod settings;
