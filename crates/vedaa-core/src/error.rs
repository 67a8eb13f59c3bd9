//! # Error Types
//!
//! Domain-specific error types for vedaa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vedaa-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vedaa-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  counter errors (app)                                                  │
//! │  └── CounterError     - What the operator sees                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine and the invoice builder do not appear here: they are
//! total functions and never return an error. These types cover the
//! boundaries around them (item records, settings, invoice numbering).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Jewelry item cannot be found in the catalogue.
    #[error("Jewelry item not found: {0}")]
    ItemNotFound(String),

    /// Metal code not recognised (expected gold24k, gold22k, gold18k, silver).
    #[error("Unknown metal: {0}")]
    UnknownMetal(String),

    /// The per-day invoice counter ran past the three-digit suffix.
    ///
    /// ## When This Occurs
    /// - Monotonic numbering is enabled and a shop issues its 1000th
    ///   invoice on a single day
    #[error("Invoice sequence exhausted for {date}: at most {max} invoices per day")]
    InvoiceSequenceExhausted { date: String, max: u16 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the strict validators used before persisting a record. The
/// pricing engine never raises these; it coerces bad numbers to zero.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is above the allowed ceiling.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },

    /// Invalid format (e.g., malformed GSTIN, unparseable number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
