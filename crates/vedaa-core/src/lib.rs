//! # vedaa-core: Pure Business Logic for Vedaa Jewellers
//!
//! This crate is the **heart** of the jewellery back office. It turns a
//! per-gram metal rate, a weight and a making charge into a GST-compliant
//! price breakdown, and assembles those breakdowns into printable invoices.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Vedaa Jewellers Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Dashboard / Counter CLI (apps/counter)             │   │
//! │  │    Rate board ──► Price calculator ──► GST invoice ──► Print    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vedaa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │  invoice  │  │  render   │  │   money   │  │   │
//! │  │   │ PriceInput│  │ LineItem  │  │ HTML/text │  │ ₹1,23,456 │  │   │
//! │  │   │ Breakdown │  │ Invoice   │  │ document  │  │ grouping  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vedaa-db (Database Layer)                    │   │
//! │  │           items, user settings, invoice sequences               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Metal, TaxRate, JewelryItem, shop/customer)
//! - [`pricing`] - The GST pricing engine
//! - [`invoice`] - Line items, aggregation, invoice numbers, InvoiceBuilder
//! - [`render`] - Printable invoice document (HTML and plain text)
//! - [`money`] - Locale-aware amount formatting
//! - [`rates`] - Live metal rate shapes and the last-known-good rate board
//! - [`settings`] - User preferences and the explicit pricing context
//! - [`validation`] - Business rule validation for the persistence boundary
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output (invoice suffixes aside)
//! 2. **Exact Decimals**: every amount is a `Decimal`, never an `f64`
//! 3. **Total Engine**: the pricing engine has no error path; bad input is 0
//! 4. **Format Late**: rounding happens only when a value is displayed
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use vedaa_core::pricing::{compute_breakdown, PriceInput};
//! use vedaa_core::types::GstRates;
//!
//! let input = PriceInput::new(
//!     Decimal::from(6850),   // ₹ per gram, 22K
//!     Decimal::from(10),     // grams
//!     Decimal::from(2000),   // making charge
//!     GstRates::jewellery(), // 1.5% CGST + 1.5% SGST
//! );
//! let breakdown = compute_breakdown(&input);
//!
//! assert_eq!(breakdown.base_price(), Decimal::from(70500));
//! assert_eq!(breakdown.total_price(), Decimal::from(72615));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod pricing;
pub mod rates;
pub mod render;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{aggregate, build_line_item, generate_invoice_number, Invoice, InvoiceBuilder, InvoiceLineItem};
pub use money::NumberFormat;
pub use pricing::{compute_breakdown, PriceBreakdown, PriceInput, TaxMode};
pub use settings::{PricingContext, SettingsPatch, UserSettings};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default user for single-operator installs (the shop counter).
pub const DEFAULT_USER_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Largest per-day invoice sequence that still fits the `NNN` suffix.
pub const MAX_DAILY_INVOICE_SEQUENCE: u16 = 999;
