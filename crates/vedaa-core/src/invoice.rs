//! # Invoices
//!
//! Turns priced metals into a GST tax invoice.
//!
//! ## Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MetalDescriptor ─┐                                                     │
//! │  shared weight ───┼──► build_line_item ──► InvoiceLineItem ─┐           │
//! │  shared making ───┤      (compute_breakdown)                │           │
//! │  GstRates ────────┘                                         ▼           │
//! │                                                      aggregate(items)   │
//! │  ShopDetails, CustomerDetails, date, number ──► InvoiceBuilder::build   │
//! │                                                          │              │
//! │                                                          ▼              │
//! │                                                       Invoice           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here can fail. A blank customer still produces an invoice; the
//! renderer prints dashes in the empty fields.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::pricing::{compute_breakdown, PriceBreakdown, PriceInput};
use crate::types::{CustomerDetails, GstRates, MetalDescriptor, ShopDetails};
use crate::MAX_DAILY_INVOICE_SEQUENCE;

// =============================================================================
// Line items
// =============================================================================

/// One row of the invoice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    pub description: String,
    pub hsn_code: String,
    #[ts(type = "string")]
    pub weight_grams: Decimal,
    #[ts(type = "string")]
    pub rate_per_gram: Decimal,
    #[ts(type = "string")]
    pub making_charge: Decimal,
    pub breakdown: PriceBreakdown,
}

/// Prices one metal for the invoice.
///
/// Weight and making charge are shared across the metals offered on one
/// calculator screen; only the rate differs. The breakdown comes from
/// [`compute_breakdown`], so it equals the calculator preview exactly.
pub fn build_line_item(
    metal: &MetalDescriptor,
    shared_weight: Decimal,
    shared_making_charge: Decimal,
    gst: GstRates,
) -> InvoiceLineItem {
    let input = PriceInput::new(metal.rate_per_gram, shared_weight, shared_making_charge, gst);
    InvoiceLineItem {
        description: metal.description.clone(),
        hsn_code: metal.hsn_code.clone(),
        weight_grams: input.weight_grams(),
        rate_per_gram: input.rate_per_gram(),
        making_charge: input.making_charge(),
        breakdown: compute_breakdown(&input),
    }
}

/// Field-wise sum of the line breakdowns. Empty input yields zero.
pub fn aggregate(line_items: &[InvoiceLineItem]) -> PriceBreakdown {
    line_items.iter().map(|item| &item.breakdown).sum()
}

// =============================================================================
// Invoice numbers
// =============================================================================

/// Prefix on every invoice number.
pub const INVOICE_PREFIX: &str = "INV";

/// Formats `INV-YYYYMMDD-NNN`.
///
/// Returns an error when `sequence` does not fit the three-digit suffix.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use vedaa_core::invoice::format_invoice_number;
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
/// assert_eq!(format_invoice_number(date, 7).unwrap(), "INV-20241225-007");
/// ```
pub fn format_invoice_number(date: NaiveDate, sequence: u16) -> CoreResult<String> {
    if sequence > MAX_DAILY_INVOICE_SEQUENCE {
        return Err(CoreError::InvoiceSequenceExhausted {
            date: date.to_string(),
            max: MAX_DAILY_INVOICE_SEQUENCE,
        });
    }
    Ok(render_number(date, sequence))
}

fn render_number(date: NaiveDate, sequence: u16) -> String {
    format!(
        "{}-{:04}{:02}{:02}-{:03}",
        INVOICE_PREFIX,
        date.year(),
        date.month(),
        date.day(),
        sequence
    )
}

/// Generates `INV-YYYYMMDD-NNN` with a random three-digit suffix.
///
/// Suffixes are not checked for uniqueness: two invoices on the same day
/// collide with probability 1/1000. Shops that need unique numbers use the
/// per-day counter in `vedaa-db` with [`format_invoice_number`].
pub fn generate_invoice_number(date: NaiveDate) -> String {
    generate_invoice_number_with(date, &mut rand::thread_rng())
}

/// [`generate_invoice_number`] with a caller-supplied random source.
pub fn generate_invoice_number_with<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> String {
    let suffix: u16 = rng.gen_range(0..=MAX_DAILY_INVOICE_SEQUENCE);
    render_number(date, suffix)
}

/// Checks the `INV-YYYYMMDD-NNN` shape, including a real calendar date.
pub fn is_valid_invoice_number(number: &str) -> bool {
    let mut parts = number.split('-');
    let (Some(prefix), Some(date), Some(seq), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    prefix == INVOICE_PREFIX
        && date.len() == 8
        && date.bytes().all(|b| b.is_ascii_digit())
        && NaiveDate::parse_from_str(date, "%Y%m%d").is_ok()
        && seq.len() == 3
        && seq.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Invoice
// =============================================================================

/// A GST tax invoice, ready for rendering.
///
/// Request-scoped: built, rendered, discarded. `totals` always equals
/// [`aggregate`] over `line_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,
    pub shop: ShopDetails,
    pub customer: CustomerDetails,
    pub gst_rates: GstRates,
    line_items: Vec<InvoiceLineItem>,
    totals: PriceBreakdown,
}

impl Invoice {
    pub fn line_items(&self) -> &[InvoiceLineItem] {
        &self.line_items
    }

    /// Aggregate across all lines (Taxable Amount, CGST, SGST, Grand Total).
    pub fn totals(&self) -> &PriceBreakdown {
        &self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

// =============================================================================
// Invoice Builder
// =============================================================================

/// Fluent assembly of an [`Invoice`].
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use vedaa_core::invoice::InvoiceBuilder;
/// use vedaa_core::types::{GstRates, Metal, MetalDescriptor, ShopDetails};
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
/// let invoice = InvoiceBuilder::new(ShopDetails::default(), GstRates::jewellery())
///     .date(date)
///     .metal(&MetalDescriptor::for_metal(Metal::Gold22k, Decimal::from(6850)), Decimal::from(10), Decimal::from(2000))
///     .build();
///
/// assert_eq!(invoice.totals().total_price(), Decimal::from(72615));
/// assert!(invoice.invoice_number.starts_with("INV-20241225-"));
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceBuilder {
    shop: ShopDetails,
    gst: GstRates,
    customer: CustomerDetails,
    date: Option<NaiveDate>,
    number: Option<String>,
    line_items: Vec<InvoiceLineItem>,
}

impl InvoiceBuilder {
    pub fn new(shop: ShopDetails, gst: GstRates) -> Self {
        InvoiceBuilder {
            shop,
            gst,
            customer: CustomerDetails::default(),
            date: None,
            number: None,
            line_items: Vec::new(),
        }
    }

    pub fn customer(mut self, customer: CustomerDetails) -> Self {
        self.customer = customer;
        self
    }

    /// Invoice date; defaults to today (local) when unset.
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Explicit invoice number (e.g. from the per-day counter).
    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Appends a pre-built line.
    ///
    /// The line is priced again from its rate, weight and making charge with
    /// this invoice's GST rates, so a hand-assembled breakdown can never
    /// disagree with the totals.
    pub fn line_item(mut self, mut item: InvoiceLineItem) -> Self {
        let input = PriceInput::new(item.rate_per_gram, item.weight_grams, item.making_charge, self.gst);
        item.weight_grams = input.weight_grams();
        item.rate_per_gram = input.rate_per_gram();
        item.making_charge = input.making_charge();
        item.breakdown = compute_breakdown(&input);
        self.line_items.push(item);
        self
    }

    /// Prices a metal with this invoice's GST rates and appends it.
    pub fn metal(self, metal: &MetalDescriptor, weight_grams: Decimal, making_charge: Decimal) -> Self {
        let item = build_line_item(metal, weight_grams, making_charge, self.gst);
        self.line_item(item)
    }

    pub fn build(self) -> Invoice {
        let invoice_date = self.date.unwrap_or_else(|| chrono::Local::now().date_naive());
        let invoice_number = self
            .number
            .unwrap_or_else(|| generate_invoice_number(invoice_date));
        let totals = aggregate(&self.line_items);

        debug!(
            invoice_number = %invoice_number,
            lines = self.line_items.len(),
            grand_total = %totals.total_price(),
            "Invoice assembled"
        );

        Invoice {
            invoice_number,
            invoice_date,
            shop: self.shop,
            customer: self.customer,
            gst_rates: self.gst,
            line_items: self.line_items,
            totals,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
