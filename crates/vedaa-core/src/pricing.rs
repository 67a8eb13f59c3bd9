//! # Pricing Engine
//!
//! Converts a per-gram metal rate, an item weight and a making charge into a
//! GST price breakdown.
//!
//! ## The Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PriceInput                                                             │
//! │    rate_per_gram ─┐                                                     │
//! │    weight_grams ──┼──► base  = weight × rate + making                   │
//! │    making_charge ─┘        │                                            │
//! │                            ├──► cgst  = base × cgst% / 100              │
//! │                            ├──► sgst  = base × sgst% / 100              │
//! │                            │    total_tax = cgst + sgst                 │
//! │                            └──► total = base + total_tax                │
//! │                                                                         │
//! │  No rounding here. The calculator preview, the invoice line and the     │
//! │  invoice totals all read the same exact decimals; only the formatter    │
//! │  rounds, and only for display.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Graceful Degradation
//! The engine is total. Negative, missing, non-numeric or non-finite inputs
//! become 0 before they reach the formulas, so a half-typed calculator form
//! still renders a price.

use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::rates::MetalRates;
use crate::types::{GstRates, Metal, MetalDescriptor};

// =============================================================================
// Lenient numeric input
// =============================================================================

/// Parses a form field into a non-negative amount.
///
/// Blank, non-numeric and negative input all yield `0`. Scientific notation
/// (`1e3`) is accepted.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use vedaa_core::pricing::parse_amount;
///
/// assert_eq!(parse_amount("5.25"), Decimal::new(525, 2));
/// assert_eq!(parse_amount(""), Decimal::ZERO);
/// assert_eq!(parse_amount("ten"), Decimal::ZERO);
/// assert_eq!(parse_amount("-4"), Decimal::ZERO);
/// ```
pub fn parse_amount(raw: &str) -> Decimal {
    let raw = raw.trim().replace(',', "");
    let parsed = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .unwrap_or(Decimal::ZERO);
    non_negative(parsed)
}

/// Converts a float from a JSON/UI boundary into a non-negative amount.
///
/// `NaN`, infinities and negative values yield `0`.
pub fn amount_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    non_negative(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
}

/// Parses an optional form field; `None` behaves like a blank field.
pub fn parse_optional_amount(raw: Option<&str>) -> Decimal {
    raw.map(parse_amount).unwrap_or(Decimal::ZERO)
}

#[inline]
fn non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

// =============================================================================
// Price Input
// =============================================================================

/// Inputs for one price calculation.
///
/// Built fresh for every calculation request and never mutated. Deserialized
/// inputs go through [`PriceInput::new`] like every other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", from = "PriceInputFields")]
pub struct PriceInput {
    #[ts(type = "string")]
    rate_per_gram: Decimal,
    #[ts(type = "string")]
    weight_grams: Decimal,
    #[ts(type = "string")]
    making_charge: Decimal,
    gst: GstRates,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceInputFields {
    rate_per_gram: Decimal,
    weight_grams: Decimal,
    making_charge: Decimal,
    gst: GstRates,
}

impl From<PriceInputFields> for PriceInput {
    fn from(fields: PriceInputFields) -> Self {
        PriceInput::new(fields.rate_per_gram, fields.weight_grams, fields.making_charge, fields.gst)
    }
}

impl PriceInput {
    /// Creates a price input, coercing negative amounts to zero.
    pub fn new(rate_per_gram: Decimal, weight_grams: Decimal, making_charge: Decimal, gst: GstRates) -> Self {
        PriceInput {
            rate_per_gram: non_negative(rate_per_gram),
            weight_grams: non_negative(weight_grams),
            making_charge: non_negative(making_charge),
            gst,
        }
    }

    /// Creates a price input from raw form fields.
    ///
    /// Blank or malformed weight/making fields behave exactly like `"0"`.
    pub fn from_form(rate_per_gram: &str, weight_grams: &str, making_charge: &str, gst: GstRates) -> Self {
        PriceInput {
            rate_per_gram: parse_amount(rate_per_gram),
            weight_grams: parse_amount(weight_grams),
            making_charge: parse_amount(making_charge),
            gst,
        }
    }

    pub fn rate_per_gram(&self) -> Decimal {
        self.rate_per_gram
    }

    pub fn weight_grams(&self) -> Decimal {
        self.weight_grams
    }

    pub fn making_charge(&self) -> Decimal {
        self.making_charge
    }

    pub fn gst(&self) -> GstRates {
        self.gst
    }
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// The result of a price calculation.
///
/// Fields are read-only; a breakdown is only ever produced by
/// [`compute_breakdown`] or by summing other breakdowns, so the relations
/// `total_tax = cgst + sgst` and `total = base + total_tax` always hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    #[ts(type = "string")]
    base_price: Decimal,
    #[ts(type = "string")]
    cgst_amount: Decimal,
    #[ts(type = "string")]
    sgst_amount: Decimal,
    #[ts(type = "string")]
    total_tax: Decimal,
    #[ts(type = "string")]
    total_price: Decimal,
}

impl PriceBreakdown {
    /// The all-zero breakdown (aggregate of nothing).
    pub const fn zero() -> Self {
        PriceBreakdown {
            base_price: Decimal::ZERO,
            cgst_amount: Decimal::ZERO,
            sgst_amount: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            total_price: Decimal::ZERO,
        }
    }

    /// Pre-tax price: metal value plus making charge.
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn cgst_amount(&self) -> Decimal {
        self.cgst_amount
    }

    pub fn sgst_amount(&self) -> Decimal {
        self.sgst_amount
    }

    pub fn total_tax(&self) -> Decimal {
        self.total_tax
    }

    /// GST-inclusive price.
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Price to show for the current GST display toggle.
    ///
    /// A selector over values that are already computed: flipping the toggle
    /// never recomputes anything.
    pub fn displayed_price(&self, mode: TaxMode) -> Decimal {
        match mode {
            TaxMode::Inclusive => self.total_price,
            TaxMode::Exclusive => self.base_price,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == PriceBreakdown::zero()
    }
}

/// Field-wise sum.
impl Add for PriceBreakdown {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        PriceBreakdown {
            base_price: self.base_price.saturating_add(other.base_price),
            cgst_amount: self.cgst_amount.saturating_add(other.cgst_amount),
            sgst_amount: self.sgst_amount.saturating_add(other.sgst_amount),
            total_tax: self.total_tax.saturating_add(other.total_tax),
            total_price: self.total_price.saturating_add(other.total_price),
        }
    }
}

impl Sum for PriceBreakdown {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(PriceBreakdown::zero(), Add::add)
    }
}

impl<'a> Sum<&'a PriceBreakdown> for PriceBreakdown {
    fn sum<I: Iterator<Item = &'a PriceBreakdown>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Tax display mode
// =============================================================================

/// Which price the calculator surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Show the GST-inclusive total (the counter default).
    #[default]
    Inclusive,
    /// Show the pre-tax base price.
    Exclusive,
}

impl TaxMode {
    pub fn from_inclusive_flag(inclusive: bool) -> Self {
        if inclusive {
            TaxMode::Inclusive
        } else {
            TaxMode::Exclusive
        }
    }
}

// =============================================================================
// The engine
// =============================================================================

/// Computes the GST breakdown for one input.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use vedaa_core::pricing::{compute_breakdown, PriceInput};
/// use vedaa_core::types::GstRates;
///
/// let input = PriceInput::from_form("5600", "5.25", "", GstRates::jewellery());
/// let breakdown = compute_breakdown(&input);
///
/// assert_eq!(breakdown.base_price(), Decimal::from(29400));
/// assert_eq!(breakdown.cgst_amount(), Decimal::from(441));
/// assert_eq!(breakdown.total_price(), Decimal::from(30282));
/// ```
pub fn compute_breakdown(input: &PriceInput) -> PriceBreakdown {
    let metal_value = input.weight_grams.saturating_mul(input.rate_per_gram);
    let base_price = metal_value.saturating_add(input.making_charge);

    let cgst_amount = percent_of(base_price, input.gst.cgst.percent());
    let sgst_amount = percent_of(base_price, input.gst.sgst.percent());
    let total_tax = cgst_amount.saturating_add(sgst_amount);
    let total_price = base_price.saturating_add(total_tax);

    PriceBreakdown {
        base_price,
        cgst_amount,
        sgst_amount,
        total_tax,
        total_price,
    }
}

fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount.saturating_mul(percent) / Decimal::ONE_HUNDRED
}

// =============================================================================
// Calculator preview
// =============================================================================

/// One row of the live price calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub metal: Metal,
    pub descriptor: MetalDescriptor,
    pub breakdown: PriceBreakdown,
}

impl PriceQuote {
    pub fn displayed_price(&self, mode: TaxMode) -> Decimal {
        self.breakdown.displayed_price(mode)
    }
}

/// Prices the same weight/making pair against every metal on the board.
///
/// Each row goes through [`compute_breakdown`], the same path the invoice
/// uses, so the preview and a later invoice line agree exactly.
pub fn quote_metals(rates: &MetalRates, weight_grams: Decimal, making_charge: Decimal, gst: GstRates) -> Vec<PriceQuote> {
    Metal::ALL
        .iter()
        .map(|&metal| {
            let descriptor = rates.descriptor(metal);
            let input = PriceInput::new(descriptor.rate_per_gram, weight_grams, making_charge, gst);
            PriceQuote {
                metal,
                breakdown: compute_breakdown(&input),
                descriptor,
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gold22k_scenario() -> PriceBreakdown {
        compute_breakdown(&PriceInput::new(dec!(6850), dec!(10), dec!(2000), GstRates::jewellery()))
    }

    #[test]
    fn test_gold_22k_scenario() {
        let b = gold22k_scenario();
        assert_eq!(b.base_price(), dec!(70500));
        assert_eq!(b.cgst_amount(), dec!(1057.5));
        assert_eq!(b.sgst_amount(), dec!(1057.5));
        assert_eq!(b.total_tax(), dec!(2115));
        assert_eq!(b.total_price(), dec!(72615));
    }

    #[test]
    fn test_gold_18k_no_making_scenario() {
        let b = compute_breakdown(&PriceInput::new(dec!(5600), dec!(5.25), dec!(0), GstRates::jewellery()));
        assert_eq!(b.base_price(), dec!(29400));
        assert_eq!(b.cgst_amount(), dec!(441));
        assert_eq!(b.sgst_amount(), dec!(441));
        assert_eq!(b.total_price(), dec!(30282));
    }

    #[test]
    fn test_silver_scenario() {
        let b = compute_breakdown(&PriceInput::new(dec!(92), dec!(45), dec!(1200), GstRates::jewellery()));
        assert_eq!(b.base_price(), dec!(5340));
        assert_eq!(b.cgst_amount(), dec!(80.1));
        assert_eq!(b.total_price(), dec!(5500.2));
    }

    #[test]
    fn test_malformed_form_fields_behave_as_zero() {
        let gst = GstRates::jewellery();
        let blank = compute_breakdown(&PriceInput::from_form("6850", "", "abc", gst));
        let zero = compute_breakdown(&PriceInput::from_form("6850", "0", "0", gst));
        assert_eq!(blank, zero);
        assert!(blank.is_zero());
    }

    #[test]
    fn test_negative_inputs_coerced_to_zero() {
        let input = PriceInput::new(dec!(-10), dec!(5), dec!(-300), GstRates::jewellery());
        assert_eq!(input.rate_per_gram(), Decimal::ZERO);
        assert_eq!(input.making_charge(), Decimal::ZERO);
        assert_eq!(input.weight_grams(), dec!(5));
    }

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount(" 6,850 "), dec!(6850));
        assert_eq!(parse_amount("1e3"), dec!(1000));
        assert_eq!(parse_amount("NaN"), Decimal::ZERO);
        assert_eq!(parse_optional_amount(None), Decimal::ZERO);
    }

    #[test]
    fn test_amount_from_f64_rejects_non_finite() {
        assert_eq!(amount_from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(amount_from_f64(f64::INFINITY), Decimal::ZERO);
        assert_eq!(amount_from_f64(-1.0), Decimal::ZERO);
        assert_eq!(amount_from_f64(5.25), dec!(5.25));
    }

    #[test]
    fn test_displayed_price_toggle() {
        let b = gold22k_scenario();
        assert_eq!(b.displayed_price(TaxMode::Inclusive), dec!(72615));
        assert_eq!(b.displayed_price(TaxMode::Exclusive), dec!(70500));
        // Selecting does not touch the breakdown
        assert_eq!(b, gold22k_scenario());
    }

    #[test]
    fn test_zero_tax_rates() {
        let gst = GstRates::new(crate::types::TaxRate::zero(), crate::types::TaxRate::zero());
        let b = compute_breakdown(&PriceInput::new(dec!(100), dec!(2), dec!(50), gst));
        assert_eq!(b.base_price(), dec!(250));
        assert_eq!(b.total_price(), dec!(250));
    }

    #[test]
    fn test_huge_inputs_saturate_instead_of_panicking() {
        let input = PriceInput::new(Decimal::MAX, Decimal::MAX, Decimal::MAX, GstRates::jewellery());
        let b = compute_breakdown(&input);
        assert_eq!(b.base_price(), Decimal::MAX);
    }

    #[test]
    fn test_sum_of_breakdowns() {
        let a = gold22k_scenario();
        let total: PriceBreakdown = [a, a].iter().sum();
        assert_eq!(total.base_price(), dec!(141000));
        assert_eq!(total.total_price(), dec!(145230));

        let empty: PriceBreakdown = Vec::<PriceBreakdown>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_quote_metals_covers_board() {
        let rates = MetalRates::new(dec!(7470), dec!(6850), dec!(5600), dec!(92));
        let quotes = quote_metals(&rates, dec!(10), dec!(2000), GstRates::jewellery());

        assert_eq!(quotes.len(), 4);
        let gold22k = quotes.iter().find(|q| q.metal == Metal::Gold22k).unwrap();
        assert_eq!(gold22k.breakdown, gold22k_scenario());
        assert_eq!(gold22k.descriptor.hsn_code, "7113");
        assert_eq!(gold22k.displayed_price(TaxMode::Exclusive), dec!(70500));
    }

    #[test]
    fn test_deserialized_input_is_clamped() {
        let json = r#"{
            "ratePerGram": "6850",
            "weightGrams": "-10",
            "makingCharge": "-2000",
            "gst": { "cgst": "-1.5", "sgst": "1.5" }
        }"#;
        let input: PriceInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.weight_grams(), Decimal::ZERO);
        assert_eq!(input.making_charge(), Decimal::ZERO);
        assert!(input.gst().cgst.is_zero());
        assert_eq!(input.gst().sgst.percent(), dec!(1.5));

        let b = compute_breakdown(&input);
        assert!(b.total_price() >= Decimal::ZERO);
        assert!(b.is_zero());
    }

    #[test]
    fn test_serialized_input_reads_back() {
        let input = PriceInput::new(dec!(6850), dec!(10), dec!(2000), GstRates::jewellery());
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(serde_json::from_str::<PriceInput>(&json).unwrap(), input);
    }
}
