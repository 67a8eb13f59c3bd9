//! # Money Formatting
//!
//! Display-time formatting for rupee amounts.
//!
//! ## Format Late, Never Mutate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PriceBreakdown (exact)          Display (rounded copy)                 │
//! │  ────────────────────            ──────────────────────                 │
//! │  1057.5                  ──►     ₹1,057.5                               │
//! │  123456.789              ──►     ₹1,23,456.79   (en-IN grouping)        │
//! │  72615.00                ──►     ₹72,615        (trailing zeros drop)   │
//! │                                                                         │
//! │  The decimal stored in the breakdown is never touched; every consumer   │
//! │  formats its own copy, so preview, invoice and totals agree.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use vedaa_core::money::NumberFormat;
//!
//! let fmt = NumberFormat::inr();
//! assert_eq!(fmt.format_currency(Decimal::new(12345678, 2)), "₹1,23,456.78");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Maximum fraction digits shown for any amount.
pub const MAX_FRACTION_DIGITS: u32 = 2;

// =============================================================================
// Grouping
// =============================================================================

/// Thousands grouping style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// Lakh/crore grouping: 1,23,45,678
    #[default]
    Indian,
    /// Groups of three: 12,345,678
    Western,
}

// =============================================================================
// Number Format
// =============================================================================

/// Currency symbol plus grouping style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NumberFormat {
    pub symbol: String,
    pub grouping: Grouping,
}

impl NumberFormat {
    /// Indian rupee, en-IN grouping.
    pub fn inr() -> Self {
        NumberFormat {
            symbol: "₹".to_string(),
            grouping: Grouping::Indian,
        }
    }

    /// Format for a settings currency code. Unknown codes print the code.
    ///
    /// Only the symbol and grouping change; amounts are never converted.
    pub fn for_currency(code: &str) -> Self {
        let (symbol, grouping) = match code.trim().to_ascii_uppercase().as_str() {
            "INR" => ("₹", Grouping::Indian),
            "USD" => ("$", Grouping::Western),
            "EUR" => ("€", Grouping::Western),
            "GBP" => ("£", Grouping::Western),
            "AED" => ("د.إ", Grouping::Western),
            other => {
                return NumberFormat {
                    symbol: format!("{} ", other),
                    grouping: Grouping::Western,
                }
            }
        };
        NumberFormat {
            symbol: symbol.to_string(),
            grouping,
        }
    }

    /// Grouped amount without symbol, at most 2 fraction digits.
    pub fn format_amount(&self, value: Decimal) -> String {
        let rounded = value
            .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        if rounded.is_zero() {
            return "0".to_string();
        }

        let text = rounded.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (text.as_str(), None),
        };

        let mut out = String::with_capacity(text.len() + 8);
        if rounded.is_sign_negative() {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.grouping));
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }
        out
    }

    /// Amount with the currency symbol, e.g. `₹72,615`.
    pub fn format_currency(&self, value: Decimal) -> String {
        let amount = self.format_amount(value);
        match amount.strip_prefix('-') {
            Some(abs) => format!("-{}{}", self.symbol, abs),
            None => format!("{}{}", self.symbol, amount),
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::inr()
    }
}

/// Inserts group separators into a run of ASCII digits.
fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let step = match grouping {
        Grouping::Indian => 2,
        Grouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(step);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

/// Weight as typed: trailing zeros dropped, no grouping (e.g. `5.25`).
pub fn format_weight(grams: Decimal) -> String {
    grams.normalize().to_string()
}

// =============================================================================
// Price Rounding (display preference)
// =============================================================================

/// Optional rounding of the calculator's displayed price.
///
/// Applied to a displayed copy only; invoices always carry exact amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PriceRounding {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "nearest-10")]
    Nearest10,
    #[serde(rename = "nearest-50")]
    Nearest50,
    #[serde(rename = "nearest-100")]
    Nearest100,
    #[serde(rename = "nearest-500")]
    Nearest500,
}

impl PriceRounding {
    fn step(&self) -> Option<Decimal> {
        match self {
            PriceRounding::None => None,
            PriceRounding::Nearest10 => Some(Decimal::TEN),
            PriceRounding::Nearest50 => Some(Decimal::from(50)),
            PriceRounding::Nearest100 => Some(Decimal::ONE_HUNDRED),
            PriceRounding::Nearest500 => Some(Decimal::from(500)),
        }
    }

    /// Rounds half away from zero to the configured step.
    ///
    /// At the edge of the `Decimal` range, where rounding up would overflow,
    /// the value is rounded toward zero instead.
    pub fn apply(&self, value: Decimal) -> Decimal {
        let Some(step) = self.step() else {
            return value;
        };
        let steps = value / step;
        steps
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(step)
            .unwrap_or_else(|| steps.trunc() * step)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_indian_grouping() {
        let fmt = NumberFormat::inr();
        assert_eq!(fmt.format_amount(dec!(72615)), "72,615");
        assert_eq!(fmt.format_amount(dec!(123456.789)), "1,23,456.79");
        assert_eq!(fmt.format_amount(dec!(12345678)), "1,23,45,678");
        assert_eq!(fmt.format_amount(dec!(999)), "999");
        assert_eq!(fmt.format_amount(dec!(1000)), "1,000");
    }

    #[test]
    fn test_western_grouping() {
        let fmt = NumberFormat::for_currency("USD");
        assert_eq!(fmt.format_amount(dec!(12345678)), "12,345,678");
        assert_eq!(fmt.format_currency(dec!(1234.5)), "$1,234.5");
    }

    #[test]
    fn test_fraction_digits() {
        let fmt = NumberFormat::inr();
        assert_eq!(fmt.format_amount(dec!(1057.50)), "1,057.5");
        assert_eq!(fmt.format_amount(dec!(0.005)), "0.01");
        assert_eq!(fmt.format_amount(dec!(5500.20)), "5,500.2");
        assert_eq!(fmt.format_amount(dec!(0.001)), "0");
    }

    #[test]
    fn test_currency_symbol_and_sign() {
        let fmt = NumberFormat::inr();
        assert_eq!(fmt.format_currency(dec!(72615)), "₹72,615");
        assert_eq!(fmt.format_currency(dec!(-1500)), "-₹1,500");
        assert_eq!(fmt.format_currency(Decimal::ZERO), "₹0");
    }

    #[test]
    fn test_unknown_currency_code() {
        let fmt = NumberFormat::for_currency("jpy");
        assert_eq!(fmt.format_currency(dec!(100)), "JPY 100");
    }

    #[test]
    fn test_formatting_does_not_mutate() {
        let value = dec!(1057.555);
        let _ = NumberFormat::inr().format_amount(value);
        assert_eq!(value, dec!(1057.555));
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(dec!(5.250)), "5.25");
        assert_eq!(format_weight(dec!(10)), "10");
    }

    #[test]
    fn test_price_rounding() {
        assert_eq!(PriceRounding::None.apply(dec!(72615)), dec!(72615));
        assert_eq!(PriceRounding::Nearest10.apply(dec!(72615)), dec!(72620));
        assert_eq!(PriceRounding::Nearest100.apply(dec!(72615)), dec!(72600));
        assert_eq!(PriceRounding::Nearest500.apply(dec!(72615)), dec!(72500));
        assert_eq!(PriceRounding::Nearest50.apply(dec!(5524.9)), dec!(5500));
    }

    #[test]
    fn test_price_rounding_at_decimal_limits() {
        let top = PriceRounding::Nearest10.apply(Decimal::MAX);
        assert!(top <= Decimal::MAX && top > Decimal::MAX - dec!(10));
        assert_eq!(top % dec!(10), Decimal::ZERO);

        let bottom = PriceRounding::Nearest500.apply(Decimal::MIN);
        assert!(bottom >= Decimal::MIN && bottom < Decimal::MIN + dec!(500));
        assert_eq!(PriceRounding::None.apply(Decimal::MAX), Decimal::MAX);
    }

    #[test]
    fn test_price_rounding_serde_names() {
        let json = serde_json::to_string(&PriceRounding::Nearest100).unwrap();
        assert_eq!(json, "\"nearest-100\"");
        let parsed: PriceRounding = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(parsed, PriceRounding::None);
    }
}
