//! # Validation Module
//!
//! Strict business-rule checks for data entering the catalogue or settings.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation vs. Coercion                            │
//! │                                                                         │
//! │  Price calculator (live preview)                                       │
//! │  └── pricing::parse_amount  → bad input becomes 0, never an error      │
//! │                                                                         │
//! │  Item store / settings save / counter CLI                              │
//! │  └── THIS MODULE            → bad input is rejected with a reason      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  SQLite                                                                 │
//! │  └── NOT NULL / CHECK constraints                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vedaa_core::validation::{validate_gstin, validate_item_name};
//!
//! validate_item_name("Gold Temple Necklace").unwrap();
//! validate_gstin("27AABCU9603R1ZM").unwrap();
//! assert!(validate_gstin("27AABCU9603R1Z").is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::{JewelryItemPatch, NewJewelryItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_ITEM_NAME_LEN: usize = 200;
pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Heaviest single piece the catalogue accepts (grams).
pub const MAX_ITEM_WEIGHT_GRAMS: u32 = 10_000;

/// Highest metal rate the settings accept (₹ per gram).
pub const MAX_METAL_RATE: u32 = 10_000_000;

pub const GSTIN_LEN: usize = 15;

// =============================================================================
// String Validators
// =============================================================================

fn required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a catalogue item name (required, at most 200 characters).
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    required("name", name, MAX_ITEM_NAME_LEN)
}

/// Validates a catalogue category such as `Rings` or `Necklaces`.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    required("category", category, MAX_CATEGORY_LEN)
}

/// Validates a catalogue search query and returns it trimmed.
///
/// An empty query is allowed and means "everything".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a GST identification number.
///
/// ## Layout
/// ```text
///   27 AABCU9603R 1 Z M
///   ── ────────── ─ ─ ─
///   │  │          │ │ └─ check character (A-Z / 0-9)
///   │  │          │ └─── always 'Z'
///   │  │          └───── entity number (1-9 / A-Z)
///   │  └──────────────── PAN: 5 letters, 4 digits, 1 letter
///   └─────────────────── state code (two digits)
/// ```
pub fn validate_gstin(gstin: &str) -> ValidationResult<()> {
    let gstin = gstin.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "gstin".to_string(),
        reason: reason.to_string(),
    };

    if gstin.is_empty() {
        return Err(ValidationError::Required {
            field: "gstin".to_string(),
        });
    }

    let chars: Vec<char> = gstin.chars().collect();
    if chars.len() != GSTIN_LEN {
        return Err(invalid("must be exactly 15 characters"));
    }

    let digit = |c: char| c.is_ascii_digit();
    let upper = |c: char| c.is_ascii_uppercase();

    if !chars[0..2].iter().all(|&c| digit(c)) {
        return Err(invalid("must start with a two-digit state code"));
    }

    let pan = &chars[2..12];
    let pan_ok = pan[0..5].iter().all(|&c| upper(c)) && pan[5..9].iter().all(|&c| digit(c)) && upper(pan[9]);
    if !pan_ok {
        return Err(invalid("characters 3-12 must be a PAN (AAAAA9999A)"));
    }

    if !(upper(chars[12]) || matches!(chars[12], '1'..='9')) {
        return Err(invalid("entity number must be 1-9 or A-Z"));
    }

    if chars[13] != 'Z' {
        return Err(invalid("character 14 must be 'Z'"));
    }

    if !(upper(chars[14]) || digit(chars[14])) {
        return Err(invalid("check character must be A-Z or 0-9"));
    }

    Ok(())
}

/// Validates a GSTIN only when one was entered; blank means none.
pub fn validate_optional_gstin(gstin: Option<&str>) -> ValidationResult<()> {
    match gstin.map(str::trim) {
        Some(g) if !g.is_empty() => validate_gstin(g),
        _ => Ok(()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects values below zero. Zero is allowed (e.g. no making charge).
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an item weight in grams.
pub fn validate_weight(weight_grams: Decimal) -> ValidationResult<()> {
    validate_non_negative("weight", weight_grams)?;

    if weight_grams > Decimal::from(MAX_ITEM_WEIGHT_GRAMS) {
        return Err(ValidationError::TooLarge {
            field: "weight".to_string(),
            max: MAX_ITEM_WEIGHT_GRAMS.to_string(),
        });
    }

    Ok(())
}

/// Validates a configured metal rate per gram.
pub fn validate_metal_rate(field: &str, rate: Decimal) -> ValidationResult<()> {
    validate_non_negative(field, rate)?;

    if rate > Decimal::from(MAX_METAL_RATE) {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_METAL_RATE.to_string(),
        });
    }

    Ok(())
}

/// Validates a tax percentage (0 to 100 inclusive).
pub fn validate_tax_rate(field: &str, percent: Decimal) -> ValidationResult<()> {
    validate_non_negative(field, percent)?;

    if percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: "100".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates an insert payload before it reaches the item store.
pub fn validate_new_item(item: &NewJewelryItem) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_category(&item.category)?;
    validate_weight(item.weight_grams)?;
    validate_non_negative("making charge", item.making_charge)?;
    Ok(())
}

/// Validates only the fields a patch actually sets.
pub fn validate_patch(patch: &JewelryItemPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_item_name(name)?;
    }
    if let Some(category) = &patch.category {
        validate_category(category)?;
    }
    if let Some(weight) = patch.weight_grams {
        validate_weight(weight)?;
    }
    if let Some(making) = patch.making_charge {
        validate_non_negative("making charge", making)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemStatus;
    use rust_decimal_macros::dec;

    fn necklace() -> NewJewelryItem {
        NewJewelryItem {
            name: "Gold Temple Necklace".to_string(),
            category: "Necklaces".to_string(),
            image_ref: String::new(),
            metal_type: "Gold".to_string(),
            purity: "22K".to_string(),
            weight_grams: dec!(45.0),
            making_charge: dec!(15000),
            description: None,
            status: ItemStatus::Active,
        }
    }

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Kundan Bridal Set").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Rings").is_ok());
        assert!(matches!(
            validate_category(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  ring ").unwrap(), "ring");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_gstin() {
        assert!(validate_gstin("27AABCU9603R1ZM").is_ok());
        assert!(validate_gstin("29AAPFU0939F1ZV").is_ok());

        assert!(matches!(validate_gstin(""), Err(ValidationError::Required { .. })));
        assert!(validate_gstin("27AABCU9603R1Z").is_err());
        assert!(validate_gstin("AAAABCU9603R1ZM").is_err());
        assert!(validate_gstin("27AABCU9603R1YM").is_err());
        assert!(validate_gstin("27aabcu9603r1zm").is_err());
        assert!(validate_gstin("27AABCU9603R0ZM").is_err());
    }

    #[test]
    fn test_validate_optional_gstin() {
        assert!(validate_optional_gstin(None).is_ok());
        assert!(validate_optional_gstin(Some("  ")).is_ok());
        assert!(validate_optional_gstin(Some("bogus")).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("making charge", dec!(0)).is_ok());
        assert!(validate_non_negative("making charge", dec!(2500)).is_ok());
        assert!(matches!(
            validate_non_negative("making charge", dec!(-1)),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_weight() {
        assert!(validate_weight(dec!(4.5)).is_ok());
        assert!(validate_weight(dec!(10000)).is_ok());
        assert!(validate_weight(dec!(10000.01)).is_err());
        assert!(validate_weight(dec!(-4.5)).is_err());
    }

    #[test]
    fn test_validate_metal_rate() {
        assert!(validate_metal_rate("gold rate", dec!(6500)).is_ok());
        assert!(validate_metal_rate("gold rate", dec!(10000000)).is_ok());
        assert!(matches!(
            validate_metal_rate("gold rate", Decimal::MAX),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(matches!(
            validate_metal_rate("silver rate", dec!(-1)),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate("cgst", dec!(0)).is_ok());
        assert!(validate_tax_rate("cgst", dec!(1.5)).is_ok());
        assert!(validate_tax_rate("cgst", dec!(100)).is_ok());
        assert!(matches!(
            validate_tax_rate("cgst", dec!(100.5)),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(validate_tax_rate("cgst", dec!(-3)).is_err());
    }

    #[test]
    fn test_validate_new_item() {
        assert!(validate_new_item(&necklace()).is_ok());

        let mut item = necklace();
        item.making_charge = dec!(-100);
        let err = validate_new_item(&item).unwrap_err();
        assert_eq!(err.to_string(), "making charge must not be negative");
    }

    #[test]
    fn test_validate_patch_checks_only_set_fields() {
        assert!(validate_patch(&JewelryItemPatch::default()).is_ok());

        let patch = JewelryItemPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_patch(&patch).is_err());

        let patch = JewelryItemPatch {
            weight_grams: Some(dec!(8.2)),
            ..Default::default()
        };
        assert!(validate_patch(&patch).is_ok());
    }
}
