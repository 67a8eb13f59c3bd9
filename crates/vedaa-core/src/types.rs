//! # Domain Types
//!
//! Core domain types used throughout the jewellery back office.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Metal       │   │    TaxRate      │   │  JewelryItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Gold24k        │   │  percent (dec)  │   │  id (UUID)      │       │
//! │  │  Gold22k  7113  │   │  1.5 = 1.5%     │   │  name, category │       │
//! │  │  Gold18k  7113  │   │                 │   │  weight_grams   │       │
//! │  │  Silver   7114  │   │  GstRates       │   │  making_charge  │       │
//! │  └─────────────────┘   │  cgst + sgst    │   │  status         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │  ShopDetails    │   │ CustomerDetails │                              │
//! │  │  name, address  │   │  all optional   │                              │
//! │  │  gstin, phone   │   │  on the invoice │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Tax Rate
// =============================================================================

/// A GST component rate, stored as a percentage.
///
/// `TaxRate::from_percent(dec!(1.5))` is 1.5%. Negative percentages are
/// clamped to zero, including when deserialized; plausibility (e.g. ≤ 100%)
/// is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(from = "Decimal")]
pub struct TaxRate(#[ts(type = "string")] Decimal);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    pub fn from_percent(percent: Decimal) -> Self {
        TaxRate(percent.max(Decimal::ZERO))
    }

    /// Creates a tax rate from basis points (150 bps = 1.5%).
    pub fn from_bps(bps: u32) -> Self {
        TaxRate(Decimal::new(i64::from(bps), 2))
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub fn percent(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for TaxRate {
    fn from(percent: Decimal) -> Self {
        TaxRate::from_percent(percent)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// Renders as the bare percentage, e.g. `1.5` (used in "CGST @ 1.5%").
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

// =============================================================================
// GST Rates
// =============================================================================

/// The CGST/SGST pair applied to one invoice.
///
/// Both components are applied independently to the same base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstRates {
    pub cgst: TaxRate,
    pub sgst: TaxRate,
}

impl GstRates {
    pub fn new(cgst: TaxRate, sgst: TaxRate) -> Self {
        GstRates { cgst, sgst }
    }

    /// 3% GST on jewellery, split 1.5% central + 1.5% state.
    pub fn jewellery() -> Self {
        GstRates {
            cgst: TaxRate::from_bps(150),
            sgst: TaxRate::from_bps(150),
        }
    }

    /// Combined percentage (CGST + SGST).
    pub fn combined_percent(&self) -> Decimal {
        self.cgst.percent() + self.sgst.percent()
    }
}

impl Default for GstRates {
    fn default() -> Self {
        GstRates::jewellery()
    }
}

// =============================================================================
// Metal
// =============================================================================

/// Metals priced on the daily rate board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Gold24k,
    Gold22k,
    Gold18k,
    Silver,
}

impl Metal {
    /// Every metal, in rate board order.
    pub const ALL: [Metal; 4] = [Metal::Gold24k, Metal::Gold22k, Metal::Gold18k, Metal::Silver];

    /// Invoice description for jewellery made of this metal.
    pub fn description(&self) -> &'static str {
        match self {
            Metal::Gold24k => "Gold Jewelry (24K)",
            Metal::Gold22k => "Gold Jewelry (22K)",
            Metal::Gold18k => "Gold Jewelry (18K)",
            Metal::Silver => "Silver Jewelry",
        }
    }

    /// HSN tariff code printed on the GST invoice.
    pub fn hsn_code(&self) -> &'static str {
        match self {
            Metal::Gold24k | Metal::Gold22k | Metal::Gold18k => "7113",
            Metal::Silver => "7114",
        }
    }

    /// Short code used in settings, the CLI and the database.
    pub fn code(&self) -> &'static str {
        match self {
            Metal::Gold24k => "gold24k",
            Metal::Gold22k => "gold22k",
            Metal::Gold18k => "gold18k",
            Metal::Silver => "silver",
        }
    }

    pub fn is_gold(&self) -> bool {
        !matches!(self, Metal::Silver)
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Metal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold24k" | "24k" => Ok(Metal::Gold24k),
            "gold22k" | "22k" => Ok(Metal::Gold22k),
            "gold18k" | "18k" => Ok(Metal::Gold18k),
            "silver" => Ok(Metal::Silver),
            other => Err(CoreError::UnknownMetal(other.to_string())),
        }
    }
}

// =============================================================================
// Metal Descriptor
// =============================================================================

/// Static invoice metadata plus the rate in force for one metal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MetalDescriptor {
    pub description: String,
    pub hsn_code: String,
    #[ts(type = "string")]
    pub rate_per_gram: Decimal,
}

impl MetalDescriptor {
    /// Descriptor for a metal at the given per-gram rate.
    pub fn for_metal(metal: Metal, rate_per_gram: Decimal) -> Self {
        MetalDescriptor {
            description: metal.description().to_string(),
            hsn_code: metal.hsn_code().to_string(),
            rate_per_gram,
        }
    }
}

// =============================================================================
// Shop & Customer
// =============================================================================

/// The issuing shop, printed in the invoice header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShopDetails {
    pub name: String,
    pub address: String,
    pub gstin: String,
    pub phone: String,
}

impl Default for ShopDetails {
    fn default() -> Self {
        ShopDetails {
            name: "Vedaa Jewellers".to_string(),
            address: "123, Gold Market, Mumbai - 400001, Maharashtra, India".to_string(),
            gstin: "27AABCU9603R1ZM".to_string(),
            phone: "+91 98765 43210".to_string(),
        }
    }
}

/// Bill-to party. Every field may be blank; the invoice prints dashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub gstin: Option<String>,
}

impl CustomerDetails {
    /// GSTIN when present and non-blank.
    pub fn gstin(&self) -> Option<&str> {
        self.gstin.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }
}

// =============================================================================
// Jewelry Item (item store record)
// =============================================================================

/// Whether a catalogue item is listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ItemStatus::Active),
            "inactive" => Ok(ItemStatus::Inactive),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["active".to_string(), "inactive".to_string()],
            }),
        }
    }
}

/// A piece in the shop's catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct JewelryItem {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    /// Rings, Necklaces, Earrings, ...
    pub category: String,
    pub image_ref: String,
    /// Gold, Silver, Rose Gold, ...
    pub metal_type: String,
    /// 22K, 18K, 925, ...
    pub purity: String,
    #[ts(type = "string")]
    pub weight_grams: Decimal,
    #[ts(type = "string")]
    pub making_charge: Decimal,
    pub description: Option<String>,
    pub status: ItemStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl JewelryItem {
    /// Maps the free-form metal type and purity onto a rate board metal.
    ///
    /// Returns `None` for pieces whose metal is not priced by the board
    /// (platinum, for example).
    pub fn priced_metal(&self) -> Option<Metal> {
        let metal = self.metal_type.to_ascii_lowercase();
        let purity = self.purity.to_ascii_uppercase();
        if metal.contains("silver") {
            return Some(Metal::Silver);
        }
        if !metal.contains("gold") {
            return None;
        }
        match purity.trim() {
            "24K" => Some(Metal::Gold24k),
            "22K" => Some(Metal::Gold22k),
            "18K" => Some(Metal::Gold18k),
            _ => None,
        }
    }
}

/// Insert payload for a catalogue item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewJewelryItem {
    pub name: String,
    pub category: String,
    pub image_ref: String,
    pub metal_type: String,
    pub purity: String,
    #[ts(type = "string")]
    pub weight_grams: Decimal,
    #[ts(type = "string")]
    pub making_charge: Decimal,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct JewelryItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub image_ref: Option<String>,
    pub metal_type: Option<String>,
    pub purity: Option<String>,
    #[ts(type = "string | null")]
    pub weight_grams: Option<Decimal>,
    #[ts(type = "string | null")]
    pub making_charge: Option<Decimal>,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
}

impl JewelryItemPatch {
    /// Applies the patch to an item, leaving timestamps to the store.
    pub fn apply_to(&self, item: &mut JewelryItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(image_ref) = &self.image_ref {
            item.image_ref = image_ref.clone();
        }
        if let Some(metal_type) = &self.metal_type {
            item.metal_type = metal_type.clone();
        }
        if let Some(purity) = &self.purity {
            item.purity = purity.clone();
        }
        if let Some(weight) = self.weight_grams {
            item.weight_grams = weight;
        }
        if let Some(making) = self.making_charge {
            item.making_charge = making;
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            item.status = status;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == JewelryItemPatch::default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_item() -> JewelryItem {
        let now = Utc::now();
        JewelryItem {
            id: "item-1".to_string(),
            name: "Gold Temple Necklace".to_string(),
            category: "Necklaces".to_string(),
            image_ref: String::new(),
            metal_type: "Gold".to_string(),
            purity: "22K".to_string(),
            weight_grams: dec!(45.0),
            making_charge: dec!(15000),
            description: None,
            status: ItemStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(150);
        assert_eq!(rate.percent(), dec!(1.5));
        assert_eq!(rate.to_string(), "1.5");
    }

    #[test]
    fn test_tax_rate_clamps_negative() {
        let rate = TaxRate::from_percent(dec!(-3));
        assert!(rate.is_zero());
    }

    #[test]
    fn test_deserialized_tax_rate_is_clamped() {
        let rate: TaxRate = serde_json::from_str("\"-1.5\"").unwrap();
        assert!(rate.is_zero());

        let gst: GstRates = serde_json::from_str(r#"{"cgst":"-9","sgst":"2.5"}"#).unwrap();
        assert!(gst.cgst.is_zero());
        assert_eq!(gst.combined_percent(), dec!(2.5));
    }

    #[test]
    fn test_jewellery_gst_is_three_percent() {
        assert_eq!(GstRates::jewellery().combined_percent(), dec!(3));
    }

    #[test]
    fn test_metal_hsn_codes() {
        assert_eq!(Metal::Gold22k.hsn_code(), "7113");
        assert_eq!(Metal::Gold18k.hsn_code(), "7113");
        assert_eq!(Metal::Silver.hsn_code(), "7114");
        assert_eq!(Metal::Gold22k.description(), "Gold Jewelry (22K)");
    }

    #[test]
    fn test_metal_parse() {
        assert_eq!("gold22k".parse::<Metal>().unwrap(), Metal::Gold22k);
        assert_eq!(" Silver ".parse::<Metal>().unwrap(), Metal::Silver);
        assert!("platinum".parse::<Metal>().is_err());
    }

    #[test]
    fn test_customer_gstin_blank_is_none() {
        let customer = CustomerDetails {
            gstin: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(customer.gstin(), None);
    }

    #[test]
    fn test_priced_metal() {
        let mut item = sample_item();
        assert_eq!(item.priced_metal(), Some(Metal::Gold22k));

        item.metal_type = "Rose Gold".to_string();
        item.purity = "18K".to_string();
        assert_eq!(item.priced_metal(), Some(Metal::Gold18k));

        item.metal_type = "Platinum".to_string();
        assert_eq!(item.priced_metal(), None);
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut item = sample_item();
        let patch = JewelryItemPatch {
            making_charge: Some(dec!(12000)),
            status: Some(ItemStatus::Inactive),
            ..Default::default()
        };
        patch.apply_to(&mut item);

        assert_eq!(item.making_charge, dec!(12000));
        assert_eq!(item.status, ItemStatus::Inactive);
        assert_eq!(item.name, "Gold Temple Necklace");
        assert!(!patch.is_empty());
        assert!(JewelryItemPatch::default().is_empty());
    }
}
