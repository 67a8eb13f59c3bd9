//! # User Settings & Pricing Context
//!
//! Per-user preferences, and the explicit context object that carries the
//! pricing-relevant subset of them into every calculation.
//!
//! ## From Preferences to a Price
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  user_settings row ──► UserSettings::normalized()                       │
//! │                              │                                          │
//! │                              ├──► default_rates()   → RateBoard seed    │
//! │                              │                                          │
//! │                              └──► PricingContext::from_settings         │
//! │                                     gst, tax_mode, number_format,       │
//! │                                     rounding, shop                      │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                          breakdown() / invoice_builder() / render()     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate reads settings from a global. Callers load them
//! (vedaa-db), build a `PricingContext`, and pass it along.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::invoice::{Invoice, InvoiceBuilder};
use crate::money::{NumberFormat, PriceRounding};
use crate::pricing::{compute_breakdown, PriceBreakdown, PriceInput, TaxMode};
use crate::rates::MetalRates;
use crate::render::InvoiceDocument;
use crate::types::{GstRates, ShopDetails, TaxRate};
use crate::validation::{validate_metal_rate, validate_non_negative, validate_tax_rate, ValidationResult};

// =============================================================================
// User Settings
// =============================================================================

/// Dashboard preferences for one user.
///
/// Missing keys deserialize to the defaults, so older stored blobs load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct UserSettings {
    pub brand_name: String,
    /// ISO 4217 code. Only affects the symbol and grouping of amounts.
    pub currency: String,
    /// Default 22K gold rate, ₹ per gram.
    #[ts(type = "string")]
    pub gold_rate: Decimal,
    /// Default silver rate, ₹ per gram.
    #[ts(type = "string")]
    pub silver_rate: Decimal,
    /// Default making charge as a percentage of metal value.
    #[ts(type = "string")]
    pub making_charge: Decimal,
    pub ai_sensitivity: u8,
    pub auto_match: bool,
    pub email_notifications: bool,
    pub match_alerts: bool,
    pub price_alerts: bool,
    pub dark_mode: bool,
    pub compact_view: bool,
    pub language: String,
    pub timezone: String,
    pub auto_backup: bool,
    pub backup_frequency: String,
    pub two_factor_enabled: bool,
    /// Minutes.
    pub session_timeout: u32,
    /// Show GST-inclusive prices in the calculator.
    pub include_gst: bool,
    #[ts(type = "string")]
    pub cgst_rate: Decimal,
    #[ts(type = "string")]
    pub sgst_rate: Decimal,
    pub price_rounding: PriceRounding,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            brand_name: "Vedaa AI".to_string(),
            currency: "INR".to_string(),
            gold_rate: Decimal::from(6500),
            silver_rate: Decimal::from(85),
            making_charge: Decimal::from(12),
            ai_sensitivity: 75,
            auto_match: true,
            email_notifications: true,
            match_alerts: true,
            price_alerts: false,
            dark_mode: false,
            compact_view: false,
            language: "en".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            auto_backup: true,
            backup_frequency: "daily".to_string(),
            two_factor_enabled: false,
            session_timeout: 30,
            include_gst: true,
            cgst_rate: Decimal::new(15, 1),
            sgst_rate: Decimal::new(15, 1),
            price_rounding: PriceRounding::None,
        }
    }
}

impl UserSettings {
    /// Replaces blank text and zero numbers with their defaults.
    ///
    /// Stored rows may carry empty or zeroed columns; a zero gold rate would
    /// price everything at the making charge. Tax rates are exempt: a zero
    /// GST rate is a legitimate setting.
    pub fn normalized(mut self) -> Self {
        let defaults = UserSettings::default();

        fallback_text(&mut self.brand_name, defaults.brand_name);
        fallback_text(&mut self.currency, defaults.currency);
        fallback_text(&mut self.language, defaults.language);
        fallback_text(&mut self.timezone, defaults.timezone);
        fallback_text(&mut self.backup_frequency, defaults.backup_frequency);

        fallback_amount(&mut self.gold_rate, defaults.gold_rate);
        fallback_amount(&mut self.silver_rate, defaults.silver_rate);
        fallback_amount(&mut self.making_charge, defaults.making_charge);

        if self.ai_sensitivity == 0 {
            self.ai_sensitivity = defaults.ai_sensitivity;
        }
        if self.session_timeout == 0 {
            self.session_timeout = defaults.session_timeout;
        }
        self
    }

    /// Merges a partial update. Blank text and zero numbers in the patch
    /// keep the current value; booleans and enums always apply.
    pub fn merge(&self, patch: &SettingsPatch) -> Self {
        let mut next = self.clone();

        merge_text(&mut next.brand_name, &patch.brand_name);
        merge_text(&mut next.currency, &patch.currency);
        merge_text(&mut next.language, &patch.language);
        merge_text(&mut next.timezone, &patch.timezone);
        merge_text(&mut next.backup_frequency, &patch.backup_frequency);

        merge_amount(&mut next.gold_rate, patch.gold_rate);
        merge_amount(&mut next.silver_rate, patch.silver_rate);
        merge_amount(&mut next.making_charge, patch.making_charge);

        if let Some(v) = patch.ai_sensitivity.filter(|v| *v != 0) {
            next.ai_sensitivity = v;
        }
        if let Some(v) = patch.session_timeout.filter(|v| *v != 0) {
            next.session_timeout = v;
        }

        let flags = [
            (&mut next.auto_match, patch.auto_match),
            (&mut next.email_notifications, patch.email_notifications),
            (&mut next.match_alerts, patch.match_alerts),
            (&mut next.price_alerts, patch.price_alerts),
            (&mut next.dark_mode, patch.dark_mode),
            (&mut next.compact_view, patch.compact_view),
            (&mut next.auto_backup, patch.auto_backup),
            (&mut next.two_factor_enabled, patch.two_factor_enabled),
            (&mut next.include_gst, patch.include_gst),
        ];
        for (slot, value) in flags {
            if let Some(v) = value {
                *slot = v;
            }
        }

        // Zero GST is a real choice, so tax rates only need to be present.
        if let Some(rate) = patch.cgst_rate {
            next.cgst_rate = rate;
        }
        if let Some(rate) = patch.sgst_rate {
            next.sgst_rate = rate;
        }
        if let Some(rounding) = patch.price_rounding {
            next.price_rounding = rounding;
        }

        next
    }

    /// Rejects values that cannot be saved.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_metal_rate("gold rate", self.gold_rate)?;
        validate_metal_rate("silver rate", self.silver_rate)?;
        validate_non_negative("making charge", self.making_charge)?;
        validate_tax_rate("cgst rate", self.cgst_rate)?;
        validate_tax_rate("sgst rate", self.sgst_rate)?;
        Ok(())
    }

    pub fn gst_rates(&self) -> GstRates {
        GstRates::new(TaxRate::from_percent(self.cgst_rate), TaxRate::from_percent(self.sgst_rate))
    }

    pub fn tax_mode(&self) -> TaxMode {
        TaxMode::from_inclusive_flag(self.include_gst)
    }

    pub fn number_format(&self) -> NumberFormat {
        NumberFormat::for_currency(&self.currency)
    }

    /// Fallback rate table used until the live feed answers.
    pub fn default_rates(&self) -> MetalRates {
        MetalRates::from_defaults(self.gold_rate, self.silver_rate)
    }
}

fn fallback_text(value: &mut String, default: String) {
    if value.trim().is_empty() {
        *value = default;
    }
}

fn fallback_amount(value: &mut Decimal, default: Decimal) {
    if value.is_zero() {
        *value = default;
    }
}

fn merge_text(value: &mut String, patch: &Option<String>) {
    if let Some(v) = patch.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        *value = v.to_string();
    }
}

fn merge_amount(value: &mut Decimal, patch: Option<Decimal>) {
    if let Some(v) = patch.filter(|v| !v.is_zero()) {
        *value = v;
    }
}

// =============================================================================
// Settings Patch
// =============================================================================

/// Partial settings update from the settings page or CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsPatch {
    pub brand_name: Option<String>,
    pub currency: Option<String>,
    #[ts(type = "string | null")]
    pub gold_rate: Option<Decimal>,
    #[ts(type = "string | null")]
    pub silver_rate: Option<Decimal>,
    #[ts(type = "string | null")]
    pub making_charge: Option<Decimal>,
    pub ai_sensitivity: Option<u8>,
    pub auto_match: Option<bool>,
    pub email_notifications: Option<bool>,
    pub match_alerts: Option<bool>,
    pub price_alerts: Option<bool>,
    pub dark_mode: Option<bool>,
    pub compact_view: Option<bool>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub auto_backup: Option<bool>,
    pub backup_frequency: Option<String>,
    pub two_factor_enabled: Option<bool>,
    pub session_timeout: Option<u32>,
    pub include_gst: Option<bool>,
    #[ts(type = "string | null")]
    pub cgst_rate: Option<Decimal>,
    #[ts(type = "string | null")]
    pub sgst_rate: Option<Decimal>,
    pub price_rounding: Option<PriceRounding>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

// =============================================================================
// Pricing Context
// =============================================================================

/// Everything a calculation or invoice needs besides the item itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingContext {
    pub gst: GstRates,
    pub tax_mode: TaxMode,
    pub number_format: NumberFormat,
    pub rounding: PriceRounding,
    pub shop: ShopDetails,
}

impl Default for PricingContext {
    fn default() -> Self {
        PricingContext {
            gst: GstRates::jewellery(),
            tax_mode: TaxMode::Inclusive,
            number_format: NumberFormat::inr(),
            rounding: PriceRounding::None,
            shop: ShopDetails::default(),
        }
    }
}

impl PricingContext {
    pub fn from_settings(settings: &UserSettings, shop: ShopDetails) -> Self {
        PricingContext {
            gst: settings.gst_rates(),
            tax_mode: settings.tax_mode(),
            number_format: settings.number_format(),
            rounding: settings.price_rounding,
            shop,
        }
    }

    pub fn price_input(&self, rate_per_gram: Decimal, weight_grams: Decimal, making_charge: Decimal) -> PriceInput {
        PriceInput::new(rate_per_gram, weight_grams, making_charge, self.gst)
    }

    /// Exact breakdown at this context's GST rates.
    pub fn breakdown(&self, rate_per_gram: Decimal, weight_grams: Decimal, making_charge: Decimal) -> PriceBreakdown {
        compute_breakdown(&self.price_input(rate_per_gram, weight_grams, making_charge))
    }

    /// The calculator's headline number: toggle selection, then rounding.
    pub fn display_price(&self, breakdown: &PriceBreakdown) -> Decimal {
        self.rounding.apply(breakdown.displayed_price(self.tax_mode))
    }

    pub fn format_display_price(&self, breakdown: &PriceBreakdown) -> String {
        self.number_format.format_currency(self.display_price(breakdown))
    }

    pub fn invoice_builder(&self) -> InvoiceBuilder {
        InvoiceBuilder::new(self.shop.clone(), self.gst)
    }

    pub fn render(&self, invoice: &Invoice) -> InvoiceDocument {
        InvoiceDocument::from_invoice(invoice, &self.number_format)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Grouping;
    use crate::types::{Metal, MetalDescriptor};
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let s = UserSettings::default();
        assert_eq!(s.brand_name, "Vedaa AI");
        assert_eq!(s.gold_rate, dec!(6500));
        assert_eq!(s.silver_rate, dec!(85));
        assert_eq!(s.timezone, "Asia/Kolkata");
        assert_eq!(s.session_timeout, 30);
        assert!(s.include_gst);
        assert_eq!(s.gst_rates(), GstRates::jewellery());
    }

    #[test]
    fn test_partial_json_loads_with_defaults() {
        let s: UserSettings = serde_json::from_str(r#"{"gold_rate": 6900, "dark_mode": true}"#).unwrap();
        assert_eq!(s.gold_rate, dec!(6900));
        assert!(s.dark_mode);
        assert_eq!(s.currency, "INR");
    }

    #[test]
    fn test_normalized_replaces_zero_and_blank() {
        let stored = UserSettings {
            brand_name: "  ".to_string(),
            gold_rate: Decimal::ZERO,
            session_timeout: 0,
            cgst_rate: Decimal::ZERO,
            ..Default::default()
        };
        let s = stored.normalized();
        assert_eq!(s.brand_name, "Vedaa AI");
        assert_eq!(s.gold_rate, dec!(6500));
        assert_eq!(s.session_timeout, 30);
        assert_eq!(s.cgst_rate, Decimal::ZERO);
    }

    #[test]
    fn test_merge_keeps_current_on_empty_values() {
        let current = UserSettings {
            gold_rate: dec!(6850),
            ..Default::default()
        };
        let patch = SettingsPatch {
            gold_rate: Some(Decimal::ZERO),
            brand_name: Some(String::new()),
            silver_rate: Some(dec!(92)),
            dark_mode: Some(true),
            include_gst: Some(false),
            ..Default::default()
        };
        let next = current.merge(&patch);
        assert_eq!(next.gold_rate, dec!(6850));
        assert_eq!(next.brand_name, "Vedaa AI");
        assert_eq!(next.silver_rate, dec!(92));
        assert!(next.dark_mode);
        assert_eq!(next.tax_mode(), TaxMode::Exclusive);
    }

    #[test]
    fn test_merge_allows_zero_gst() {
        let patch = SettingsPatch {
            cgst_rate: Some(Decimal::ZERO),
            sgst_rate: Some(Decimal::ZERO),
            ..Default::default()
        };
        let next = UserSettings::default().merge(&patch);
        assert!(next.gst_rates().cgst.is_zero());
        assert!(next.gst_rates().sgst.is_zero());
    }

    #[test]
    fn test_validate() {
        assert!(UserSettings::default().validate().is_ok());
        let bad = UserSettings {
            cgst_rate: dec!(150),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unbounded_metal_rates() {
        let huge_gold = UserSettings {
            gold_rate: Decimal::MAX,
            ..Default::default()
        };
        assert!(matches!(huge_gold.validate(), Err(ValidationError::TooLarge { ref field, .. }) if field == "gold rate"));

        let huge_silver = UserSettings {
            silver_rate: dec!(10000000.01),
            ..Default::default()
        };
        assert!(matches!(huge_silver.validate(), Err(ValidationError::TooLarge { ref field, .. }) if field == "silver rate"));
    }

    #[test]
    fn test_default_rates_from_settings() {
        let rates = UserSettings::default().default_rates();
        assert_eq!(rates.rate_for(Metal::Gold22k), dec!(6500));
        assert_eq!(rates.rate_for(Metal::Silver), dec!(85));
    }

    #[test]
    fn test_context_from_settings() {
        let settings = UserSettings {
            currency: "USD".to_string(),
            include_gst: false,
            price_rounding: PriceRounding::Nearest100,
            ..Default::default()
        };
        let ctx = PricingContext::from_settings(&settings, ShopDetails::default());
        assert_eq!(ctx.tax_mode, TaxMode::Exclusive);
        assert_eq!(ctx.number_format.grouping, Grouping::Western);
        assert_eq!(ctx.rounding, PriceRounding::Nearest100);
    }

    #[test]
    fn test_display_price_follows_toggle_and_rounding() {
        let mut ctx = PricingContext::default();
        let b = ctx.breakdown(dec!(6850), dec!(10), dec!(2000));
        assert_eq!(ctx.display_price(&b), dec!(72615));
        assert_eq!(ctx.format_display_price(&b), "₹72,615");

        ctx.tax_mode = TaxMode::Exclusive;
        assert_eq!(ctx.display_price(&b), dec!(70500));

        ctx.tax_mode = TaxMode::Inclusive;
        ctx.rounding = PriceRounding::Nearest100;
        assert_eq!(ctx.display_price(&b), dec!(72600));
        // the breakdown itself is exact
        assert_eq!(b.total_price(), dec!(72615));
    }

    #[test]
    fn test_context_builds_and_renders_invoice() {
        let ctx = PricingContext::default();
        let invoice = ctx
            .invoice_builder()
            .number("INV-20241225-001")
            .metal(&MetalDescriptor::for_metal(Metal::Gold22k, dec!(6850)), dec!(10), dec!(2000))
            .build();
        assert_eq!(invoice.shop, ShopDetails::default());
        let doc = ctx.render(&invoice);
        assert_eq!(doc.summary[3].amount, "₹72,615");
    }
}
