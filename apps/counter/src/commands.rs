//! # Counter Commands
//!
//! Executes parsed commands against the database and the pricing engine.
//!
//! ```text
//! ┌────────────┐   settings.load   ┌─────────────────┐   RateBoard    ┌──────────────┐
//! │  Command   │ ────────────────► │ PricingContext  │ ─────────────► │ PriceQuote / │
//! │            │                   │ (GST, toggle,   │                │ Invoice      │
//! └────────────┘                   │  rounding, ₹)   │                └──────┬───────┘
//!                                  └─────────────────┘                       │
//!                                                         to_text / to_html  ▼
//!                                                                    stdout / file
//! ```
//!
//! Every command returns the text to print; `main` owns stdout.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use vedaa_core::invoice::generate_invoice_number;
use vedaa_core::money::format_weight;
use vedaa_core::pricing::{quote_metals, PriceQuote};
use vedaa_core::rates::RateBoard;
use vedaa_core::render::InvoiceDocument;
use vedaa_core::validation::{validate_optional_gstin, validate_weight};
use vedaa_core::{
    CoreError, Invoice, JewelryItem, Metal, PriceBreakdown, PricingContext, TaxMode, UserSettings,
};
use vedaa_db::Database;

use crate::cli::{InvoiceArgs, InvoiceLine, ItemsCommand, QuoteArgs, SettingsCommand};
use crate::config::{CounterConfig, InvoiceNumbering};
use crate::error::CounterResult;

/// An invoice that has been numbered, rendered and (optionally) written.
#[derive(Debug, Clone)]
pub struct IssuedInvoice {
    pub invoice: Invoice,
    pub document: InvoiceDocument,
    pub html_path: Option<PathBuf>,
}

/// Command executor bound to one database and configuration.
pub struct Counter {
    db: Database,
    config: CounterConfig,
}

impl Counter {
    pub fn new(db: Database, config: CounterConfig) -> Self {
        Counter { db, config }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn load_settings(&self) -> CounterResult<UserSettings> {
        Ok(self.db.settings().load(&self.config.user_id).await?)
    }

    fn pricing_context(&self, settings: &UserSettings) -> PricingContext {
        PricingContext::from_settings(settings, self.config.shop.clone())
    }

    /// Settings-derived rates with any `--rate` overrides applied.
    fn rate_board(settings: &UserSettings, overrides: &[(Metal, Decimal)]) -> RateBoard {
        let mut board = RateBoard::new(settings.default_rates());
        for &(metal, rate) in overrides {
            board.set_rate(metal, rate);
        }
        board
    }

    // =========================================================================
    // Quote
    // =========================================================================

    pub async fn quote(&self, args: &QuoteArgs) -> CounterResult<String> {
        let settings = self.load_settings().await?;
        let ctx = self.pricing_context(&settings);
        let board = Self::rate_board(&settings, &args.rates);

        match args.metal {
            Some(metal) => {
                let rate = board.rates().rate_for(metal);
                let breakdown = ctx.breakdown(rate, args.weight_grams, args.making_charge);
                Ok(render_breakdown(&ctx, metal, rate, args, &breakdown))
            }
            None => {
                let quotes = quote_metals(board.rates(), args.weight_grams, args.making_charge, ctx.gst);
                Ok(render_quote_table(&ctx, &quotes))
            }
        }
    }

    // =========================================================================
    // Invoice
    // =========================================================================

    /// Customer details never stop an invoice: blanks print as dashes and a
    /// malformed GSTIN is printed as entered.
    pub async fn invoice(&self, args: &InvoiceArgs) -> CounterResult<IssuedInvoice> {
        if let Err(e) = validate_optional_gstin(args.customer.gstin()) {
            warn!(gstin = ?args.customer.gstin(), error = %e, "Customer GSTIN looks malformed; printing as entered");
        }

        let settings = self.load_settings().await?;
        let ctx = self.pricing_context(&settings);
        let board = Self::rate_board(&settings, &args.rates);
        let date = args.date.unwrap_or_else(|| Local::now().date_naive());

        let mut builder = ctx.invoice_builder().customer(args.customer.clone()).date(date);
        for line in &args.lines {
            let (metal, weight, making) = match line {
                InvoiceLine::Metal(line) => (line.metal, line.weight_grams, line.making_charge),
                InvoiceLine::Item(id) => {
                    let item = self.catalogue_item(id).await?;
                    let metal = item
                        .priced_metal()
                        .ok_or_else(|| CoreError::UnknownMetal(format!("{} {}", item.metal_type, item.purity)))?;
                    (metal, item.weight_grams, item.making_charge)
                }
            };
            validate_weight(weight)?;
            builder = builder.metal(&board.rates().descriptor(metal), weight, making);
        }

        let number = self.next_invoice_number(date).await?;
        let invoice = builder.number(number).build();
        let document = ctx.render(&invoice);

        let html_path = if args.text_only {
            None
        } else {
            let path = args
                .out
                .clone()
                .unwrap_or_else(|| self.config.output_dir.join(format!("{}.html", invoice.invoice_number)));
            fs::write(&path, document.to_html())?;
            Some(path)
        };

        info!(
            number = %invoice.invoice_number,
            lines = invoice.line_items().len(),
            total = %invoice.totals().total_price(),
            "Invoice issued"
        );

        Ok(IssuedInvoice {
            invoice,
            document,
            html_path,
        })
    }

    async fn catalogue_item(&self, id: &str) -> CounterResult<JewelryItem> {
        self.db
            .items()
            .get(id)
            .await?
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()).into())
    }

    async fn next_invoice_number(&self, date: NaiveDate) -> CounterResult<String> {
        match self.config.invoice_numbering {
            InvoiceNumbering::Random => Ok(generate_invoice_number(date)),
            InvoiceNumbering::Sequential => Ok(self.db.invoice_sequences().next_invoice_number(date).await?),
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub async fn items(&self, command: &ItemsCommand) -> CounterResult<String> {
        let repo = self.db.items();

        match command {
            ItemsCommand::List(filter) => {
                let items = repo.list_filtered(filter).await?;
                debug!(count = items.len(), "Listed catalogue");
                Ok(render_item_list(&items))
            }
            ItemsCommand::Show(id) => Ok(serde_json::to_string_pretty(&self.catalogue_item(id).await?)?),
            ItemsCommand::Add(new_item) => {
                let item = repo.add(new_item).await?;
                Ok(format!("Added {} ({})", item.name, item.id))
            }
            ItemsCommand::Update(id, patch) => {
                let item = repo.update(id, patch).await?;
                Ok(format!("Updated {} ({})", item.name, item.id))
            }
            ItemsCommand::Delete(id) => {
                repo.delete(id).await?;
                Ok(format!("Deleted {}", id))
            }
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn settings(&self, command: &SettingsCommand) -> CounterResult<String> {
        let repo = self.db.settings();
        let user_id = &self.config.user_id;

        let settings = match command {
            SettingsCommand::Show => repo.load(user_id).await?,
            SettingsCommand::Set(patch) => repo.update(user_id, patch).await?,
            SettingsCommand::Reset => repo.reset(user_id).await?,
        };

        Ok(serde_json::to_string_pretty(&settings)?)
    }
}

// =============================================================================
// Text Rendering
// =============================================================================

fn render_breakdown(
    ctx: &PricingContext,
    metal: Metal,
    rate: Decimal,
    args: &QuoteArgs,
    breakdown: &PriceBreakdown,
) -> String {
    let fmt = &ctx.number_format;
    let mut out = String::new();

    let _ = writeln!(out, "{} (HSN {})", metal.description(), metal.hsn_code());
    let rows = [
        ("Rate".to_string(), format!("{}/g", fmt.format_currency(rate))),
        ("Weight".to_string(), format!("{} g", format_weight(args.weight_grams))),
        ("Making charge".to_string(), fmt.format_currency(args.making_charge)),
        ("Base price".to_string(), fmt.format_currency(breakdown.base_price())),
        (format!("CGST @ {}%", ctx.gst.cgst), fmt.format_currency(breakdown.cgst_amount())),
        (format!("SGST @ {}%", ctx.gst.sgst), fmt.format_currency(breakdown.sgst_amount())),
        ("Total".to_string(), fmt.format_currency(breakdown.total_price())),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<16}{:>14}", label, value);
    }

    let _ = write!(
        out,
        "  {:<16}{:>14}",
        display_label(ctx),
        ctx.format_display_price(breakdown)
    );
    out
}

fn display_label(ctx: &PricingContext) -> &'static str {
    match ctx.tax_mode {
        TaxMode::Inclusive => "Price (inc GST)",
        TaxMode::Exclusive => "Price (ex GST)",
    }
}

fn render_quote_table(ctx: &PricingContext, quotes: &[PriceQuote]) -> String {
    let fmt = &ctx.number_format;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<26}{:>12}{:>14}{:>12}{:>14}",
        "Metal",
        "Rate/g",
        "Base",
        "GST",
        display_label(ctx)
    );
    for quote in quotes {
        let _ = writeln!(
            out,
            "{:<26}{:>12}{:>14}{:>12}{:>14}",
            quote.descriptor.description,
            fmt.format_currency(quote.descriptor.rate_per_gram),
            fmt.format_currency(quote.breakdown.base_price()),
            fmt.format_currency(quote.breakdown.total_tax()),
            ctx.format_display_price(&quote.breakdown),
        );
    }
    out.truncate(out.trim_end().len());
    out
}

fn render_item_list(items: &[JewelryItem]) -> String {
    if items.is_empty() {
        return "No items found.".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{}  {:<28} {:<10} {} {:<5} {:>8} g  {}",
            item.id,
            item.name,
            item.category,
            item.metal_type,
            item.purity,
            format_weight(item.weight_grams),
            item.status.as_str(),
        );
    }
    out.truncate(out.trim_end().len());
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LineSpec;
    use rust_decimal_macros::dec;
    use vedaa_core::{CustomerDetails, ItemStatus, NewJewelryItem, SettingsPatch, ShopDetails, DEFAULT_USER_ID};
    use vedaa_db::DbConfig;

    fn config(numbering: InvoiceNumbering) -> CounterConfig {
        CounterConfig {
            db_path: PathBuf::from(":memory:"),
            user_id: DEFAULT_USER_ID.to_string(),
            shop: ShopDetails::default(),
            invoice_numbering: numbering,
            output_dir: std::env::temp_dir(),
        }
    }

    async fn counter(numbering: InvoiceNumbering) -> Counter {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Counter::new(db, config(numbering))
    }

    fn christmas() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
    }

    fn scenario_invoice() -> InvoiceArgs {
        InvoiceArgs {
            customer: CustomerDetails {
                name: "Priya Sharma".to_string(),
                ..Default::default()
            },
            lines: vec![
                InvoiceLine::Metal(LineSpec {
                    metal: Metal::Gold22k,
                    weight_grams: dec!(10),
                    making_charge: dec!(2000),
                }),
                InvoiceLine::Metal(LineSpec {
                    metal: Metal::Silver,
                    weight_grams: dec!(45),
                    making_charge: dec!(1200),
                }),
            ],
            rates: vec![(Metal::Gold22k, dec!(7000)), (Metal::Silver, dec!(92))],
            date: Some(christmas()),
            out: None,
            text_only: true,
        }
    }

    #[tokio::test]
    async fn test_quote_single_metal() {
        let counter = counter(InvoiceNumbering::Random).await;
        let out = counter
            .quote(&QuoteArgs {
                metal: Some(Metal::Gold22k),
                weight_grams: dec!(10),
                making_charge: dec!(2000),
                rates: vec![(Metal::Gold22k, dec!(7000))],
            })
            .await
            .unwrap();

        assert!(out.starts_with("Gold Jewelry (22K) (HSN 7113)"));
        assert!(out.contains("₹72,000"));
        assert!(out.contains("₹1,080"));
        assert!(out.contains("₹74,160"));
    }

    #[tokio::test]
    async fn test_quote_respects_tax_toggle() {
        let counter = counter(InvoiceNumbering::Random).await;
        counter
            .settings(&SettingsCommand::Set(SettingsPatch {
                include_gst: Some(false),
                ..Default::default()
            }))
            .await
            .unwrap();

        let out = counter
            .quote(&QuoteArgs {
                metal: Some(Metal::Gold22k),
                weight_grams: dec!(10),
                making_charge: dec!(2000),
                rates: vec![(Metal::Gold22k, dec!(7000))],
            })
            .await
            .unwrap();

        let last = out.lines().last().unwrap();
        assert!(last.contains("Price (ex GST)"));
        assert!(last.ends_with("₹72,000"));
    }

    #[tokio::test]
    async fn test_quote_all_metals() {
        let counter = counter(InvoiceNumbering::Random).await;
        let out = counter
            .quote(&QuoteArgs {
                metal: None,
                weight_grams: dec!(1),
                making_charge: Decimal::ZERO,
                rates: vec![],
            })
            .await
            .unwrap();

        // Header plus one row per metal.
        assert_eq!(out.lines().count(), 1 + Metal::ALL.len());
    }

    #[tokio::test]
    async fn test_invoice_totals_and_text() {
        let counter = counter(InvoiceNumbering::Random).await;
        let issued = counter.invoice(&scenario_invoice()).await.unwrap();

        assert_eq!(issued.invoice.line_items().len(), 2);
        assert_eq!(issued.invoice.totals().base_price(), dec!(75840));
        assert_eq!(issued.invoice.totals().total_price(), dec!(78115.2));
        assert!(issued.invoice.invoice_number.starts_with("INV-20241225-"));
        assert!(issued.html_path.is_none());
        assert!(issued.document.to_text().contains("₹78,115.2"));
    }

    #[tokio::test]
    async fn test_sequential_numbering() {
        let counter = counter(InvoiceNumbering::Sequential).await;
        let first = counter.invoice(&scenario_invoice()).await.unwrap();
        let second = counter.invoice(&scenario_invoice()).await.unwrap();

        assert_eq!(first.invoice.invoice_number, "INV-20241225-001");
        assert_eq!(second.invoice.invoice_number, "INV-20241225-002");
    }

    #[tokio::test]
    async fn test_invoice_from_catalogue_item() {
        let counter = counter(InvoiceNumbering::Random).await;
        let item = counter
            .database()
            .items()
            .add(&NewJewelryItem {
                name: "Gold Kada Bangle".to_string(),
                category: "Bangles".to_string(),
                image_ref: String::new(),
                metal_type: "Gold".to_string(),
                purity: "22K".to_string(),
                weight_grams: dec!(10),
                making_charge: dec!(2000),
                description: None,
                status: ItemStatus::Active,
            })
            .await
            .unwrap();

        let mut args = scenario_invoice();
        args.lines = vec![InvoiceLine::Item(item.id.clone())];
        let issued = counter.invoice(&args).await.unwrap();
        assert_eq!(issued.invoice.totals().total_price(), dec!(74160));

        args.lines = vec![InvoiceLine::Item("missing".to_string())];
        let err = counter.invoice(&args).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_invoice_prints_malformed_customer_gstin() {
        let counter = counter(InvoiceNumbering::Random).await;
        let mut args = scenario_invoice();
        args.customer.gstin = Some("27AAPFU0939F1Z".to_string());

        let issued = counter.invoice(&args).await.unwrap();
        assert_eq!(issued.invoice.totals().total_price(), dec!(78115.2));
        assert!(issued.document.bill_to.contains(&"GSTIN: 27AAPFU0939F1Z".to_string()));

        args.customer.gstin = Some("N/A".to_string());
        assert!(counter.invoice(&args).await.is_ok());
    }

    #[tokio::test]
    async fn test_invoice_for_walk_in_customer() {
        let counter = counter(InvoiceNumbering::Sequential).await;
        let mut args = scenario_invoice();
        args.customer = CustomerDetails::default();

        let issued = counter.invoice(&args).await.unwrap();
        assert_eq!(issued.invoice.invoice_number, "INV-20241225-001");
        assert_eq!(issued.invoice.customer, CustomerDetails::default());
        assert_eq!(issued.document.bill_to, ["—", "—", "Phone: —"]);
        assert!(issued.document.to_text().contains("Phone: —"));
    }

    #[tokio::test]
    async fn test_settings_reject_unbounded_gold_rate() {
        let counter = counter(InvoiceNumbering::Random).await;
        let err = counter
            .settings(&SettingsCommand::Set(SettingsPatch {
                gold_rate: Some(Decimal::MAX),
                ..Default::default()
            }))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let shown: UserSettings = serde_json::from_str(&counter.settings(&SettingsCommand::Show).await.unwrap()).unwrap();
        assert_eq!(shown.gold_rate, dec!(6500));
    }

    #[tokio::test]
    async fn test_invoice_writes_html() {
        let counter = counter(InvoiceNumbering::Random).await;
        let path = std::env::temp_dir().join(format!("vedaa-counter-test-{}.html", std::process::id()));
        let mut args = scenario_invoice();
        args.text_only = false;
        args.out = Some(path.clone());

        let issued = counter.invoice(&args).await.unwrap();
        assert_eq!(issued.html_path.as_deref(), Some(path.as_path()));

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains(&issued.invoice.invoice_number));
        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_items_lifecycle() {
        let counter = counter(InvoiceNumbering::Random).await;
        assert_eq!(
            counter.items(&ItemsCommand::List(Default::default())).await.unwrap(),
            "No items found."
        );

        let added = counter
            .items(&ItemsCommand::Add(NewJewelryItem {
                name: "Pearl Drop Earrings".to_string(),
                category: "Earrings".to_string(),
                image_ref: String::new(),
                metal_type: "Gold".to_string(),
                purity: "18K".to_string(),
                weight_grams: dec!(8.2),
                making_charge: dec!(3500),
                description: None,
                status: ItemStatus::Active,
            }))
            .await
            .unwrap();
        assert!(added.starts_with("Added Pearl Drop Earrings"));

        let listing = counter.items(&ItemsCommand::List(Default::default())).await.unwrap();
        assert!(listing.contains("Pearl Drop Earrings"));
        assert!(listing.contains("8.2 g"));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let counter = counter(InvoiceNumbering::Random).await;
        let shown = counter
            .settings(&SettingsCommand::Set(SettingsPatch {
                gold_rate: Some(dec!(6900)),
                ..Default::default()
            }))
            .await
            .unwrap();
        let saved: UserSettings = serde_json::from_str(&shown).unwrap();
        assert_eq!(saved.gold_rate, dec!(6900));

        let reset: UserSettings =
            serde_json::from_str(&counter.settings(&SettingsCommand::Reset).await.unwrap()).unwrap();
        assert_eq!(reset, UserSettings::default());
    }
}
