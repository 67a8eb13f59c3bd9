//! # Command Line Parsing
//!
//! Hand-rolled argument parsing for the counter, in the same spirit as the
//! seed binary: no parser crate, just `--flag value` pairs.
//!
//! ```text
//! counter [--db PATH] <command> [args]
//!
//!   quote     [--metal M] [--weight G] [--making C] [--rate M=R]...
//!   invoice   [--customer NAME] [--line M:G:C]... [--item ID]... [--date D]
//!             [--address A] [--phone P] [--gstin G] [--rate M=R]...
//!             [--out FILE] [--text-only]
//!   items     list [--category C] [--status S] [--search Q]
//!             show ID | delete ID
//!             add --name N --category C --metal M --purity P --weight G
//!                 --making C [--description D] [--image REF] [--status S]
//!             update ID [same flags as add]
//!   settings  show | reset | set KEY=VALUE...
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use vedaa_core::money::PriceRounding;
use vedaa_core::pricing::parse_amount;
use vedaa_core::{CustomerDetails, ItemStatus, JewelryItemPatch, Metal, NewJewelryItem, SettingsPatch};
use vedaa_db::ItemFilter;

use crate::error::{CounterError, CounterResult};

pub const USAGE: &str = "\
Vedaa Jewellers counter

Usage: counter [--db PATH] <command> [args]

Commands:
  quote      Price a piece (or every metal) with today's rates
  invoice    Build a GST invoice and write it as HTML
  items      Manage the catalogue (list, show, add, update, delete)
  settings   Show, change or reset pricing preferences
  help       Show this message

Amounts:
  quote treats a blank or non-numeric --weight or --making as 0.
  invoice --line METAL:GRAMS[:MAKING] is strict: GRAMS and MAKING must be
  non-negative numbers, and a typo like 10g stops the invoice instead of
  billing 0.
  Customer fields are optional; blanks print as dashes.

Examples:
  counter quote --metal gold22k --weight 10 --making 2000
  counter invoice --customer \"Priya Sharma\" --line gold22k:10:2000 --line silver:45:1200
  counter settings set include_gst=false price_rounding=nearest-10";

// =============================================================================
// Parsed Commands
// =============================================================================

/// Whole command line: global options plus one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub db_path: Option<PathBuf>,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quote(QuoteArgs),
    Invoice(InvoiceArgs),
    Items(ItemsCommand),
    Settings(SettingsCommand),
    Help,
}

/// Calculator inputs. Weight and making charge follow form semantics:
/// blank or unparseable text counts as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteArgs {
    /// `None` quotes every metal side by side.
    pub metal: Option<Metal>,
    pub weight_grams: Decimal,
    pub making_charge: Decimal,
    pub rates: Vec<(Metal, Decimal)>,
}

/// One `metal:weight:making` invoice line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSpec {
    pub metal: Metal,
    pub weight_grams: Decimal,
    pub making_charge: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceLine {
    Metal(LineSpec),
    /// Catalogue item id; weight and making charge come from the record.
    Item(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceArgs {
    pub customer: CustomerDetails,
    pub lines: Vec<InvoiceLine>,
    pub rates: Vec<(Metal, Decimal)>,
    pub date: Option<NaiveDate>,
    pub out: Option<PathBuf>,
    pub text_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemsCommand {
    List(ItemFilter),
    Show(String),
    Add(NewJewelryItem),
    Update(String, JewelryItemPatch),
    Delete(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsCommand {
    Show,
    Set(SettingsPatch),
    Reset,
}

// =============================================================================
// Flag Splitting
// =============================================================================

/// Arguments split into positionals, `--flag value` options and bare switches.
#[derive(Debug, Default)]
struct ArgList {
    positionals: Vec<String>,
    options: Vec<(String, String)>,
    switches: Vec<String>,
}

impl ArgList {
    fn split(args: &[String], options: &[&str], switches: &[&str]) -> CounterResult<Self> {
        let mut list = ArgList::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            if !arg.starts_with("--") {
                list.positionals.push(arg.clone());
            } else if switches.contains(&arg.as_str()) {
                list.switches.push(arg.clone());
            } else if options.contains(&arg.as_str()) {
                let value = iter
                    .next()
                    .ok_or_else(|| CounterError::usage(format!("{} needs a value", arg)))?;
                list.options.push((arg.clone(), value.clone()));
            } else {
                return Err(CounterError::usage(format!("unknown option '{}'", arg)));
            }
        }

        Ok(list)
    }

    /// Last value given for `flag`.
    fn value(&self, flag: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(name, _)| name == flag)
            .map(|(_, value)| value.as_str())
    }

    fn values<'a>(&'a self, flag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.options
            .iter()
            .filter(move |(name, _)| name == flag)
            .map(|(_, value)| value.as_str())
    }

    fn has(&self, switch: &str) -> bool {
        self.switches.iter().any(|s| s == switch)
    }

    fn required(&self, flag: &str) -> CounterResult<&str> {
        self.value(flag)
            .ok_or_else(|| CounterError::usage(format!("{} is required", flag)))
    }

    fn no_positionals(&self) -> CounterResult<()> {
        match self.positionals.first() {
            Some(extra) => Err(CounterError::usage(format!("unexpected argument '{}'", extra))),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Value Parsers
// =============================================================================

fn parse_decimal(flag: &str, raw: &str) -> CounterResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let value = Decimal::from_str(trimmed).map_err(|_| CounterError::invalid(flag, raw))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CounterError::invalid(flag, raw));
    }
    Ok(value)
}

fn parse_bool(flag: &str, raw: &str) -> CounterResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CounterError::invalid(flag, raw)),
    }
}

fn parse_number<T: FromStr>(flag: &str, raw: &str) -> CounterResult<T> {
    raw.trim().parse().map_err(|_| CounterError::invalid(flag, raw))
}

fn parse_metal(flag: &str, raw: &str) -> CounterResult<Metal> {
    raw.parse().map_err(|_| CounterError::invalid(flag, raw))
}

fn parse_status(flag: &str, raw: &str) -> CounterResult<ItemStatus> {
    raw.trim().parse().map_err(|_| CounterError::invalid(flag, raw))
}

fn parse_rounding(flag: &str, raw: &str) -> CounterResult<PriceRounding> {
    match raw.trim() {
        "none" => Ok(PriceRounding::None),
        "nearest-10" => Ok(PriceRounding::Nearest10),
        "nearest-50" => Ok(PriceRounding::Nearest50),
        "nearest-100" => Ok(PriceRounding::Nearest100),
        "nearest-500" => Ok(PriceRounding::Nearest500),
        _ => Err(CounterError::invalid(flag, raw)),
    }
}

/// `gold22k=6850`
fn parse_rate_override(raw: &str) -> CounterResult<(Metal, Decimal)> {
    let (metal, rate) = raw
        .split_once('=')
        .ok_or_else(|| CounterError::invalid("--rate", raw))?;
    Ok((parse_metal("--rate", metal)?, parse_decimal("--rate", rate)?))
}

/// `gold22k:10:2000`; the making charge may be omitted.
fn parse_line_spec(raw: &str) -> CounterResult<LineSpec> {
    let mut parts = raw.split(':');
    let metal = parse_metal("--line", parts.next().unwrap_or_default())?;
    let weight = parts.next().ok_or_else(|| CounterError::invalid("--line", raw))?;
    let making = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(CounterError::invalid("--line", raw));
    }

    Ok(LineSpec {
        metal,
        weight_grams: parse_decimal("--line", weight)?,
        making_charge: parse_decimal("--line", making)?,
    })
}

fn parse_date(raw: &str) -> CounterResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| CounterError::invalid("--date", raw))
}

fn rate_overrides(list: &ArgList) -> CounterResult<Vec<(Metal, Decimal)>> {
    list.values("--rate").map(parse_rate_override).collect()
}

// =============================================================================
// Command Parsers
// =============================================================================

/// Parses arguments without the program name.
pub fn parse(args: &[String]) -> CounterResult<Cli> {
    let mut db_path = None;
    let mut rest = args;

    while let Some(first) = rest.first() {
        match first.as_str() {
            "--db" | "-d" => {
                let path = rest
                    .get(1)
                    .ok_or_else(|| CounterError::usage("--db needs a value"))?;
                db_path = Some(PathBuf::from(path));
                rest = &rest[2..];
            }
            "--help" | "-h" => {
                return Ok(Cli {
                    db_path,
                    command: Command::Help,
                })
            }
            _ => break,
        }
    }

    let (name, tail) = match rest.split_first() {
        Some((name, tail)) => (name.as_str(), tail),
        None => {
            return Ok(Cli {
                db_path,
                command: Command::Help,
            })
        }
    };

    if tail.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Cli {
            db_path,
            command: Command::Help,
        });
    }

    let command = match name {
        "quote" => Command::Quote(parse_quote(tail)?),
        "invoice" => Command::Invoice(parse_invoice(tail)?),
        "items" => Command::Items(parse_items(tail)?),
        "settings" => Command::Settings(parse_settings(tail)?),
        "help" => Command::Help,
        other => return Err(CounterError::usage(format!("unknown command '{}'", other))),
    };

    Ok(Cli { db_path, command })
}

fn parse_quote(args: &[String]) -> CounterResult<QuoteArgs> {
    let list = ArgList::split(args, &["--metal", "--weight", "--making", "--rate"], &[])?;
    list.no_positionals()?;

    Ok(QuoteArgs {
        metal: list.value("--metal").map(|m| parse_metal("--metal", m)).transpose()?,
        weight_grams: parse_amount(list.value("--weight").unwrap_or_default()),
        making_charge: parse_amount(list.value("--making").unwrap_or_default()),
        rates: rate_overrides(&list)?,
    })
}

fn parse_invoice(args: &[String]) -> CounterResult<InvoiceArgs> {
    let list = ArgList::split(
        args,
        &[
            "--customer",
            "--address",
            "--phone",
            "--gstin",
            "--line",
            "--item",
            "--rate",
            "--date",
            "--out",
        ],
        &["--text-only"],
    )?;
    list.no_positionals()?;

    // Lines keep command-line order, mixing --line and --item.
    let mut lines = Vec::new();
    for (flag, value) in &list.options {
        match flag.as_str() {
            "--line" => lines.push(InvoiceLine::Metal(parse_line_spec(value)?)),
            "--item" => lines.push(InvoiceLine::Item(value.trim().to_string())),
            _ => {}
        }
    }
    if lines.is_empty() {
        return Err(CounterError::usage("an invoice needs at least one --line or --item"));
    }

    let customer = CustomerDetails {
        name: list.value("--customer").unwrap_or_default().trim().to_string(),
        address: list.value("--address").unwrap_or_default().trim().to_string(),
        phone: list.value("--phone").unwrap_or_default().trim().to_string(),
        gstin: list.value("--gstin").map(|g| g.trim().to_uppercase()),
    };

    Ok(InvoiceArgs {
        customer,
        lines,
        rates: rate_overrides(&list)?,
        date: list.value("--date").map(parse_date).transpose()?,
        out: list.value("--out").map(PathBuf::from),
        text_only: list.has("--text-only"),
    })
}

const ITEM_FIELDS: [&str; 9] = [
    "--name",
    "--category",
    "--metal",
    "--purity",
    "--weight",
    "--making",
    "--description",
    "--image",
    "--status",
];

fn item_patch(list: &ArgList) -> CounterResult<JewelryItemPatch> {
    let owned = |flag: &str| list.value(flag).map(|v| v.trim().to_string());

    Ok(JewelryItemPatch {
        name: owned("--name"),
        category: owned("--category"),
        image_ref: owned("--image"),
        metal_type: owned("--metal"),
        purity: owned("--purity"),
        weight_grams: list.value("--weight").map(|v| parse_decimal("--weight", v)).transpose()?,
        making_charge: list.value("--making").map(|v| parse_decimal("--making", v)).transpose()?,
        description: owned("--description"),
        status: list.value("--status").map(|v| parse_status("--status", v)).transpose()?,
    })
}

fn single_id(list: &ArgList, action: &str) -> CounterResult<String> {
    match list.positionals.as_slice() {
        [id] => Ok(id.trim().to_string()),
        _ => Err(CounterError::usage(format!("items {} takes exactly one item id", action))),
    }
}

fn parse_items(args: &[String]) -> CounterResult<ItemsCommand> {
    let (action, rest) = args
        .split_first()
        .ok_or_else(|| CounterError::usage("items needs an action: list, show, add, update or delete"))?;

    match action.as_str() {
        "list" => {
            let list = ArgList::split(rest, &["--category", "--status", "--search"], &[])?;
            list.no_positionals()?;
            Ok(ItemsCommand::List(ItemFilter {
                category: list.value("--category").map(|c| c.trim().to_string()),
                status: list.value("--status").map(|s| parse_status("--status", s)).transpose()?,
                query: list.value("--search").map(str::to_string),
            }))
        }
        "show" => Ok(ItemsCommand::Show(single_id(&ArgList::split(rest, &[], &[])?, "show")?)),
        "delete" => Ok(ItemsCommand::Delete(single_id(&ArgList::split(rest, &[], &[])?, "delete")?)),
        "add" => {
            let list = ArgList::split(rest, &ITEM_FIELDS, &[])?;
            list.no_positionals()?;
            let patch = item_patch(&list)?;
            Ok(ItemsCommand::Add(NewJewelryItem {
                name: list.required("--name")?.trim().to_string(),
                category: list.required("--category")?.trim().to_string(),
                image_ref: patch.image_ref.unwrap_or_default(),
                metal_type: list.required("--metal")?.trim().to_string(),
                purity: list.required("--purity")?.trim().to_string(),
                weight_grams: patch.weight_grams.unwrap_or_default(),
                making_charge: patch.making_charge.unwrap_or_default(),
                description: patch.description,
                status: patch.status.unwrap_or_default(),
            }))
        }
        "update" => {
            let list = ArgList::split(rest, &ITEM_FIELDS, &[])?;
            let id = single_id(&list, "update")?;
            let patch = item_patch(&list)?;
            if patch.is_empty() {
                return Err(CounterError::usage("items update needs at least one field to change"));
            }
            Ok(ItemsCommand::Update(id, patch))
        }
        other => Err(CounterError::usage(format!("unknown items action '{}'", other))),
    }
}

fn apply_setting(patch: &mut SettingsPatch, key: &str, value: &str) -> CounterResult<()> {
    let flag = key;
    let text = || Some(value.trim().to_string());

    match key {
        "brand_name" => patch.brand_name = text(),
        "currency" => patch.currency = Some(value.trim().to_uppercase()),
        "gold_rate" => patch.gold_rate = Some(parse_decimal(flag, value)?),
        "silver_rate" => patch.silver_rate = Some(parse_decimal(flag, value)?),
        "making_charge" => patch.making_charge = Some(parse_decimal(flag, value)?),
        "ai_sensitivity" => patch.ai_sensitivity = Some(parse_number(flag, value)?),
        "auto_match" => patch.auto_match = Some(parse_bool(flag, value)?),
        "email_notifications" => patch.email_notifications = Some(parse_bool(flag, value)?),
        "match_alerts" => patch.match_alerts = Some(parse_bool(flag, value)?),
        "price_alerts" => patch.price_alerts = Some(parse_bool(flag, value)?),
        "dark_mode" => patch.dark_mode = Some(parse_bool(flag, value)?),
        "compact_view" => patch.compact_view = Some(parse_bool(flag, value)?),
        "language" => patch.language = text(),
        "timezone" => patch.timezone = text(),
        "auto_backup" => patch.auto_backup = Some(parse_bool(flag, value)?),
        "backup_frequency" => patch.backup_frequency = text(),
        "two_factor_enabled" => patch.two_factor_enabled = Some(parse_bool(flag, value)?),
        "session_timeout" => patch.session_timeout = Some(parse_number(flag, value)?),
        "include_gst" => patch.include_gst = Some(parse_bool(flag, value)?),
        "cgst_rate" => patch.cgst_rate = Some(parse_decimal(flag, value)?),
        "sgst_rate" => patch.sgst_rate = Some(parse_decimal(flag, value)?),
        "price_rounding" => patch.price_rounding = Some(parse_rounding(flag, value)?),
        other => return Err(CounterError::usage(format!("unknown setting '{}'", other))),
    }

    Ok(())
}

fn parse_settings(args: &[String]) -> CounterResult<SettingsCommand> {
    match args.split_first() {
        None => Ok(SettingsCommand::Show),
        Some((action, rest)) => match action.as_str() {
            "show" if rest.is_empty() => Ok(SettingsCommand::Show),
            "reset" if rest.is_empty() => Ok(SettingsCommand::Reset),
            "set" => {
                let mut patch = SettingsPatch::default();
                for pair in rest {
                    let (key, value) = pair
                        .split_once('=')
                        .ok_or_else(|| CounterError::usage(format!("expected KEY=VALUE, got '{}'", pair)))?;
                    apply_setting(&mut patch, key.trim(), value)?;
                }
                if patch.is_empty() {
                    return Err(CounterError::usage("settings set needs at least one KEY=VALUE"));
                }
                Ok(SettingsCommand::Set(patch))
            }
            other => Err(CounterError::usage(format!("unknown settings action '{}'", other))),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args(line: &[&str]) -> Vec<String> {
        line.iter().map(|s| s.to_string()).collect()
    }

    fn command(line: &[&str]) -> Command {
        parse(&args(line)).unwrap().command
    }

    #[test]
    fn test_no_arguments_shows_help() {
        assert_eq!(command(&[]), Command::Help);
        assert_eq!(command(&["quote", "--help"]), Command::Help);
    }

    #[test]
    fn test_global_db_flag() {
        let cli = parse(&args(&["--db", "/tmp/shop.db", "settings"])).unwrap();
        assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(cli.command, Command::Settings(SettingsCommand::Show));
    }

    #[test]
    fn test_quote_form_semantics() {
        let Command::Quote(quote) = command(&["quote", "--metal", "22k", "--weight", "10", "--making", "abc"]) else {
            panic!("expected quote");
        };
        assert_eq!(quote.metal, Some(Metal::Gold22k));
        assert_eq!(quote.weight_grams, dec!(10));
        assert_eq!(quote.making_charge, Decimal::ZERO);

        let Command::Quote(all) = command(&["quote", "--weight", "5", "--rate", "silver=95"]) else {
            panic!("expected quote");
        };
        assert_eq!(all.metal, None);
        assert_eq!(all.rates, vec![(Metal::Silver, dec!(95))]);
    }

    #[test]
    fn test_invoice_lines_keep_order() {
        let Command::Invoice(invoice) = command(&[
            "invoice",
            "--customer",
            "Priya Sharma",
            "--line",
            "gold22k:10:2000",
            "--item",
            "abc-123",
            "--line",
            "silver:45",
            "--gstin",
            "27aapfu0939f1zv",
            "--date",
            "2024-12-25",
            "--text-only",
        ]) else {
            panic!("expected invoice");
        };

        assert_eq!(
            invoice.lines,
            vec![
                InvoiceLine::Metal(LineSpec {
                    metal: Metal::Gold22k,
                    weight_grams: dec!(10),
                    making_charge: dec!(2000),
                }),
                InvoiceLine::Item("abc-123".to_string()),
                InvoiceLine::Metal(LineSpec {
                    metal: Metal::Silver,
                    weight_grams: dec!(45),
                    making_charge: Decimal::ZERO,
                }),
            ]
        );
        assert_eq!(invoice.customer.gstin.as_deref(), Some("27AAPFU0939F1ZV"));
        assert_eq!(invoice.date, NaiveDate::from_ymd_opt(2024, 12, 25));
        assert!(invoice.text_only);
    }

    #[test]
    fn test_invoice_argument_errors() {
        assert!(parse(&args(&["invoice", "--customer", "A"])).is_err());
        assert!(parse(&args(&["invoice", "--customer", "A", "--line", "gold22k:ten:0"])).is_err());
        assert!(parse(&args(&["invoice", "--customer", "A", "--line", "gold22k:10g:0"])).is_err());
        assert!(parse(&args(&["invoice", "--customer", "A", "--line", "platinum:1:1"])).is_err());
        assert!(parse(&args(&["invoice", "--customer", "A", "--line", "gold22k:-1:0"])).is_err());
        assert!(parse(&args(&["invoice", "--customer", "A", "--line", "gold22k:1:0", "--date", "25/12/2024"])).is_err());
        assert!(parse(&args(&["invoice", "--customer", "A", "--line", "gold22k:1:0", "--discount", "5"])).is_err());
    }

    #[test]
    fn test_invoice_customer_is_optional() {
        let Command::Invoice(invoice) = command(&["invoice", "--line", "gold22k:10"]) else {
            panic!("expected invoice");
        };
        assert_eq!(invoice.customer, CustomerDetails::default());

        let Command::Invoice(invoice) = command(&["invoice", "--line", "silver:45", "--gstin", "n/a"]) else {
            panic!("expected invoice");
        };
        assert_eq!(invoice.customer.name, "");
        assert_eq!(invoice.customer.gstin.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_usage_explains_amount_parsing() {
        assert!(USAGE.contains("--line METAL:GRAMS[:MAKING] is strict"));
        assert!(USAGE.contains("quote treats a blank or non-numeric"));
    }

    #[test]
    fn test_items_commands() {
        assert_eq!(
            command(&["items", "list", "--category", "Rings", "--status", "active"]),
            Command::Items(ItemsCommand::List(ItemFilter::category("Rings").with_status(ItemStatus::Active)))
        );
        assert_eq!(
            command(&["items", "delete", "abc"]),
            Command::Items(ItemsCommand::Delete("abc".to_string()))
        );

        let Command::Items(ItemsCommand::Add(item)) = command(&[
            "items", "add", "--name", "Gold Kada", "--category", "Bangles", "--metal", "Gold", "--purity", "22K",
            "--weight", "32", "--making", "8500",
        ]) else {
            panic!("expected add");
        };
        assert_eq!(item.name, "Gold Kada");
        assert_eq!(item.weight_grams, dec!(32));
        assert_eq!(item.status, ItemStatus::Active);

        let Command::Items(ItemsCommand::Update(id, patch)) =
            command(&["items", "update", "abc", "--making", "9000"])
        else {
            panic!("expected update");
        };
        assert_eq!(id, "abc");
        assert_eq!(patch.making_charge, Some(dec!(9000)));
        assert!(patch.name.is_none());

        assert!(parse(&args(&["items", "update", "abc"])).is_err());
        assert!(parse(&args(&["items", "add", "--name", "Ring"])).is_err());
    }

    #[test]
    fn test_settings_set() {
        let Command::Settings(SettingsCommand::Set(patch)) = command(&[
            "settings",
            "set",
            "include_gst=false",
            "gold_rate=6900",
            "price_rounding=nearest-10",
            "currency=usd",
        ]) else {
            panic!("expected set");
        };
        assert_eq!(patch.include_gst, Some(false));
        assert_eq!(patch.gold_rate, Some(dec!(6900)));
        assert_eq!(patch.price_rounding, Some(PriceRounding::Nearest10));
        assert_eq!(patch.currency.as_deref(), Some("USD"));

        assert!(parse(&args(&["settings", "set", "theme=dark"])).is_err());
        assert!(parse(&args(&["settings", "set", "include_gst=maybe"])).is_err());
        assert!(parse(&args(&["settings", "set"])).is_err());
    }
}
