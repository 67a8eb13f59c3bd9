//! # Invoice Rendering
//!
//! Turns an [`Invoice`] into a printable document. Rendering is a pure
//! display transform: amounts are formatted copies, the invoice is untouched.
//!
//! ## Document Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Vedaa Jewellers                                │
//! │             address  •  Phone: ... | GSTIN: ...                         │
//! │                            TAX INVOICE                                  │
//! │  INVOICE DETAILS                    BILL TO                             │
//! │  Invoice No / Date                  name / address / phone / [GSTIN]    │
//! │ ─────────────────────────────────────────────────────────────────────── │
//! │  Description | HSN | Weight (g) | Rate/g | Making | Base | CGST | SGST  │
//! │  | Total                                                                │
//! │ ─────────────────────────────────────────────────────────────────────── │
//! │                                   Taxable Amount          ₹75,840       │
//! │                                   CGST @ 1.5%             ₹1,137.6      │
//! │                                   SGST @ 1.5%             ₹1,137.6      │
//! │                                   Grand Total             ₹78,115.2     │
//! │  Terms & Conditions                            Authorized Signatory     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write as _;

use serde::Serialize;
use ts_rs::TS;

use crate::invoice::{Invoice, InvoiceLineItem};
use crate::money::{format_weight, NumberFormat};

/// Shown in place of a blank customer field.
pub const PLACEHOLDER: &str = "—";

/// Column headings of the line item table, in order.
pub const TABLE_HEADERS: [&str; 9] = [
    "Description",
    "HSN",
    "Weight (g)",
    "Rate/g",
    "Making",
    "Base",
    "CGST",
    "SGST",
    "Total",
];

/// Footer terms printed on every invoice.
pub const TERMS: [&str; 2] = [
    "1. Goods once sold will not be taken back.",
    "2. Subject to local jurisdiction only.",
];

// =============================================================================
// Document model
// =============================================================================

/// One formatted table row, in [`TABLE_HEADERS`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub cells: [String; 9],
}

/// A labeled amount in the summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SummaryLine {
    pub label: String,
    pub amount: String,
}

/// Fully formatted invoice, ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDocument {
    pub title: String,
    pub shop_name: String,
    pub shop_address: String,
    pub shop_contact: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub bill_to: Vec<String>,
    pub rows: Vec<DocumentRow>,
    pub summary: Vec<SummaryLine>,
}

impl InvoiceDocument {
    /// Formats every value of the invoice with `fmt`.
    pub fn from_invoice(invoice: &Invoice, fmt: &NumberFormat) -> Self {
        let customer = &invoice.customer;
        let mut bill_to = vec![
            or_placeholder(&customer.name),
            or_placeholder(&customer.address),
            format!("Phone: {}", or_placeholder(&customer.phone)),
        ];
        if let Some(gstin) = customer.gstin() {
            bill_to.push(format!("GSTIN: {}", gstin));
        }

        let rows = invoice
            .line_items()
            .iter()
            .map(|item| format_row(item, fmt))
            .collect();

        let totals = invoice.totals();
        let summary = vec![
            SummaryLine {
                label: "Taxable Amount".to_string(),
                amount: fmt.format_currency(totals.base_price()),
            },
            SummaryLine {
                label: format!("CGST @ {}%", invoice.gst_rates.cgst),
                amount: fmt.format_currency(totals.cgst_amount()),
            },
            SummaryLine {
                label: format!("SGST @ {}%", invoice.gst_rates.sgst),
                amount: fmt.format_currency(totals.sgst_amount()),
            },
            SummaryLine {
                label: "Grand Total".to_string(),
                amount: fmt.format_currency(totals.total_price()),
            },
        ];

        InvoiceDocument {
            title: format!("GST Invoice - {}", invoice.invoice_number),
            shop_name: invoice.shop.name.clone(),
            shop_address: invoice.shop.address.clone(),
            shop_contact: format!("Phone: {} | GSTIN: {}", invoice.shop.phone, invoice.shop.gstin),
            invoice_number: invoice.invoice_number.clone(),
            invoice_date: invoice.invoice_date.format("%d/%m/%Y").to_string(),
            bill_to,
            rows,
            summary,
        }
    }

    /// Standalone HTML page for the browser's print dialog.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(4096);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape(&self.title));
        html.push_str("<style>\n");
        html.push_str(PRINT_CSS);
        html.push_str("</style>\n</head>\n<body>\n<div class=\"invoice-container\">\n");

        html.push_str("<div class=\"header\">\n");
        let _ = writeln!(html, "<h1>{}</h1>", escape(&self.shop_name));
        let _ = writeln!(html, "<p>{}</p>", escape(&self.shop_address));
        let _ = writeln!(html, "<p>{}</p>", escape(&self.shop_contact));
        html.push_str("<div class=\"tax-invoice\">TAX INVOICE</div>\n</div>\n");

        html.push_str("<div class=\"details-grid\">\n<div class=\"detail-box\">\n<h3>Invoice Details</h3>\n");
        let _ = writeln!(html, "<p><strong>Invoice No:</strong> {}</p>", escape(&self.invoice_number));
        let _ = writeln!(html, "<p><strong>Date:</strong> {}</p>", escape(&self.invoice_date));
        html.push_str("</div>\n<div class=\"detail-box\">\n<h3>Bill To</h3>\n");
        for line in &self.bill_to {
            let _ = writeln!(html, "<p>{}</p>", escape(line));
        }
        html.push_str("</div>\n</div>\n");

        html.push_str("<table>\n<thead>\n<tr>");
        for (i, header) in TABLE_HEADERS.iter().enumerate() {
            let _ = write!(html, "<th{}>{}</th>", align(i), header);
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for (i, cell) in row.cells.iter().enumerate() {
                let _ = write!(html, "<td{}>{}</td>", align(i), escape(cell));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");

        html.push_str("<div class=\"totals\">\n");
        let last = self.summary.len().saturating_sub(1);
        for (i, line) in self.summary.iter().enumerate() {
            let class = if i == last { "totals-row final" } else { "totals-row" };
            let _ = writeln!(
                html,
                "<div class=\"{}\"><span>{}</span><span>{}</span></div>",
                class,
                escape(&line.label),
                escape(&line.amount)
            );
        }
        html.push_str("</div>\n");

        html.push_str("<div class=\"footer\">\n<p>Terms &amp; Conditions:</p>\n");
        for term in TERMS {
            let _ = writeln!(html, "<p>{}</p>", escape(term));
        }
        html.push_str("</div>\n<div class=\"signature\"><div class=\"signature-line\">Authorized Signatory</div></div>\n");
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    /// Plain text rendering for terminals and thermal printers.
    pub fn to_text(&self) -> String {
        let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
        for row in &self.rows {
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.shop_name);
        let _ = writeln!(out, "{}", self.shop_address);
        let _ = writeln!(out, "{}", self.shop_contact);
        let _ = writeln!(out, "TAX INVOICE");
        let _ = writeln!(out, "Invoice No: {}", self.invoice_number);
        let _ = writeln!(out, "Date: {}", self.invoice_date);
        let _ = writeln!(out, "Bill To:");
        for line in &self.bill_to {
            let _ = writeln!(out, "  {}", line);
        }
        out.push('\n');

        let header: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
        push_text_row(&mut out, &header, &widths);
        let rule_len = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
        let _ = writeln!(out, "{}", "-".repeat(rule_len));
        for row in &self.rows {
            push_text_row(&mut out, &row.cells, &widths);
        }
        out.push('\n');

        let label_width = self.summary.iter().map(|l| l.label.chars().count()).max().unwrap_or(0);
        for line in &self.summary {
            let _ = writeln!(out, "{:<lw$}  {}", line.label, line.amount, lw = label_width);
        }
        out.push('\n');
        let _ = writeln!(out, "Terms & Conditions:");
        for term in TERMS {
            let _ = writeln!(out, "{}", term);
        }
        out
    }
}

fn format_row(item: &InvoiceLineItem, fmt: &NumberFormat) -> DocumentRow {
    let b = &item.breakdown;
    DocumentRow {
        cells: [
            item.description.clone(),
            item.hsn_code.clone(),
            format_weight(item.weight_grams),
            fmt.format_currency(item.rate_per_gram),
            fmt.format_currency(item.making_charge),
            fmt.format_currency(b.base_price()),
            fmt.format_currency(b.cgst_amount()),
            fmt.format_currency(b.sgst_amount()),
            fmt.format_currency(b.total_price()),
        ],
    }
}

fn push_text_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize; 9]) {
    let line: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let cell = cell.as_ref();
            let pad = widths[i].saturating_sub(cell.chars().count());
            if i < 2 {
                format!("{}{}", cell, " ".repeat(pad))
            } else {
                format!("{}{}", " ".repeat(pad), cell)
            }
        })
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

fn or_placeholder(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// Numeric columns are right-aligned.
fn align(column: usize) -> &'static str {
    if column < 2 {
        ""
    } else {
        " class=\"text-right\""
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PRINT_CSS: &str = r#"* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Segoe UI', Tahoma, sans-serif; padding: 20px; color: #1a1a1a; }
.invoice-container { max-width: 800px; margin: 0 auto; border: 2px solid #d4af37; padding: 30px; }
.header { text-align: center; border-bottom: 2px solid #d4af37; padding-bottom: 20px; margin-bottom: 20px; }
.header h1 { color: #d4af37; font-size: 28px; margin-bottom: 5px; }
.header p { color: #666; font-size: 12px; }
.tax-invoice { background: #d4af37; color: white; padding: 8px 20px; display: inline-block; font-weight: bold; margin: 10px 0; }
.details-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin-bottom: 20px; }
.detail-box { padding: 15px; background: #faf8f5; border-radius: 8px; }
.detail-box h3 { color: #d4af37; font-size: 14px; margin-bottom: 10px; text-transform: uppercase; }
.detail-box p { font-size: 13px; margin: 4px 0; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th { background: #d4af37; color: white; padding: 12px 8px; text-align: left; font-size: 12px; }
td { padding: 10px 8px; border-bottom: 1px solid #eee; font-size: 12px; }
.text-right { text-align: right; }
.totals { margin-top: 20px; margin-left: auto; width: 300px; }
.totals-row { display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid #eee; }
.totals-row.final { border-top: 2px solid #d4af37; border-bottom: none; font-weight: bold; font-size: 16px; color: #d4af37; padding-top: 12px; }
.footer { margin-top: 40px; font-size: 11px; color: #666; }
.signature { margin-top: 60px; text-align: right; }
.signature-line { border-top: 1px solid #333; width: 200px; margin-left: auto; padding-top: 5px; }
@media print { body { padding: 0; } .invoice-container { border: 1px solid #d4af37; } }
"#;

// =============================================================================
// Unit Tests
// =============================================================================
