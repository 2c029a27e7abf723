//! Fixed-width gate pass document rendering.
//!
//! The document is a pure function of the shop profile and the pass view, so
//! a reprint from the stored outgoing-log rows is byte-identical to the
//! original. Lines are 42 characters wide for 58mm receipt printers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::entities::outgoing_stock_log;

/// Printable line width in characters.
pub const LINE_WIDTH: usize = 42;

const ITEM_COL: usize = 23;
const QTY_COL: usize = 9;
const UNIT_COL: usize = 5;

/// Shop header fields for the document.
#[derive(Debug, Clone, Default)]
pub struct ShopDetails {
    pub shop_name: String,
    pub address: Option<String>,
    pub contact_number: Option<String>,
}

/// One itemized line of a gate pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GatePassLine {
    pub product_name: String,
    pub sku: Option<String>,
    pub quantity: Decimal,
    pub unit_abbreviation: String,
}

/// A gate pass reconstructed from its outgoing-log rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GatePassView {
    pub pass_id: String,
    pub issued_at: DateTime<Utc>,
    pub dispatch_date: NaiveDate,
    pub customer: String,
    pub authorized_by: String,
    pub reason: Option<String>,
    pub lines: Vec<GatePassLine>,
}

impl GatePassView {
    /// Rebuild the pass from the log rows sharing one `gate_pass_id`.
    /// Returns `None` if the slice is empty.
    pub fn from_rows(rows: &[outgoing_stock_log::Model]) -> Option<Self> {
        let first = rows.first()?;
        let issued_at = rows.iter().map(|r| r.logged_at).min()?;

        let lines = rows
            .iter()
            .map(|row| GatePassLine {
                product_name: row.product_name.clone(),
                sku: row.sku.clone(),
                quantity: row.quantity_removed,
                unit_abbreviation: row
                    .unit_abbreviation
                    .clone()
                    .unwrap_or_else(|| row.unit_name.clone()),
            })
            .collect();

        Some(Self {
            pass_id: first.gate_pass_id.clone(),
            issued_at,
            dispatch_date: first.dispatch_date,
            customer: first.destination.clone().unwrap_or_default(),
            authorized_by: first.issued_to.clone(),
            reason: first.reason.clone(),
            lines,
        })
    }

    pub fn total_quantity(&self) -> Decimal {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// The scannable companion payload: the raw pass id, nothing else.
    pub fn scan_payload(&self) -> &str {
        &self.pass_id
    }
}

/// Render the complete document.
pub fn render_document(shop: &ShopDetails, pass: &GatePassView) -> String {
    let mut out = Vec::new();

    out.push(center(&shop.shop_name));
    if let Some(address) = &shop.address {
        out.push(center(address));
    }
    if let Some(contact) = &shop.contact_number {
        out.push(center(contact));
    }
    out.push(separator());
    out.push(center("GATE PASS"));
    out.push(separator());

    out.push(fit(&format!("Pass No   : {}", pass.pass_id)));
    out.push(fit(&format!(
        "Date      : {}",
        pass.issued_at.format("%Y-%m-%d")
    )));
    out.push(fit(&format!(
        "Time      : {}",
        pass.issued_at.format("%H:%M:%S")
    )));
    out.push(fit(&format!(
        "Dispatch  : {}",
        pass.dispatch_date.format("%Y-%m-%d")
    )));
    out.push(fit(&format!("Customer  : {}", pass.customer)));
    out.push(fit(&format!("Auth. By  : {}", pass.authorized_by)));
    if let Some(reason) = &pass.reason {
        out.push(fit(&format!("Reason    : {}", reason)));
    }

    out.push(separator());
    out.push(fit(&format!(
        "No {:<item$} {:>qty$} {:<unit$}",
        "Item",
        "Qty",
        "Unit",
        item = ITEM_COL,
        qty = QTY_COL,
        unit = UNIT_COL
    )));
    out.push(separator());

    for (index, line) in pass.lines.iter().enumerate() {
        let label = match &line.sku {
            Some(sku) if !sku.is_empty() => format!("{} ({})", line.product_name, sku),
            _ => line.product_name.clone(),
        };
        out.push(fit(&format!(
            "{:<2} {:<item$} {:>qty$} {:<unit$}",
            index + 1,
            truncate(&label, ITEM_COL),
            truncate(&line.quantity.to_string(), QTY_COL),
            truncate(&line.unit_abbreviation, UNIT_COL),
            item = ITEM_COL,
            qty = QTY_COL,
            unit = UNIT_COL
        )));
    }

    out.push(separator());
    out.push(fit(&format!(
        "{:>width$}",
        format!("Total Qty: {}", pass.total_quantity()),
        width = LINE_WIDTH
    )));
    out.push(blank());
    out.push(blank());
    out.push(fit("__________________    __________________"));
    out.push(fit("Authorized By         Received By"));

    out.join("\n")
}

fn blank() -> String {
    String::new()
}

fn separator() -> String {
    "-".repeat(LINE_WIDTH)
}

fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

fn fit(s: &str) -> String {
    truncate(s, LINE_WIDTH)
}

fn center(s: &str) -> String {
    let s = truncate(s, LINE_WIDTH);
    let padding = (LINE_WIDTH - s.chars().count()) / 2;
    format!("{}{}", " ".repeat(padding), s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_pass() -> GatePassView {
        GatePassView {
            pass_id: "GP-1700000000000".to_string(),
            issued_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
            dispatch_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            customer: "Acme Traders".to_string(),
            authorized_by: "R. Singh".to_string(),
            reason: Some("Customer order".to_string()),
            lines: vec![
                GatePassLine {
                    product_name: "Portland Cement".to_string(),
                    sku: Some("CEM-43".to_string()),
                    quantity: dec!(5),
                    unit_abbreviation: "bag".to_string(),
                },
                GatePassLine {
                    product_name: "A very long product name that will not fit".to_string(),
                    sku: Some("LONG-001".to_string()),
                    quantity: dec!(120),
                    unit_abbreviation: "pcs".to_string(),
                },
            ],
        }
    }

    fn sample_shop() -> ShopDetails {
        ShopDetails {
            shop_name: "Sharma Hardware".to_string(),
            address: Some("12 Market Road".to_string()),
            contact_number: Some("+91 98765 43210".to_string()),
        }
    }

    #[test]
    fn no_line_exceeds_width() {
        let doc = render_document(&sample_shop(), &sample_pass());
        for line in doc.lines() {
            assert!(
                line.chars().count() <= LINE_WIDTH,
                "line too wide: {:?}",
                line
            );
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let shop = sample_shop();
        let pass = sample_pass();
        assert_eq!(
            render_document(&shop, &pass),
            render_document(&shop, &pass)
        );
    }

    #[test]
    fn document_carries_pass_fields() {
        let doc = render_document(&sample_shop(), &sample_pass());
        assert!(doc.contains("GP-1700000000000"));
        assert!(doc.contains("Acme Traders"));
        assert!(doc.contains("R. Singh"));
        assert!(doc.contains("Dispatch  : 2024-03-07"));
        assert!(doc.contains("Total Qty: 125"));
        assert!(doc.contains("GATE PASS"));
    }

    #[test]
    fn scan_payload_is_raw_pass_id() {
        let pass = sample_pass();
        assert_eq!(pass.scan_payload(), "GP-1700000000000");
    }
}
