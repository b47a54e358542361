use crate::domain::model::{Amount, Quote};
use crate::utils::error::{QuoteError, Result};
use serde::Serialize;
use std::fmt::Write as _;

const UNKNOWN_MARK: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub fn render(quote: &Quote, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(quote)),
        OutputFormat::Json => render_json(quote),
        OutputFormat::Csv => render_csv(quote),
    }
}

pub fn format_usd(amount: Amount) -> String {
    match amount {
        Amount::Known(v) => format!("${:.2}", v),
        Amount::Unknown => UNKNOWN_MARK.to_string(),
    }
}

fn text_or_mark(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN_MARK)
}

pub fn render_table(quote: &Quote) -> String {
    let mut out = String::new();

    if let Some(details) = &quote.details {
        let _ = writeln!(out, "{}", details);
        let _ = writeln!(out);
    }

    if !quote.port_hauls.is_empty() {
        let _ = writeln!(out, "{:<24} {:>12}", "Port", "Inland haul");
        for haul in &quote.port_hauls {
            let _ = writeln!(out, "{:<24} {:>12}", haul.port, format_usd(haul.cost));
        }
        let _ = writeln!(out);
    }

    let class = quote.vehicle_class.map(|c| c.to_string());
    let mut rows: Vec<(&str, String)> = vec![
        ("Auction", text_or_mark(quote.auction.as_deref()).to_string()),
        ("Location", text_or_mark(quote.location.as_deref()).to_string()),
        ("Vehicle type", text_or_mark(class.as_deref()).to_string()),
        ("Best port", text_or_mark(quote.best_port.as_deref()).to_string()),
        ("Purchase price", format_usd(quote.purchase_price)),
    ];
    if quote.fee_bearing {
        rows.push(("Auction fee", format_usd(quote.auction_fee)));
    }
    rows.extend([
        ("Inland haul", format_usd(quote.inland_haul)),
        ("Sea freight", format_usd(quote.sea_freight)),
        ("Port expedition", format_usd(quote.expedition_converted)),
        ("Onward delivery", format_usd(quote.expedition_fixed)),
        ("Customs duty", format_usd(quote.customs_duty)),
        ("Excise", format_usd(quote.excise)),
        ("VAT", format_usd(quote.vat)),
        ("Customs total", format_usd(quote.customs_total)),
        ("Logistics total", format_usd(quote.logistics_total)),
        ("Grand total", format_usd(quote.grand_total)),
    ]);

    for (label, value) in rows {
        let _ = writeln!(out, "{:<24} {:>12}", label, value);
    }
    out
}

pub fn render_json(quote: &Quote) -> Result<String> {
    Ok(serde_json::to_string_pretty(quote)?)
}

#[derive(Serialize)]
struct CsvRow<'a> {
    item: &'a str,
    amount_usd: Option<f64>,
    known: bool,
}

pub fn render_csv(quote: &Quote) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (item, amount) in quote.line_items() {
        writer.serialize(CsvRow {
            item,
            amount_usd: amount.value(),
            known: amount.is_known(),
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| QuoteError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| QuoteError::ReportError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}
