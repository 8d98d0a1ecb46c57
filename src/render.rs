//! Printable quote document.
//!
//! Amounts use Mexican peso conventions: `$` prefix, `,` thousands
//! separator, `.` decimal point. Formatting only happens here; the values
//! in [`QuoteResult`] are never rounded.

use chrono::NaiveDate;

use crate::domain::{LineKind, ProjectConfig, QuoteResult};

pub const BUSINESS_NAME: &str = "RENUEVA KOBA";
pub const BUSINESS_TAGLINE: &str = "Sistemas de Recubrimiento";

const RULE_WIDTH: usize = 100;

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats `value` as currency with between `min_fraction` and
/// `max_fraction` decimals, dropping trailing zeros above the minimum.
pub fn format_currency(value: f64, min_fraction: usize, max_fraction: usize) -> String {
    let max_fraction = max_fraction.max(min_fraction);
    let rounded = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_fraction {
        frac.push('0');
    }

    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{}${}", sign, group_thousands(int_part))
    } else {
        format!("{}${}.{}", sign, group_thousands(int_part), frac)
    }
}

/// Line item amounts: up to two decimals, none when whole.
pub fn format_amount(value: f64) -> String {
    format_currency(value, 0, 2)
}

/// Renders the quote as a plain-text document ready to print.
pub fn print_quote(config: &ProjectConfig, quote: &QuoteResult, date: NaiveDate) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = Vec::with_capacity(quote.items.len() + 16);

    lines.push(format!("{} · {}", BUSINESS_NAME, BUSINESS_TAGLINE));
    lines.push(format!("Cotización                                Fecha: {}", date.format("%d/%m/%Y")));
    lines.push(format!(
        "Proyecto: {} m² de {} ({})",
        config.m2,
        config.selected_material,
        config.selected().brand
    ));
    lines.push(rule.clone());
    lines.push(format!(
        "  {:<26} {:<20} {:<10} {:<10} {:>14} {:>14}",
        "Concepto", "Marca", "Rend.", "Cant.", "P. Unitario", "Importe"
    ));
    lines.push(rule.clone());

    for item in &quote.items {
        let marker = if item.is_warning { "!" } else { " " };
        lines.push(format!(
            "{} {:<26} {:<20} {:<10} {:<10} {:>14} {:>14}",
            marker,
            item.concept,
            item.brand.as_deref().unwrap_or(""),
            item.yield_display.as_deref().unwrap_or(""),
            item.quantity,
            format_amount(item.unit_price),
            format_amount(item.total),
        ));
        lines.push(format!("  {}", item.detail));
    }

    lines.push(rule.clone());
    lines.push(format!("{:>84} {:>14}", "Subtotal", format_currency(quote.subtotal, 2, 2)));
    lines.push(format!("{:>84} {:>14}", "IVA (16%)", format_currency(quote.iva, 2, 2)));
    lines.push(format!("{:>84} {:>14}", "TOTAL", format_currency(quote.total, 0, 0)));
    lines.push(rule);

    let labor = quote.item(LineKind::Labor).map_or(0.0, |item| item.total);
    lines.push(format!(
        "Materiales {} · Mano de obra {} · Precios en MXN",
        format_amount(quote.materials_total()),
        format_amount(labor)
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
