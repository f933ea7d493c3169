//! Display helpers shared by the CLI views.

use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `12.5` with label `zł` renders as `12.50 zł`.
pub fn format_amount(amount: f64, currency_label: &str) -> String {
    // Avoid printing `-0.00` for tiny negative rounding leftovers.
    let amount = if amount.abs() < 0.005 { 0.0 } else { amount };
    if currency_label.is_empty() {
        format!("{amount:.2}")
    } else {
        format!("{amount:.2} {currency_label}")
    }
}

/// Renders a stored `YYYY-MM-DD` date as `Jan 1, 2024`, or returns it unchanged.
pub fn format_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
