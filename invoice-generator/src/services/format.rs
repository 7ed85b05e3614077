//! Display formatting for money, percentages and dates.

use crate::config::{CurrencyConfig, CurrencyPosition};
use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Printed in place of a date that was never picked.
pub const DATE_FALLBACK: &str = "Not specified";

/// Exactly two fractional digits, half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Two-decimal amount with the configured currency label.
pub fn format_money(amount: Decimal, currency: &CurrencyConfig) -> String {
    let digits = format_amount(amount.abs());
    let sign = if amount.is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    match currency.position {
        CurrencyPosition::Prefix => format!("{}{}{}", sign, currency.label, digits),
        CurrencyPosition::Suffix => format!("{}{} {}", sign, digits, currency.label),
    }
}

/// `12.50` renders as `12.5`, `10.00` as `10`.
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}

/// Long-form date, e.g. `October 18th, 2026`.
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// Long-form date or [`DATE_FALLBACK`].
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_long_date)
        .unwrap_or_else(|| DATE_FALLBACK.to_string())
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
