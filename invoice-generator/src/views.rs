//! Text views of the form for the terminal front end.

use crate::config::CurrencyConfig;
use crate::models::{InvoiceDraft, ItemEntry};
use crate::services::download::DownloadState;
use crate::services::format::{format_amount, format_long_date, format_money, format_percent};
use crate::services::totals::compute_totals;
use chrono::NaiveDate;

pub const DATE_PLACEHOLDER: &str = "Pick a date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub name: String,
    pub quantity: String,
    pub amount: String,
}

/// The running list of added items with its total rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsListView {
    pub rows: Vec<ItemRow>,
    pub totals: Vec<(String, String)>,
}

impl ItemsListView {
    /// `None` when there is nothing to list.
    pub fn from_draft(draft: &InvoiceDraft, currency: &CurrencyConfig) -> Option<Self> {
        if draft.is_empty() {
            return None;
        }

        let rows = draft
            .items()
            .iter()
            .map(|item| ItemRow {
                name: item.name.clone(),
                quantity: format!("Qty: {}", item.quantity),
                amount: format_money(item.amount(), currency),
            })
            .collect();

        let totals = match compute_totals(draft) {
            Ok(totals) => totals,
            Err(e) => {
                return Some(Self {
                    rows,
                    totals: vec![("Total".to_string(), e.user_message())],
                });
            }
        };
        let mut total_rows = vec![("Total".to_string(), format_money(totals.subtotal, currency))];
        if draft.has_discount() {
            total_rows.push((
                format!("Discount ({})", format_percent(draft.discount_percent)),
                format_money(-totals.discount_amount, currency),
            ));
            total_rows.push((
                "Total after discount".to_string(),
                format_money(totals.total_after_discount, currency),
            ));
        }

        Some(Self {
            rows,
            totals: total_rows,
        })
    }

    pub fn render(&self) -> String {
        let name_width = self
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .chain(self.totals.iter().map(|(label, _)| label.chars().count()))
            .max()
            .unwrap_or(0);

        let mut lines = Vec::with_capacity(self.rows.len() + self.totals.len() + 1);
        lines.push("Items".to_string());
        for row in &self.rows {
            lines.push(format!(
                "  {:<width$}  {:>10}  {:>14}",
                row.name,
                row.quantity,
                row.amount,
                width = name_width
            ));
        }
        for (label, value) in &self.totals {
            lines.push(format!(
                "  {:<width$}  {:>10}  {:>14}",
                label,
                "",
                value,
                width = name_width
            ));
        }
        lines.join("\n")
    }
}

pub fn date_button_label(date: Option<NaiveDate>) -> String {
    date.map(format_long_date)
        .unwrap_or_else(|| DATE_PLACEHOLDER.to_string())
}

/// Whole-form summary shown after each command.
pub fn render_form(
    draft: &InvoiceDraft,
    entry: &ItemEntry,
    download: &DownloadState,
    currency: &CurrencyConfig,
) -> String {
    let mut lines = vec![
        "Invoice Generator".to_string(),
        format!("  Client Name:  {}", display_or_dash(&draft.client_name)),
        format!("  Discount:     {}", format_percent(draft.discount_percent)),
        format!("  Invoice Date: {}", date_button_label(draft.invoice_date)),
        format!("  Shoot Date:   {}", date_button_label(draft.shoot_date)),
        format!(
            "  New item:     name={} cost={} qty={}",
            display_or_dash(&entry.name),
            format_amount(entry.unit_cost),
            entry.effective_quantity()
        ),
    ];

    if let Some(list) = ItemsListView::from_draft(draft, currency) {
        lines.push(list.render());
    }

    if let Some(label) = download.label() {
        let suffix = if download.is_enabled() { "" } else { " (disabled)" };
        lines.push(format!("[ {} ]{}", label, suffix));
    }

    lines.join("\n")
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
