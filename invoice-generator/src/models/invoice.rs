//! Invoice draft model for invoice-generator.

use crate::models::line_item::{parse_decimal_or_zero, ItemEntry, LineItem};
use chrono::NaiveDate;
use invoice_core::error::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

/// The invoice currently being edited. Items are append-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceDraft {
    items: Vec<LineItem>,
    pub client_name: String,
    pub invoice_date: Option<NaiveDate>,
    pub shoot_date: Option<NaiveDate>,
    /// Expected in [0, 100]; not clamped.
    pub discount_percent: Decimal,
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_discount(&self) -> bool {
        !self.discount_percent.is_zero()
    }

    /// Validates the entry and appends it. An item whose amount would push
    /// the subtotal past `Decimal::MAX` is rejected.
    pub fn add_item(&mut self, entry: &ItemEntry) -> Result<&LineItem, AppError> {
        entry.validate()?;
        let item = entry.to_line_item();
        if self.checked_subtotal_with(&item).is_none() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invoice total is too large"
            )));
        }
        self.items.push(item);
        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    fn checked_subtotal_with(&self, extra: &LineItem) -> Option<Decimal> {
        self.items
            .iter()
            .chain(std::iter::once(extra))
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.checked_amount()?))
    }

    pub fn set_client_name(&mut self, name: impl Into<String>) {
        self.client_name = name.into();
    }

    pub fn set_invoice_date(&mut self, date: Option<NaiveDate>) {
        self.invoice_date = date;
    }

    pub fn set_shoot_date(&mut self, date: Option<NaiveDate>) {
        self.shoot_date = date;
    }

    pub fn set_discount_percent(&mut self, percent: Decimal) {
        self.discount_percent = percent;
    }

    /// Sets the discount from raw text; non-numeric input becomes 0.
    pub fn set_discount_input(&mut self, raw: &str) {
        self.discount_percent = parse_decimal_or_zero(raw);
    }
}

/// Totals derived from a draft. Never stored on the draft itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total_after_discount: Decimal,
}
