//! Totals arithmetic. Recomputed on every call; nothing is cached.
//!
//! All arithmetic is checked. Amounts beyond the `Decimal` range, such as a
//! discount of `1e28` percent, are reported as an error instead of a panic.

use crate::models::{InvoiceDraft, LineItem, Totals};
use invoice_core::error::AppError;
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn out_of_range(what: &str) -> AppError {
    AppError::BadRequest(anyhow::anyhow!("{} is out of range", what))
}

pub fn line_amount(item: &LineItem) -> Result<Decimal, AppError> {
    item.checked_amount()
        .ok_or_else(|| out_of_range(&format!("Amount for '{}'", item.name)))
}

pub fn compute_totals(draft: &InvoiceDraft) -> Result<Totals, AppError> {
    let subtotal = draft
        .items()
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| {
            sum.checked_add(line_amount(item)?)
                .ok_or_else(|| out_of_range("Subtotal"))
        })?;

    let discount_amount = subtotal
        .checked_mul(draft.discount_percent)
        .and_then(|d| d.checked_div(HUNDRED))
        .ok_or_else(|| out_of_range("Discount"))?;
    let total_after_discount = subtotal
        .checked_sub(discount_amount)
        .ok_or_else(|| out_of_range("Total"))?;

    Ok(Totals {
        subtotal,
        discount_amount,
        total_after_discount,
    })
}
