//! The form session: owns the draft and the item entry fields.

use crate::models::{InvoiceDraft, ItemEntry, LineItem, Totals};
use crate::services::notifier::Notifier;
use crate::services::totals::compute_totals;
use chrono::NaiveDate;
use invoice_core::error::AppError;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const ITEM_ADDED_MESSAGE: &str = "Item added successfully";

pub struct InvoiceSession {
    id: Uuid,
    draft: InvoiceDraft,
    entry: ItemEntry,
    notifier: Arc<dyn Notifier>,
}

impl InvoiceSession {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            id: Uuid::new_v4(),
            draft: InvoiceDraft::new(),
            entry: ItemEntry::default(),
            notifier,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn entry(&self) -> &ItemEntry {
        &self.entry
    }

    /// Fresh totals for the current draft.
    pub fn totals(&self) -> Result<Totals, AppError> {
        compute_totals(&self.draft)
    }

    pub fn set_entry_name(&mut self, name: impl Into<String>) {
        self.entry.name = name.into();
    }

    pub fn set_entry_cost_input(&mut self, raw: &str) {
        self.entry.set_cost_input(raw);
    }

    pub fn set_entry_quantity_input(&mut self, raw: &str) {
        self.entry.set_quantity_input(raw);
    }

    /// Replaces all entry fields at once.
    pub fn set_entry(&mut self, entry: ItemEntry) {
        self.entry = entry;
    }

    /// Adds the current entry to the draft. On success the entry fields reset;
    /// on failure they are kept so the user can correct them.
    pub fn add_item(&mut self) -> Result<LineItem, AppError> {
        match self.draft.add_item(&self.entry) {
            Ok(item) => {
                let item = item.clone();
                info!(
                    session_id = %self.id,
                    name = %item.name,
                    quantity = item.quantity,
                    amount = %item.amount(),
                    items = self.draft.items().len(),
                    "Item added"
                );
                self.entry = ItemEntry::default();
                self.notifier.success(ITEM_ADDED_MESSAGE);
                Ok(item)
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Item rejected");
                self.notifier.error(&e.user_message());
                Err(e)
            }
        }
    }

    pub fn set_client_name(&mut self, name: impl Into<String>) {
        self.draft.set_client_name(name);
    }

    pub fn set_invoice_date(&mut self, date: Option<NaiveDate>) {
        self.draft.set_invoice_date(date);
    }

    pub fn set_shoot_date(&mut self, date: Option<NaiveDate>) {
        self.draft.set_shoot_date(date);
    }

    pub fn set_discount_percent(&mut self, percent: Decimal) {
        self.draft.set_discount_percent(percent);
    }

    pub fn set_discount_input(&mut self, raw: &str) {
        self.draft.set_discount_input(raw);
    }
}
