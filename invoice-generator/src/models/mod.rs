//! Domain models for invoice-generator.

mod document;
mod invoice;
mod line_item;

pub use document::{Block, DocumentDescription, ImageBlock, Page, PageSize, SummaryLine, Table};
pub use invoice::{InvoiceDraft, Totals};
pub use line_item::{parse_decimal_or_zero, ItemEntry, LineItem};
pub(crate) use line_item::lenient_decimal;
