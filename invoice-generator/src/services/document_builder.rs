//! Assembles the page description from a draft snapshot.

use crate::config::TemplateConfig;
use crate::models::{
    Block, DocumentDescription, ImageBlock, InvoiceDraft, Page, SummaryLine, Table, Totals,
};
use crate::services::format::{format_money, format_optional_date, format_percent};

pub const PAGE_PADDING_MM: f32 = 10.6;
pub const LOGO_MAX_WIDTH_MM: f32 = 45.0;
pub const LOGO_MAX_HEIGHT_MM: f32 = 22.0;
pub const TABLE_HEADER: [&str; 3] = ["Item", "Quantity", "Amount"];

pub fn build_document(
    draft: &InvoiceDraft,
    totals: &Totals,
    template: &TemplateConfig,
) -> DocumentDescription {
    let title = document_title(draft, template);
    let mut blocks = Vec::with_capacity(6);

    if let Some(path) = &template.logo_path {
        blocks.push(Block::Image(ImageBlock {
            path: path.clone(),
            max_width_mm: LOGO_MAX_WIDTH_MM,
            max_height_mm: LOGO_MAX_HEIGHT_MM,
        }));
    }

    blocks.push(Block::Heading(title.clone()));
    blocks.push(Block::Paragraph(vec![
        format!("Invoice Date: {}", format_optional_date(draft.invoice_date)),
        format!("Shoot Date: {}", format_optional_date(draft.shoot_date)),
    ]));
    blocks.push(Block::Table(item_table(draft, template)));
    blocks.push(Block::Summary(summary_lines(draft, totals, template)));

    DocumentDescription {
        title,
        page: Page {
            size: template.page_size,
            padding_mm: PAGE_PADDING_MM,
            watermark: template.watermark.clone().filter(|w| !w.trim().is_empty()),
            blocks,
        },
    }
}

/// The client name when one was entered, otherwise the generic header.
pub fn document_title(draft: &InvoiceDraft, template: &TemplateConfig) -> String {
    let client = draft.client_name.trim();
    if client.is_empty() {
        template.header.clone()
    } else {
        client.to_string()
    }
}

fn item_table(draft: &InvoiceDraft, template: &TemplateConfig) -> Table {
    Table {
        header: TABLE_HEADER.iter().map(|h| h.to_string()).collect(),
        rows: draft
            .items()
            .iter()
            .map(|item| {
                vec![
                    item.name.clone(),
                    item.quantity.to_string(),
                    format_money(item.amount(), &template.currency),
                ]
            })
            .collect(),
    }
}

fn summary_lines(draft: &InvoiceDraft, totals: &Totals, template: &TemplateConfig) -> Vec<SummaryLine> {
    let currency = &template.currency;
    let total = SummaryLine {
        label: "Total".to_string(),
        value: format_money(totals.total_after_discount, currency),
        emphasis: true,
    };

    if !(template.show_discount_rows && draft.has_discount()) {
        return vec![total];
    }

    vec![
        SummaryLine {
            label: "Subtotal".to_string(),
            value: format_money(totals.subtotal, currency),
            emphasis: false,
        },
        SummaryLine {
            label: format!("Discount ({})", format_percent(draft.discount_percent)),
            value: format_money(-totals.discount_amount, currency),
            emphasis: false,
        },
        total,
    ]
}
