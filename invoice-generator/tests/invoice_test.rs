//! Draft, totals and page description integration tests.

use chrono::NaiveDate;
use invoice_generator::config::{CurrencyConfig, CurrencyPosition, TemplateConfig};
use invoice_generator::models::{Block, InvoiceDraft, ItemEntry};
use invoice_generator::services::{build_document, compute_totals};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn wedding_draft() -> InvoiceDraft {
    let mut draft = InvoiceDraft::new();
    draft.set_client_name("Jane Doe");
    draft.set_invoice_date(NaiveDate::from_ymd_opt(2026, 10, 18));
    draft.set_shoot_date(NaiveDate::from_ymd_opt(2026, 9, 1));
    draft
        .add_item(&ItemEntry::new("Wedding coverage", dec("1200"), Some(1)))
        .unwrap();
    draft
        .add_item(&ItemEntry::new("Prints", dec("12.5"), Some(4)))
        .unwrap();
    draft
}

#[test]
fn totals_follow_items_and_discount() {
    let mut draft = wedding_draft();

    let totals = compute_totals(&draft).unwrap();
    assert_eq!(totals.subtotal, dec("1250"));
    assert_eq!(totals.discount_amount, Decimal::ZERO);
    assert_eq!(totals.total_after_discount, dec("1250"));

    draft.set_discount_input("15");
    let totals = compute_totals(&draft).unwrap();
    assert_eq!(totals.discount_amount, dec("187.5"));
    assert_eq!(totals.total_after_discount, dec("1062.5"));
    assert_eq!(
        totals.subtotal - totals.discount_amount,
        totals.total_after_discount
    );
}

#[test]
fn document_lists_every_item_in_order() {
    let draft = wedding_draft();
    let document = build_document(&draft, &compute_totals(&draft).unwrap(), &TemplateConfig::default());

    assert_eq!(document.heading(), Some("Jane Doe"));
    let table = document.table().unwrap();
    assert_eq!(table.header, ["Item", "Quantity", "Amount"]);
    assert_eq!(
        table.rows,
        vec![
            vec!["Wedding coverage", "1", "$1200.00"],
            vec!["Prints", "4", "$50.00"],
        ]
    );

    let dates = document
        .page
        .blocks
        .iter()
        .find_map(|b| match b {
            Block::Paragraph(lines) => Some(lines.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        dates,
        ["Invoice Date: October 18th, 2026", "Shoot Date: September 1st, 2026"]
    );
}

#[test]
fn discounted_summary_and_suffix_currency() {
    let mut draft = wedding_draft();
    draft.set_discount_input("10");
    let template = TemplateConfig {
        currency: CurrencyConfig {
            label: "EUR".to_string(),
            position: CurrencyPosition::Suffix,
        },
        ..TemplateConfig::default()
    };

    let document = build_document(&draft, &compute_totals(&draft).unwrap(), &template);
    let summary: Vec<String> = document.summary().iter().map(|l| l.text()).collect();

    assert_eq!(
        summary,
        [
            "Subtotal: 1250.00 EUR",
            "Discount (10%): -125.00 EUR",
            "Total: 1125.00 EUR",
        ]
    );
    assert!(document.summary().last().unwrap().emphasis);
}

#[test]
fn missing_details_fall_back() {
    let mut draft = InvoiceDraft::new();
    draft
        .add_item(&ItemEntry::new("Headshots", dec("80"), None))
        .unwrap();

    let document = build_document(&draft, &compute_totals(&draft).unwrap(), &TemplateConfig::default());
    let text = document.plain_text();

    assert!(text.starts_with("Photography Invoice"));
    assert!(text.contains("Invoice Date: Not specified"));
    assert!(text.contains("Total: $80.00"));
}
