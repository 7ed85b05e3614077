//! Smoke test to verify workflow-tests infrastructure.

mod common;

use invoice_generator::services::DownloadState;

#[tokio::test]
async fn workflow_context_starts_with_an_empty_form() {
    let ctx = common::setup().await;

    assert!(ctx.app.session().draft().is_empty());
    assert_eq!(ctx.app.controller().state(), DownloadState::Hidden);
    assert!(ctx.output_dir().is_dir());
    assert!(ctx.notifications().is_empty());
}
