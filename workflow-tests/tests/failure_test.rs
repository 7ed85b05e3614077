//! Failure paths: render errors are reported and leave the form usable.

mod common;

use invoice_core::error::AppError;
use invoice_generator::config::GeneratorConfig;
use invoice_generator::services::{DownloadState, NotificationKind};
use workflow_tests::WorkflowTestContext;

#[tokio::test]
async fn missing_logo_fails_the_download() {
    let mut config = GeneratorConfig::default();
    config.template.logo_path = Some("/nonexistent/studio-logo.png".into());
    let mut ctx = WorkflowTestContext::with_config(config).await.unwrap();
    ctx.add_item("Portrait session", "150", "1").unwrap();

    let err = ctx.app.download().await.unwrap_err();

    assert!(matches!(err, AppError::RenderError(_)));
    let last = ctx.notifications().pop().unwrap();
    assert_eq!(last.kind, NotificationKind::Error);
    assert!(last.message.starts_with("Failed to generate PDF:"));
    assert!(matches!(ctx.app.controller().state(), DownloadState::Failed(_)));
    assert!(!ctx.pdf_path().exists());

    // items survive a failed render
    assert_eq!(ctx.app.session().draft().items().len(), 1);
}

#[tokio::test]
async fn overflowing_page_is_a_render_error() {
    let mut ctx = common::setup().await;
    for i in 0..80 {
        ctx.add_item(&format!("Print #{}", i + 1), "5", "1").unwrap();
    }

    let err = ctx.app.download().await.unwrap_err();

    assert!(err.to_string().contains("single page"));
    assert!(ctx.app.controller().state().is_enabled());
}

#[tokio::test]
async fn empty_form_has_nothing_to_download() {
    let ctx = common::setup().await;

    let err = ctx.app.download().await.unwrap_err();

    assert!(matches!(err, AppError::NothingToRender(_)));
    assert!(ctx.notifications().is_empty());
    assert!(!ctx.pdf_path().exists());
}
