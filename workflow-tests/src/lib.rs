//! End-to-end workflow tests for the invoice generator.
//!
//! Each test gets its own output directory and a recording notifier, and
//! drives the same [`Application`] the binary uses.
//!
//! ## Usage
//!
//! ```bash
//! cargo test -p workflow-tests
//! ```

use anyhow::{anyhow, Result};
use invoice_generator::config::GeneratorConfig;
use invoice_generator::services::{Notification, RecordingNotifier};
use invoice_generator::startup::Application;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,invoice_generator=debug,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A wired application writing into a private temporary directory.
pub struct WorkflowTestContext {
    pub app: Application,
    pub notifier: Arc<RecordingNotifier>,
    output: TempDir,
}

impl WorkflowTestContext {
    pub async fn new() -> Result<Self> {
        Self::with_config(GeneratorConfig::default()).await
    }

    /// Builds the context from `config`, redirecting output to a temp dir.
    pub async fn with_config(mut config: GeneratorConfig) -> Result<Self> {
        init_tracing();

        let output = tempfile::tempdir()?;
        config.output.directory = output.path().to_path_buf();

        let notifier = Arc::new(RecordingNotifier::new());
        let app = Application::build(config, notifier.clone())
            .await
            .map_err(|e| anyhow!("Failed to build application: {}", e))?;

        Ok(Self {
            app,
            notifier,
            output,
        })
    }

    pub fn output_dir(&self) -> &Path {
        self.output.path()
    }

    /// Where a successful download lands.
    pub fn pdf_path(&self) -> PathBuf {
        self.output
            .path()
            .join(&self.app.config().output.file_name)
    }

    /// Fills the entry fields from raw text and adds the item.
    pub fn add_item(&mut self, name: &str, cost: &str, quantity: &str) -> Result<()> {
        let session = self.app.session_mut();
        session.set_entry_name(name);
        session.set_entry_cost_input(cost);
        session.set_entry_quantity_input(quantity);
        session
            .add_item()
            .map_err(|e| anyhow!("Item '{}' rejected: {}", name, e))?;
        self.app.sync();
        Ok(())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifier.notifications()
    }
}

/// Checks that `bytes` look like a complete PDF file.
pub fn assert_pdf(bytes: &[u8]) {
    assert!(bytes.starts_with(b"%PDF-"), "missing PDF header");
    let tail = &bytes[bytes.len().saturating_sub(64)..];
    assert!(
        tail.windows(5).any(|w| w == b"%%EOF"),
        "missing PDF trailer"
    );
}
