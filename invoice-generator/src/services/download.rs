//! The "Download Invoice PDF" affordance.
//!
//! The controller owns the trigger state and runs the snapshot → document →
//! engine → file pipeline. State changes are published on a `watch` channel
//! so a front end can show the loading label while the engine works.

use crate::config::TemplateConfig;
use crate::models::{DocumentDescription, InvoiceDraft};
use crate::services::document_builder::build_document;
use crate::services::notifier::Notifier;
use crate::services::output::OutputStore;
use crate::services::renderer::RenderEngine;
use crate::services::totals::compute_totals;
use invoice_core::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

pub const DOWNLOAD_LABEL: &str = "Download Invoice PDF";
pub const PREPARING_LABEL: &str = "Preparing PDF...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadState {
    /// No items; nothing is offered.
    Hidden,
    Ready,
    /// The engine is running; the trigger is disabled.
    Preparing,
    /// The last attempt failed; the trigger is enabled again.
    Failed(String),
}

impl DownloadState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, DownloadState::Hidden)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, DownloadState::Ready | DownloadState::Failed(_))
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            DownloadState::Hidden => None,
            DownloadState::Preparing => Some(PREPARING_LABEL),
            DownloadState::Ready | DownloadState::Failed(_) => Some(DOWNLOAD_LABEL),
        }
    }
}

fn nothing_to_render() -> AppError {
    AppError::NothingToRender("Add at least one item before downloading".to_string())
}

pub struct DownloadController {
    engine: Arc<dyn RenderEngine>,
    store: Arc<dyn OutputStore>,
    notifier: Arc<dyn Notifier>,
    template: TemplateConfig,
    file_name: String,
    state: watch::Sender<DownloadState>,
}

impl DownloadController {
    pub fn new(
        engine: Arc<dyn RenderEngine>,
        store: Arc<dyn OutputStore>,
        notifier: Arc<dyn Notifier>,
        template: TemplateConfig,
        file_name: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(DownloadState::Hidden);
        Self {
            engine,
            store,
            notifier,
            template,
            file_name: file_name.into(),
            state,
        }
    }

    pub fn state(&self) -> DownloadState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DownloadState> {
        self.state.subscribe()
    }

    pub fn template(&self) -> &TemplateConfig {
        &self.template
    }

    /// Shows or hides the trigger to match the draft. Leaves a running render
    /// and a reported failure alone.
    pub fn sync(&self, draft: &InvoiceDraft) {
        self.state.send_if_modified(|state| {
            let next = match state {
                DownloadState::Preparing => return false,
                _ if draft.is_empty() => DownloadState::Hidden,
                DownloadState::Hidden => DownloadState::Ready,
                _ => return false,
            };
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
    }

    /// Description of what a download would produce right now.
    pub fn preview(&self, draft: &InvoiceDraft) -> Result<DocumentDescription, AppError> {
        if draft.is_empty() {
            return Err(nothing_to_render());
        }
        let totals = compute_totals(draft)?;
        Ok(build_document(draft, &totals, &self.template))
    }

    /// Renders the current draft and writes the PDF. Failures are reported to
    /// the user and leave the trigger enabled.
    #[instrument(skip(self, draft), fields(items = draft.items().len(), file = %self.file_name))]
    pub async fn download(&self, draft: &InvoiceDraft) -> Result<PathBuf, AppError> {
        if draft.is_empty() {
            // a render already in flight keeps its state
            self.sync(draft);
            return Err(nothing_to_render());
        }

        let started = self.state.send_if_modified(|state| {
            if *state == DownloadState::Preparing {
                return false;
            }
            *state = DownloadState::Preparing;
            true
        });
        if !started {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "A PDF is already being prepared"
            )));
        }

        let result = match self.preview(draft) {
            Ok(document) => self.render_to_file(&document).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(path) => {
                info!(path = %path.display(), engine = self.engine.name(), "Invoice PDF written");
                self.state.send_replace(DownloadState::Ready);
                self.notifier
                    .success(&format!("Invoice saved to {}", path.display()));
                Ok(path)
            }
            Err(e) => {
                warn!(error = %e, "Invoice PDF generation failed");
                let message = e.user_message();
                self.state.send_replace(DownloadState::Failed(message.clone()));
                self.notifier.error(&message);
                Err(e)
            }
        }
    }

    /// Hands the description to the engine and stores the bytes.
    pub async fn render_to_file(&self, document: &DocumentDescription) -> Result<PathBuf, AppError> {
        let bytes = self.engine.render(document).await?;
        self.store.save(&self.file_name, bytes).await
    }
}
