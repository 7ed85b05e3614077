use crate::config::GeneratorConfig;
use crate::services::{
    DownloadController, InvoiceSession, LocalOutputStore, Notifier, OutputStore, PdfEngine,
    RenderEngine,
};
use invoice_core::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

/// One form session wired to its download pipeline.
pub struct Application {
    config: GeneratorConfig,
    session: InvoiceSession,
    controller: DownloadController,
}

impl Application {
    /// Wires the printpdf engine and the configured output directory.
    pub async fn build(config: GeneratorConfig, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let store = LocalOutputStore::new(&config.output.directory)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to prepare output directory {}: {}",
                    config.output.directory.display(),
                    e
                );
                e
            })?;

        Ok(Self::with_parts(
            config,
            Arc::new(PdfEngine::new()),
            Arc::new(store),
            notifier,
        ))
    }

    pub fn with_parts(
        config: GeneratorConfig,
        engine: Arc<dyn RenderEngine>,
        store: Arc<dyn OutputStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let controller = DownloadController::new(
            engine,
            store,
            notifier.clone(),
            config.template.clone(),
            config.output.file_name.clone(),
        );
        let session = InvoiceSession::new(notifier);

        tracing::info!(
            session_id = %session.id(),
            output = %config.output.directory.display(),
            file_name = %config.output.file_name,
            "Invoice session started"
        );

        Self {
            config,
            session,
            controller,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn session(&self) -> &InvoiceSession {
        &self.session
    }

    /// Mutable access to the form. Call [`Application::sync`] afterwards so
    /// the download trigger reflects the change.
    pub fn session_mut(&mut self) -> &mut InvoiceSession {
        &mut self.session
    }

    pub fn controller(&self) -> &DownloadController {
        &self.controller
    }

    pub fn sync(&self) {
        self.controller.sync(self.session.draft());
    }

    pub async fn download(&self) -> Result<PathBuf, AppError> {
        self.controller.download(self.session.draft()).await
    }
}
