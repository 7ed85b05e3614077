pub mod document_builder;
pub mod download;
pub mod format;
pub mod notifier;
pub mod output;
pub mod renderer;
pub mod session;
pub mod totals;

pub use document_builder::build_document;
pub use download::{DownloadController, DownloadState};
pub use notifier::{ConsoleNotifier, Notification, NotificationKind, Notifier, RecordingNotifier};
pub use output::{LocalOutputStore, OutputStore};
pub use renderer::{render_pdf, PdfEngine, RenderEngine};
pub use session::InvoiceSession;
pub use totals::{compute_totals, line_amount};
