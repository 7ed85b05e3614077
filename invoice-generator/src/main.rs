use clap::Parser;
use invoice_core::observability::init_tracing;
use invoice_generator::cli::batch::{render_draft, DraftFile};
use invoice_generator::cli::{interactive, Args, Mode};
use invoice_generator::config::GeneratorConfig;
use invoice_generator::services::ConsoleNotifier;
use invoice_generator::startup::Application;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = GeneratorConfig::load(args.config.as_deref()).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    if let Mode::Render {
        output: Some(dir), ..
    } = args.mode()
    {
        config.output.directory = dir.clone();
    }

    init_tracing(
        "invoice-generator",
        &config.common.log_level,
        config.common.log_format,
    );

    let mut app = Application::build(config, Arc::new(ConsoleNotifier)).await?;

    match args.mode() {
        Mode::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            interactive::run(&mut app, stdin, &mut stdout).await?;
        }
        Mode::Render { draft, strict, .. } => {
            let file = DraftFile::load(draft).await?;
            let report = render_draft(&mut app, file, *strict).await?;
            if !report.rejected.is_empty() {
                tracing::warn!(
                    rejected = ?report.rejected,
                    "Some items were skipped"
                );
            }
            println!("{}", report.path.display());
        }
    }

    Ok(())
}
