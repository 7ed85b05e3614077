pub mod batch;
pub mod command;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "invoice-generator", version, about = "Build a photography invoice and save it as a PDF")]
pub struct Args {
    /// Extra configuration file layered over `configuration.*`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Mode>,
}

#[derive(Debug, Subcommand)]
pub enum Mode {
    /// Fill in the form line by line (default)
    Interactive,
    /// Render a draft stored as JSON
    Render {
        /// Path to the draft file
        #[arg(long)]
        draft: PathBuf,
        /// Directory to write the PDF into
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail on the first item that does not validate
        #[arg(long)]
        strict: bool,
    },
}

impl Args {
    pub fn mode(&self) -> &Mode {
        static INTERACTIVE: Mode = Mode::Interactive;
        self.command.as_ref().unwrap_or(&INTERACTIVE)
    }
}
