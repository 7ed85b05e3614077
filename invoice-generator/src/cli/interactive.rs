//! The line-oriented form session.

use crate::cli::command::{parse, Command, HELP};
use crate::services::download::PREPARING_LABEL;
use crate::startup::Application;
use crate::views::{render_form, ItemsListView};
use invoice_core::error::AppError;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub async fn run<R, W>(app: &mut Application, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    app.sync();
    writeln!(out, "{}", form(app))?;
    writeln!(out, "Type 'help' for commands.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        if apply(app, command, out).await? == Flow::Quit {
            break;
        }
    }

    tracing::info!(
        session_id = %app.session().id(),
        items = app.session().draft().items().len(),
        "Invoice session ended"
    );
    Ok(())
}

pub async fn apply<W: Write>(app: &mut Application, command: Command, out: &mut W) -> anyhow::Result<Flow> {
    match command {
        Command::Client(name) => app.session_mut().set_client_name(name),
        Command::Discount(raw) => app.session_mut().set_discount_input(&raw),
        Command::InvoiceDate(date) => app.session_mut().set_invoice_date(date),
        Command::ShootDate(date) => app.session_mut().set_shoot_date(date),
        Command::ItemName(name) => app.session_mut().set_entry_name(name),
        Command::ItemCost(raw) => app.session_mut().set_entry_cost_input(&raw),
        Command::ItemQuantity(raw) => app.session_mut().set_entry_quantity_input(&raw),
        Command::Add => {
            // rejection is already reported through the notifier
            let _ = app.session_mut().add_item();
        }
        Command::Items => {
            let currency = &app.config().template.currency;
            match ItemsListView::from_draft(app.session().draft(), currency) {
                Some(view) => writeln!(out, "{}", view.render())?,
                None => writeln!(out, "No items yet.")?,
            }
        }
        Command::Show => writeln!(out, "{}", form(app))?,
        Command::Preview => match app.controller().preview(app.session().draft()) {
            Ok(document) => writeln!(out, "{}", document.plain_text())?,
            Err(AppError::NothingToRender(_)) => writeln!(out, "No items yet.")?,
            Err(e) => writeln!(out, "{}", e.user_message())?,
        },
        Command::Download => {
            app.sync();
            let state = app.controller().state();
            if !state.is_visible() {
                writeln!(out, "Add at least one item before downloading.")?;
            } else if state.is_enabled() {
                writeln!(out, "{}", PREPARING_LABEL)?;
                out.flush()?;
                // outcome is reported through the notifier
                let _ = app.download().await;
            }
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }

    app.sync();
    Ok(Flow::Continue)
}

fn form(app: &Application) -> String {
    render_form(
        app.session().draft(),
        app.session().entry(),
        &app.controller().state(),
        &app.config().template.currency,
    )
}
