//! Parsing of interactive form commands.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Client(String),
    Discount(String),
    InvoiceDate(Option<NaiveDate>),
    ShootDate(Option<NaiveDate>),
    ItemName(String),
    ItemCost(String),
    ItemQuantity(String),
    Add,
    Items,
    Show,
    Preview,
    Download,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands")]
    Unknown(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD or 'clear'")]
    InvalidDate(String),
    #[error("'{0}' does not take an argument")]
    UnexpectedArgument(&'static str),
}

pub const HELP: &str = "\
Commands:
  client <name>                   set the client name
  discount <percent>              set the discount percentage
  invoice-date <YYYY-MM-DD|clear> set or clear the invoice date
  shoot-date <YYYY-MM-DD|clear>   set or clear the shoot date
  name <text>                     item name for the next item
  cost <amount>                   item cost for the next item
  qty <n>                         item quantity for the next item
  add                             add the item to the invoice
  items                           list added items and totals
  show                            show the whole form
  preview                         print the invoice as it would be rendered
  download                        write the invoice PDF
  help                            show this help
  quit                            leave";

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((k, r)) => (k, r.trim()),
        None => (line, ""),
    };

    let command = match keyword.to_ascii_lowercase().as_str() {
        "client" => Command::Client(rest.to_string()),
        "discount" => Command::Discount(rest.to_string()),
        "invoice-date" => Command::InvoiceDate(parse_date(rest)?),
        "shoot-date" => Command::ShootDate(parse_date(rest)?),
        "name" => Command::ItemName(rest.to_string()),
        "cost" => Command::ItemCost(rest.to_string()),
        "qty" | "quantity" => Command::ItemQuantity(rest.to_string()),
        "add" => no_argument("add", rest, Command::Add)?,
        "items" => no_argument("items", rest, Command::Items)?,
        "show" => no_argument("show", rest, Command::Show)?,
        "preview" => no_argument("preview", rest, Command::Preview)?,
        "download" => no_argument("download", rest, Command::Download)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn no_argument(name: &'static str, rest: &str, command: Command) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::UnexpectedArgument(name))
    }
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, CommandError> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("clear") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CommandError::InvalidDate(raw.to_string()))
}
