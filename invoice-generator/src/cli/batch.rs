//! Renders a draft described in a JSON file without prompting.

use crate::models::{lenient_decimal, ItemEntry};
use crate::startup::Application;
use chrono::NaiveDate;
use invoice_core::error::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-disk form of a draft. Items go through the same validation as the
/// interactive form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftFile {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub shoot_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_discount")]
    pub discount_percent: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

impl DraftFile {
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!(
                "Failed to read draft {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid draft file: {}", e)))
    }
}

fn lenient_discount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    lenient_decimal(deserializer).map(Some)
}

#[derive(Debug)]
pub struct BatchReport {
    pub path: PathBuf,
    pub added: usize,
    /// Zero-based positions of items that failed validation.
    pub rejected: Vec<usize>,
}

/// Fills the session from `file` and downloads the result. With `strict`,
/// the first rejected item aborts the run.
pub async fn render_draft(
    app: &mut Application,
    file: DraftFile,
    strict: bool,
) -> Result<BatchReport, AppError> {
    let session = app.session_mut();
    session.set_client_name(file.client_name);
    session.set_invoice_date(file.invoice_date);
    session.set_shoot_date(file.shoot_date);
    if let Some(discount) = file.discount_percent {
        session.set_discount_percent(discount);
    }

    let mut added = 0;
    let mut rejected = Vec::new();
    for (index, entry) in file.items.into_iter().enumerate() {
        session.set_entry(entry);
        match session.add_item() {
            Ok(_) => added += 1,
            Err(e) if strict => {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Item {} rejected: {}",
                    index + 1,
                    e.user_message()
                )));
            }
            Err(_) => {
                warn!(item = index + 1, "Skipping rejected item");
                session.set_entry(ItemEntry::default());
                rejected.push(index);
            }
        }
    }

    app.sync();
    let path = app.download().await?;
    info!(added, rejected = rejected.len(), path = %path.display(), "Draft rendered");

    Ok(BatchReport {
        path,
        added,
        rejected,
    })
}
