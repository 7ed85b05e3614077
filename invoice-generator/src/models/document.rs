//! Engine-agnostic description of the printable invoice page.
//!
//! The builder produces this tree; a [`RenderEngine`](crate::services::RenderEngine)
//! consumes it. Nothing here knows about PDF.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in millimetres.
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDescription {
    /// Document metadata title.
    pub title: String,
    pub page: Page,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub size: PageSize,
    pub padding_mm: f32,
    /// Drawn behind the content when present.
    pub watermark: Option<String>,
    pub blocks: Vec<Block>,
}

/// Content blocks in top-to-bottom order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Block {
    Image(ImageBlock),
    Heading(String),
    Paragraph(Vec<String>),
    Table(Table),
    Summary(Vec<SummaryLine>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub path: PathBuf,
    pub max_width_mm: f32,
    pub max_height_mm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
    /// Rendered bold and larger; used for the final total.
    pub emphasis: bool,
}

impl SummaryLine {
    pub fn text(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

impl DocumentDescription {
    pub fn table(&self) -> Option<&Table> {
        self.page.blocks.iter().find_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn summary(&self) -> &[SummaryLine] {
        self.page
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Summary(lines) => Some(lines.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn heading(&self) -> Option<&str> {
        self.page.blocks.iter().find_map(|b| match b {
            Block::Heading(h) => Some(h.as_str()),
            _ => None,
        })
    }

    /// Plain-text rendition of the page, one line per printed line.
    pub fn plain_text(&self) -> String {
        let mut out = Vec::new();
        for block in &self.page.blocks {
            match block {
                Block::Image(img) => out.push(format!("[logo: {}]", img.path.display())),
                Block::Heading(h) => out.push(h.clone()),
                Block::Paragraph(lines) => out.extend(lines.iter().cloned()),
                Block::Table(table) => {
                    out.push(table.header.join(" | "));
                    for row in &table.rows {
                        out.push(row.join(" | "));
                    }
                }
                Block::Summary(lines) => out.extend(lines.iter().map(SummaryLine::text)),
            }
        }
        if let Some(mark) = &self.page.watermark {
            out.push(format!("[watermark: {}]", mark));
        }
        out.join("\n")
    }
}
