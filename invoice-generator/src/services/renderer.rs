//! PDF rendering of a [`DocumentDescription`].
//!
//! The rest of the crate only sees the [`RenderEngine`] trait; [`PdfEngine`]
//! is the `printpdf` implementation. Layout is a single fixed page: content
//! that does not fit is an error rather than a second page.

use crate::models::{Block, DocumentDescription, ImageBlock, SummaryLine, Table};
use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbImage};
use invoice_core::error::AppError;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Px, Rect, Rgb,
};
use tracing::instrument;

const HEADING_FONT_SIZE: f32 = 24.0;
const PARAGRAPH_FONT_SIZE: f32 = 12.0;
const TABLE_FONT_SIZE: f32 = 10.0;
const SUMMARY_FONT_SIZE: f32 = 14.0;
const WATERMARK_FONT_SIZE: f32 = 64.0;

/// Vertical gap after each block (20pt).
const BLOCK_GAP_MM: f32 = 7.0;
const LINE_HEIGHT_MM: f32 = 5.5;
const TABLE_ROW_HEIGHT_MM: f32 = 8.0;
const CELL_PADDING_MM: f32 = 2.5;
/// Extra height per wrapped line inside a table cell.
const TABLE_LINE_HEIGHT_MM: f32 = 4.5;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance as a fraction of the font size.
const HELVETICA_AVG_ADVANCE: f32 = 0.55;

#[async_trait]
pub trait RenderEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn render(&self, document: &DocumentDescription) -> Result<Vec<u8>, AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct PdfEngine;

impl PdfEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RenderEngine for PdfEngine {
    fn name(&self) -> &'static str {
        "printpdf"
    }

    #[instrument(skip(self, document), fields(engine = "printpdf", title = %document.title))]
    async fn render(&self, document: &DocumentDescription) -> Result<Vec<u8>, AppError> {
        let document = document.clone();
        tokio::task::spawn_blocking(move || render_pdf(&document))
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("render task failed: {}", e)))?
    }
}

fn render_err(msg: impl std::fmt::Display) -> AppError {
    AppError::RenderError(anyhow::anyhow!("{}", msg))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Page cursor; `y` is the baseline position measured from the bottom edge.
struct Cursor {
    left: f32,
    right: f32,
    bottom: f32,
    y: f32,
}

impl Cursor {
    fn advance(&mut self, mm: f32) -> Result<(), AppError> {
        self.y -= mm;
        if self.y < self.bottom {
            return Err(render_err(
                "invoice content does not fit on a single page",
            ));
        }
        Ok(())
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }
}

/// Renders synchronously. Used directly by [`PdfEngine`] on a blocking thread.
pub fn render_pdf(document: &DocumentDescription) -> Result<Vec<u8>, AppError> {
    let (width, height) = document.page.size.dimensions_mm();
    let padding = document.page.padding_mm;

    let (doc, page1, layer1) = PdfDocument::new(&document.title, Mm(width), Mm(height), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_err)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_err)?,
    };

    if let Some(mark) = &document.page.watermark {
        draw_watermark(&layer, &fonts, mark, width, height);
    }

    let mut cursor = Cursor {
        left: padding,
        right: width - padding,
        bottom: padding,
        y: height - padding,
    };

    for block in &document.page.blocks {
        match block {
            Block::Image(img) => draw_image(&layer, img, &mut cursor)?,
            Block::Heading(text) => {
                cursor.advance(HEADING_FONT_SIZE * PT_TO_MM)?;
                set_fill_gray(&layer, 0.0);
                layer.use_text(text, HEADING_FONT_SIZE, Mm(cursor.left), Mm(cursor.y), &fonts.bold);
                cursor.advance(BLOCK_GAP_MM)?;
            }
            Block::Paragraph(lines) => {
                set_fill_gray(&layer, 0.0);
                for line in lines {
                    cursor.advance(LINE_HEIGHT_MM)?;
                    layer.use_text(line, PARAGRAPH_FONT_SIZE, Mm(cursor.left), Mm(cursor.y), &fonts.regular);
                }
                cursor.advance(BLOCK_GAP_MM)?;
            }
            Block::Table(table) => draw_table(&layer, &fonts, table, &mut cursor)?,
            Block::Summary(lines) => draw_summary(&layer, &fonts, lines, &mut cursor)?,
        }
    }

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer).map_err(render_err)?;
    writer.into_inner().map_err(render_err)
}

fn set_fill_gray(layer: &PdfLayerReference, gray: f32) {
    layer.set_fill_color(Color::Rgb(Rgb::new(gray, gray, gray, None)));
}

fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * HELVETICA_AVG_ADVANCE * PT_TO_MM
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y1)), false),
            (Point::new(Mm(x2), Mm(y2)), false),
        ],
        is_closed: false,
    });
}

fn draw_watermark(layer: &PdfLayerReference, fonts: &Fonts, mark: &str, width: f32, height: f32) {
    let text_width = text_width_mm(mark, WATERMARK_FONT_SIZE);
    let x = ((width - text_width) / 2.0).max(0.0);
    set_fill_gray(layer, 0.88);
    layer.use_text(mark, WATERMARK_FONT_SIZE, Mm(x), Mm(height / 2.0), &fonts.bold);
    set_fill_gray(layer, 0.0);
}

fn draw_image(layer: &PdfLayerReference, block: &ImageBlock, cursor: &mut Cursor) -> Result<(), AppError> {
    let logo = image::open(&block.path).map_err(|e| {
        render_err(format!("failed to load logo {}: {}", block.path.display(), e))
    })?;
    let (width_px, height_px, raw) = flatten_on_white(&logo);
    if width_px == 0 || height_px == 0 {
        return Err(render_err(format!("logo {} is empty", block.path.display())));
    }

    let aspect = width_px as f32 / height_px as f32;
    let (w_mm, h_mm) = if block.max_width_mm / block.max_height_mm > aspect {
        (block.max_height_mm * aspect, block.max_height_mm)
    } else {
        (block.max_width_mm, block.max_width_mm / aspect)
    };

    cursor.advance(h_mm)?;

    let image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: raw,
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    let dpi = width_px as f32 / (w_mm / 25.4);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(cursor.left)),
            translate_y: Some(Mm(cursor.y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    cursor.advance(BLOCK_GAP_MM)
}

/// Composites transparency against white; PDF XObjects here carry no alpha.
fn flatten_on_white(img: &DynamicImage) -> (u32, u32, Vec<u8>) {
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut rgb = RgbImage::new(w, h);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)) as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    (w, h, rgb.into_raw())
}

fn draw_table(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    table: &Table,
    cursor: &mut Cursor,
) -> Result<(), AppError> {
    let columns = table.column_count().max(1);
    let col_width = cursor.width() / columns as f32;
    let max_chars = cell_chars(col_width);
    let top = cursor.y;
    let mut row_bottoms = Vec::with_capacity(table.rows.len() + 1);

    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(0.75);

    // header row, shaded #f0f0f0
    let header = wrap_row(&table.header, max_chars);
    let height = row_height(&header);
    cursor.advance(height)?;
    set_fill_gray(layer, 0.94);
    layer.add_rect(Rect::new(
        Mm(cursor.left),
        Mm(cursor.y),
        Mm(cursor.right),
        Mm(cursor.y + height),
    ));
    set_fill_gray(layer, 0.0);
    draw_row(layer, &fonts.bold, &header, col_width, cursor.left, cursor.y + height);
    row_bottoms.push(cursor.y);

    for row in &table.rows {
        let cells = wrap_row(row, max_chars);
        let height = row_height(&cells);
        cursor.advance(height)?;
        draw_row(layer, &fonts.regular, &cells, col_width, cursor.left, cursor.y + height);
        row_bottoms.push(cursor.y);
    }

    // cell borders
    draw_line(layer, cursor.left, top, cursor.right, top);
    for y in row_bottoms {
        draw_line(layer, cursor.left, y, cursor.right, y);
    }
    for c in 0..=columns {
        let x = cursor.left + c as f32 * col_width;
        draw_line(layer, x, top, x, cursor.y);
    }

    cursor.advance(BLOCK_GAP_MM)
}

/// Characters of table text that fit in one line of a cell.
fn cell_chars(col_width: f32) -> usize {
    ((col_width - 2.0 * CELL_PADDING_MM) / (TABLE_FONT_SIZE * HELVETICA_AVG_ADVANCE * PT_TO_MM))
        .floor()
        .max(1.0) as usize
}

fn wrap_row(cells: &[String], max_chars: usize) -> Vec<Vec<String>> {
    cells.iter().map(|cell| wrap(cell, max_chars)).collect()
}

fn row_height(cells: &[Vec<String>]) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
    TABLE_ROW_HEIGHT_MM + (lines - 1) as f32 * TABLE_LINE_HEIGHT_MM
}

/// `top` is the upper edge of the row.
fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    cells: &[Vec<String>],
    col_width: f32,
    left: f32,
    top: f32,
) {
    let font_mm = TABLE_FONT_SIZE * PT_TO_MM;
    let first_baseline = top - (TABLE_ROW_HEIGHT_MM - font_mm) / 2.0 - font_mm + 0.6;

    for (i, lines) in cells.iter().enumerate() {
        let x = left + i as f32 * col_width + CELL_PADDING_MM;
        for (n, line) in lines.iter().enumerate() {
            let y = first_baseline - n as f32 * TABLE_LINE_HEIGHT_MM;
            layer.use_text(line.as_str(), TABLE_FONT_SIZE, Mm(x), Mm(y), font);
        }
    }
}

/// Greedy word wrap. Words longer than a line are split across lines.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(chars.drain(..max_chars).collect());
        }
        if chars.is_empty() {
            continue;
        }

        let word: String = chars.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn draw_summary(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    lines: &[SummaryLine],
    cursor: &mut Cursor,
) -> Result<(), AppError> {
    set_fill_gray(layer, 0.0);
    for line in lines {
        cursor.advance(LINE_HEIGHT_MM + 1.5)?;
        let text = line.text();
        let font = if line.emphasis { &fonts.bold } else { &fonts.regular };
        let x = (cursor.right - text_width_mm(&text, SUMMARY_FONT_SIZE)).max(cursor.left);
        layer.use_text(text, SUMMARY_FONT_SIZE, Mm(x), Mm(cursor.y), font);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateConfig;
    use crate::models::{InvoiceDraft, ItemEntry, PageSize};
    use crate::services::document_builder::build_document;
    use crate::services::totals::compute_totals;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn document(items: usize, template: &TemplateConfig) -> DocumentDescription {
        let mut draft = InvoiceDraft::new();
        for i in 0..items {
            draft
                .add_item(&ItemEntry::new(format!("Item {}", i), Decimal::from(25), Some(2)))
                .unwrap();
        }
        draft.set_discount_input("10");
        build_document(&draft, &compute_totals(&draft).unwrap(), template)
    }

    #[test]
    fn renders_a_pdf() {
        let bytes = render_pdf(&document(3, &TemplateConfig::default())).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_letter_with_watermark() {
        let template = TemplateConfig {
            page_size: PageSize::Letter,
            watermark: Some("DRAFT".to_string()),
            ..TemplateConfig::default()
        };
        let bytes = render_pdf(&document(1, &template)).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn too_many_items_is_a_render_error() {
        let err = render_pdf(&document(60, &TemplateConfig::default())).unwrap_err();
        assert!(matches!(err, AppError::RenderError(_)));
    }

    #[test]
    fn missing_logo_is_a_render_error() {
        let template = TemplateConfig {
            logo_path: Some(PathBuf::from("/nonexistent/logo.png")),
            ..TemplateConfig::default()
        };
        let err = render_pdf(&document(1, &template)).unwrap_err();
        assert!(err.user_message().contains("failed to load logo"));
    }

    #[test]
    fn renders_with_logo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        image::RgbaImage::from_pixel(8, 4, image::Rgba([200, 10, 10, 128]))
            .save(&path)
            .unwrap();

        let template = TemplateConfig {
            logo_path: Some(path),
            ..TemplateConfig::default()
        };
        let bytes = render_pdf(&document(2, &template)).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_cells_wrap_onto_more_lines() {
        assert_eq!(wrap("short", 10), vec!["short"]);
        assert_eq!(
            wrap("a very long equipment name", 10),
            vec!["a very", "long", "equipment", "name"]
        );
        assert_eq!(wrap("Hasselblad-X2D", 5), vec!["Hasse", "lblad", "-X2D"]);
        assert_eq!(wrap("", 5), vec![""]);
    }

    #[test]
    fn wrapped_rows_grow_taller() {
        let single = row_height(&wrap_row(&["Lens".to_string()], 10));
        let triple = row_height(&wrap_row(&["one two three".to_string(), "x".to_string()], 5));
        assert_eq!(single, TABLE_ROW_HEIGHT_MM);
        assert_eq!(triple, TABLE_ROW_HEIGHT_MM + 2.0 * TABLE_LINE_HEIGHT_MM);
    }

    #[test]
    fn renders_long_item_names() {
        let mut draft = InvoiceDraft::new();
        let name = "Full-day wedding coverage with second shooter, drone footage and a hand-bound linen album";
        draft
            .add_item(&ItemEntry::new(name, Decimal::from(2500), Some(1)))
            .unwrap();
        let document = build_document(&draft, &compute_totals(&draft).unwrap(), &TemplateConfig::default());

        let bytes = render_pdf(&document).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn engine_renders_off_thread() {
        let engine = PdfEngine::new();
        let bytes = engine
            .render(&document(2, &TemplateConfig::default()))
            .await
            .expect("render");
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(engine.name(), "printpdf");
    }
}
