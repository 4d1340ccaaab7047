//! Fixed-layout petition renderer.
//!
//! A4 pages with 2 cm margins, an embedded TTF so the full Turkish character
//! set renders correctly, a title and date header, one wrapped block per
//! content paragraph, and a trailing signature block. Any failure (missing
//! font, I/O) is logged and re-signaled as the coarse rendering error.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use time::{macros::format_description, OffsetDateTime};
use tracing::{error, info};

use crate::error::ApiError;

// printpdf units are f32 (`Mm(pub f32)`); keep the whole layout in f32.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const PT_TO_MM: f32 = 0.352_778;

const TITLE_SIZE_PT: f32 = 16.0;
const BODY_SIZE_PT: f32 = 11.0;

/// Optional document metadata; the title doubles as the visible heading.
#[derive(Debug, Default, Clone)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// Renders petition content to PDF. Constructed once at startup and shared
/// by reference; holds only the font location.
pub struct PdfRenderer {
    font_path: PathBuf,
}

struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor<'_> {
    /// Write one line at the current position, breaking to a new page when
    /// the bottom margin is reached.
    fn line(&mut self, text: &str, size_pt: f32, font: &IndirectFontRef) {
        let line_height = size_pt * PT_TO_MM * 1.27;
        if self.y - line_height < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.y -= line_height;
        self.layer
            .use_text(text, size_pt, Mm(MARGIN_MM), Mm(self.y), font);
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

impl PdfRenderer {
    pub fn new(font_path: impl Into<PathBuf>) -> Self {
        Self {
            font_path: font_path.into(),
        }
    }

    /// Render paragraph-separated content to `output_path`.
    pub fn render(
        &self,
        content: &str,
        meta: &DocumentMeta,
        output_path: &Path,
    ) -> Result<(), ApiError> {
        info!(path = %output_path.display(), "creating pdf");
        self.render_inner(content, meta, output_path).map_err(|e| {
            error!(error = %e, path = %output_path.display(), "pdf creation failed");
            ApiError::Rendering
        })?;
        info!(path = %output_path.display(), "pdf created");
        Ok(())
    }

    fn render_inner(
        &self,
        content: &str,
        meta: &DocumentMeta,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        let title = meta.title.as_deref().unwrap_or("DİLEKÇE");
        // printpdf exposes no info-dict author/subject fields; keep them in
        // the trace so the document origin is still reconstructable.
        tracing::debug!(author = ?meta.author, subject = ?meta.subject, "pdf metadata");

        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );

        let font_file = File::open(&self.font_path)
            .with_context(|| format!("open font {}", self.font_path.display()))?;
        let font = doc.add_external_font(font_file).context("embed font")?;

        let mut cursor = Cursor {
            layer: doc.get_page(page).get_layer(layer),
            doc: &doc,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        };

        cursor.line(title, TITLE_SIZE_PT, &font);
        cursor.gap(4.0);

        let date_format = format_description!("[day]/[month]/[year]");
        let today = OffsetDateTime::now_utc()
            .date()
            .format(&date_format)
            .context("format date")?;
        cursor.line(&format!("Tarih: {today}"), BODY_SIZE_PT, &font);
        cursor.gap(4.0);

        let max_chars = max_chars_per_line(BODY_SIZE_PT);
        for paragraph in content.split("\n\n").filter(|p| !p.trim().is_empty()) {
            for line in wrap_text(paragraph.trim(), max_chars) {
                cursor.line(&line, BODY_SIZE_PT, &font);
            }
            cursor.gap(2.0);
        }

        cursor.gap(10.0);
        cursor.line("Ad Soyad: _________________", BODY_SIZE_PT, &font);
        cursor.gap(4.0);
        cursor.line("İmza: _________________", BODY_SIZE_PT, &font);
        drop(cursor);

        let file = File::create(output_path)
            .with_context(|| format!("create {}", output_path.display()))?;
        doc.save(&mut BufWriter::new(file)).context("save pdf")?;
        Ok(())
    }
}

/// Usable characters per line from the average glyph advance at `size_pt`.
fn max_chars_per_line(size_pt: f32) -> usize {
    let text_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let avg_char_mm = size_pt * 0.5 * PT_TO_MM;
    (text_width / avg_char_mm) as usize
}

/// Greedy word wrap; words longer than a line are hard-split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
        }

        if word_len > max_chars {
            // The trailing chunk stays open so the next word can share its line.
            let mut chars = word.chars().peekable();
            while chars.peek().is_some() {
                let chunk: String = chars.by_ref().take(max_chars).collect();
                if chars.peek().is_some() {
                    lines.push(chunk);
                } else {
                    current = chunk;
                }
            }
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
