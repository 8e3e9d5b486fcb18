// src/letter.rs
//! Cover letter rendering: plain text in, paginated PDF bytes out.

use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;
use tracing::info;

// US letter, 1 inch margins, 12pt type on 14pt leading
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 25.4;
const FONT_SIZE_PT: f32 = 12.0;
const LEADING_MM: f32 = 14.0 * 25.4 / 72.0;

/// Columns that fit the 468pt text area at 12pt Helvetica
const WRAP_COLUMNS: usize = 70;

/// Render cover letter text as a paginated PDF document.
///
/// Newlines become explicit line breaks; each logical line is word-wrapped
/// to the page width and a fresh page is started whenever the cursor passes
/// the bottom margin. Empty input still yields a valid one-page document.
pub fn render_cover_letter(text: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Cover Letter",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("PDF font error: {}", e))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for paragraph_line in text.split('\n') {
        for line in wrap_line(paragraph_line, WRAP_COLUMNS) {
            if y < MARGIN_MM {
                let (page, new_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(new_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }

            if !line.is_empty() {
                layer.use_text(line.as_str(), FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
            }
            y -= LEADING_MM;
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| anyhow!("PDF save error: {}", e))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| anyhow!("PDF buffer error: {}", e))?;

    info!("Cover letter rendered, pdf_size: {}", bytes.len());
    Ok(bytes)
}

/// Word-wrap a single line to at most `max_chars` columns.
/// An empty input line stays a single empty output line.
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in line.split_whitespace() {
        let word_chars = word.chars().count();
        if current_chars + word_chars + 1 > max_chars && current_chars > 0 {
            lines.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
