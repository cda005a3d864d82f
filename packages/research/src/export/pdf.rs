//! PDF rendering with a built-in font, word wrap and page breaks.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::REPORT_TITLE;
use crate::error::{ResearchError, Result};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 20.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 6.0;

/// Characters per line at body size within the margins (Helvetica).
const WRAP_WIDTH: usize = 85;

/// Cursor over the current page; starts a new page when the bottom is hit.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Self {
        let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        Self {
            doc,
            layer,
            y: PAGE_HEIGHT.0 - MARGIN,
        }
    }

    fn font(&self, font: BuiltinFont) -> Result<IndirectFontRef> {
        self.doc
            .add_builtin_font(font)
            .map_err(|e| ResearchError::Export(e.to_string().into()))
    }

    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT.0 - MARGIN;
        }
        self.layer
            .use_text(to_win_ansi(text), size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT / 2.0;
    }

    fn save(self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.doc
            .save(&mut writer)
            .map_err(|e| ResearchError::Export(e.to_string().into()))
    }
}

pub(super) fn write_pdf(path: &Path, query: &str, content: &str) -> Result<()> {
    let mut writer = PageWriter::new(REPORT_TITLE);
    let bold = writer.font(BuiltinFont::HelveticaBold)?;
    let regular = writer.font(BuiltinFont::Helvetica)?;

    writer.line(REPORT_TITLE, TITLE_SIZE, &bold);
    writer.gap();
    for line in wrap(&format!("Topic: {}", query), WRAP_WIDTH) {
        writer.line(&line, HEADING_SIZE, &bold);
    }
    writer.gap();

    for paragraph in content.lines() {
        for line in wrap(paragraph, WRAP_WIDTH) {
            writer.line(&line, BODY_SIZE, &regular);
        }
    }

    writer.save(path)
}

/// Greedy word wrap; words longer than `width` are split.
///
/// An empty input yields one empty line so blank lines survive.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
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

/// Built-in PDF fonts only cover Latin-1; replace anything else.
fn to_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}
