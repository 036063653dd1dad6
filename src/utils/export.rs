//! Issue snapshot rendering for downloads.
//!
//! Renderers build the whole file in memory and hand back the bytes; callers
//! only start writing the response once rendering has succeeded.

use std::borrow::Cow;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::{Format, Workbook};

use crate::models::issue_models::IssueView;
use crate::utils::error::AppResult;

pub const HEADERS: [&str; 6] = ["Title", "Description", "Priority", "Status", "RaisedBy", "CreatedAt"];

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Excel rejects cells longer than this many characters.
pub const XLSX_CELL_LIMIT: usize = 32_767;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Tabular,
    Document,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Tabular => XLSX_CONTENT_TYPE,
            ExportFormat::Document => PDF_CONTENT_TYPE,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Tabular => "issues.xlsx",
            ExportFormat::Document => "issues.pdf",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub raised_by: String,
    pub created_at: String,
}

impl ExportRow {
    fn cells(&self) -> [&str; 6] {
        [
            &self.title,
            &self.description,
            &self.priority,
            &self.status,
            &self.raised_by,
            &self.created_at,
        ]
    }
}

/// `text` cut to at most `limit` characters, ending in "…" when shortened.
fn clamp_cell(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        None => Cow::Borrowed(text),
        Some(_) => {
            let keep = limit.saturating_sub(1);
            let end = text.char_indices().nth(keep).map_or(text.len(), |(at, _)| at);
            Cow::Owned(format!("{}…", &text[..end]))
        }
    }
}

impl From<&IssueView> for ExportRow {
    fn from(issue: &IssueView) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            priority: issue.priority.to_string(),
            status: issue.status.to_string(),
            raised_by: issue.raised_by.name.clone(),
            created_at: issue.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn render(format: ExportFormat, rows: &[ExportRow]) -> AppResult<Vec<u8>> {
    match format {
        ExportFormat::Tabular => render_xlsx(rows),
        ExportFormat::Document => render_pdf(rows),
    }
}

pub fn render_xlsx(rows: &[ExportRow]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Issues")?;

    for (col, header) in HEADERS.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        worksheet.set_column_width(col, 24.0)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        for (col, cell) in row.cells().iter().enumerate() {
            worksheet.write_string(line, col as u16, clamp_cell(cell, XLSX_CELL_LIMIT).into_owned())?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 6.0;
const WRAP_AT: usize = 95;

/// Tracks the write position and starts a fresh A4 page when it runs out.
struct PdfCursor {
    doc: printpdf::PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PdfCursor {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }
}

pub fn render_pdf(rows: &[ExportRow]) -> AppResult<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new("Issue Report", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let layer = doc.get_page(page).get_layer(layer);
    let mut cursor = PdfCursor {
        doc,
        layer,
        y: PAGE_HEIGHT - MARGIN,
    };

    cursor.line("Issue Report", 16.0, &bold);
    cursor.y -= LINE_HEIGHT;

    if rows.is_empty() {
        cursor.line("No issues have been raised.", 11.0, &regular);
    }

    for (index, row) in rows.iter().enumerate() {
        cursor.line(&format!("{}. {}", index + 1, row.title), 12.0, &bold);
        cursor.line(
            &format!(
                "Priority: {}   Status: {}   Raised by: {}   Created: {}",
                row.priority, row.status, row.raised_by, row.created_at
            ),
            10.0,
            &regular,
        );
        for chunk in wrap(&row.description, WRAP_AT) {
            cursor.line(&chunk, 10.0, &regular);
        }
        cursor.y -= LINE_HEIGHT / 2.0;
    }

    Ok(cursor.doc.save_to_bytes()?)
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
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
