use std::path::Path;

use chrono::{DateTime, Utc};
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, Document, Element, SimplePageDecorator};

use super::justify::JustifiedParagraph;
use super::split::split;
use super::table::{parse_table, Table};

/// `<dir>/<family>-{Regular,Bold,Italic,BoldItalic}.ttf` families tried after
/// the configured one.
const FALLBACK_FONTS: &[(&str, &str)] = &[
    ("/usr/share/fonts/truetype/liberation", "LiberationSans"),
    ("/usr/share/fonts/truetype/liberation2", "LiberationSans"),
    ("/usr/share/fonts/liberation-sans", "LiberationSans"),
    ("/usr/share/fonts/liberation", "LiberationSans"),
    ("/Library/Fonts", "Arial"),
];

/// DejaVu names its variants `DejaVuSans{,-Bold,-Oblique,-BoldOblique}.ttf`,
/// so it is loaded file by file.
const DEJAVU_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu-sans-fonts",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
];

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no usable TrueType font family found (tried {0})")]
    Fonts(String),
    #[error("failed to render PDF: {0}")]
    Render(String),
}

impl From<genpdf::error::Error> for RenderError {
    fn from(e: genpdf::error::Error) -> Self {
        RenderError::Render(e.to_string())
    }
}

/// Lays out a comparison as a PDF. Holds the loaded font family so each
/// request only pays for layout.
pub struct PdfRenderer {
    fonts: FontFamily<FontData>,
}

impl PdfRenderer {
    /// Loads `<dir>/<family>-{Regular,Bold,Italic,BoldItalic}.ttf`, falling
    /// back to common system locations.
    pub fn load(font_dir: &str, family: &str) -> Result<Self, RenderError> {
        let mut tried = Vec::new();
        let candidates = std::iter::once((font_dir, family)).chain(FALLBACK_FONTS.iter().copied());
        for (dir, name) in candidates {
            match genpdf::fonts::from_files(dir, name, None) {
                Ok(fonts) => {
                    tracing::debug!(dir, family = name, "loaded PDF fonts");
                    return Ok(Self { fonts });
                }
                Err(_) => tried.push(format!("{dir}/{name}")),
            }
        }
        for dir in DEJAVU_DIRS {
            match load_dejavu(Path::new(dir)) {
                Ok(fonts) => {
                    tracing::debug!(dir, family = "DejaVuSans", "loaded PDF fonts");
                    return Ok(Self { fonts });
                }
                Err(_) => tried.push(format!("{dir}/DejaVuSans")),
            }
        }
        Err(RenderError::Fonts(tried.join(", ")))
    }

    pub fn render(
        &self,
        company_a: &str,
        company_b: &str,
        response_text: &str,
        model: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<u8>, RenderError> {
        let parts = split(response_text);

        let mut doc = Document::new(self.fonts.clone());
        doc.set_title(format!("{company_a} vs {company_b} Comparison"));
        doc.set_minimal_conformance();
        doc.set_line_spacing(1.25);
        doc.set_font_size(10);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(20);
        doc.set_page_decorator(decorator);

        doc.push(
            Paragraph::new(StyledString::new(
                "Competitor Analysis Report".to_string(),
                Style::new().bold().with_font_size(20),
            ))
            .aligned(Alignment::Center),
        );
        doc.push(Break::new(0.5));

        doc.push(Paragraph::new(StyledString::new(
            format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
            Style::new().with_font_size(9),
        )));
        doc.push(Paragraph::new(StyledString::new(
            format!("Model: {model}"),
            Style::new().with_font_size(9),
        )));
        doc.push(Break::new(1));

        doc.push(Paragraph::new(StyledString::new(
            format!("{company_a} vs {company_b}"),
            Style::new().bold().with_font_size(16),
        )));
        doc.push(Break::new(1));

        if let Ok(table) = parse_table(&parts.table_markdown) {
            if table.column_count() > 0 {
                doc.push(section_heading("Comparison Table"));
                doc.push(Break::new(0.5));
                doc.push(table_layout(&table)?);
                doc.push(Break::new(1));
            }
        }

        let summary = parts.summary_text.trim();
        if !summary.is_empty() {
            doc.push(section_heading("Summary"));
            doc.push(Break::new(0.5));
            for text in summary.split("\n\n") {
                let paragraph = JustifiedParagraph::new(text);
                if !paragraph.is_empty() {
                    doc.push(paragraph);
                    doc.push(Break::new(0.5));
                }
            }
        }

        let mut out = Vec::new();
        doc.render(&mut out)?;
        Ok(out)
    }
}

fn load_dejavu(dir: &Path) -> Result<FontFamily<FontData>, RenderError> {
    let font = |file: &str| -> Result<FontData, RenderError> {
        let data = std::fs::read(dir.join(file))
            .map_err(|e| RenderError::Fonts(format!("{}: {e}", dir.join(file).display())))?;
        Ok(FontData::new(data, None)?)
    };
    Ok(FontFamily {
        regular: font("DejaVuSans.ttf")?,
        bold: font("DejaVuSans-Bold.ttf")?,
        italic: font("DejaVuSans-Oblique.ttf")?,
        bold_italic: font("DejaVuSans-BoldOblique.ttf")?,
    })
}

fn section_heading(text: &str) -> Paragraph {
    Paragraph::new(StyledString::new(
        text.to_string(),
        Style::new().bold().with_font_size(13),
    ))
}

// Equal-width columns filled left to right; short rows leave trailing cells
// blank and long rows spill into extra columns.
fn table_layout(table: &Table) -> Result<TableLayout, RenderError> {
    let columns = table.column_count();
    let mut layout = TableLayout::new(vec![1; columns]);
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut header = layout.row();
    for i in 0..columns {
        let text = table.headers.get(i).cloned().unwrap_or_default();
        let cell = Paragraph::new(StyledString::new(text, Style::new().bold()));
        header = header.element(cell.padded(1));
    }
    header.push()?;

    for cells in &table.rows {
        let mut row = layout.row();
        for i in 0..columns {
            let text = cells.get(i).cloned().unwrap_or_default();
            row = row.element(Paragraph::new(text).padded(1));
        }
        row.push()?;
    }

    Ok(layout)
}

/// `{companyA}_vs_{companyB}_Comparison.pdf`, with characters that cannot sit
/// inside a quoted header value replaced by `_`.
pub fn report_filename(company_a: &str, company_b: &str) -> String {
    format!("{company_a}_vs_{company_b}_Comparison.pdf")
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
