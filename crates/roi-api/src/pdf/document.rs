use async_trait::async_trait;
use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::ops::Op;
use printpdf::{
    BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, TextItem, TextMatrix,
};
use roi_web::{DISCLAIMER, FOOTER_LINES, REPORT_SUBTITLE, REPORT_TITLE, ReportView};

use super::{RenderError, ReportRenderer};

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 40.0;
const CARD_GAP: f32 = 12.0;
const CARD_HEIGHT: f32 = 78.0;
const ROW_HEIGHT: f32 = 16.0;

type Colour = (u8, u8, u8);

const NAVY: Colour = (0x00, 0x3a, 0x70);
const TEXT: Colour = (0x33, 0x33, 0x33);
const MUTED: Colour = (0x66, 0x66, 0x66);
const PANEL: Colour = (0xf5, 0xf5, 0xf5);

/// Lays the report out on a single A4 page with the built-in Helvetica faces.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentRenderer;

impl DocumentRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_bytes(&self, view: &ReportView) -> Vec<u8> {
        let mut page = PageOps::default();
        let mut y = MARGIN + 10.0;

        page.text_centered(y, 22.0, BuiltinFont::HelveticaBold, NAVY, REPORT_TITLE);
        y += 20.0;
        page.text_centered(y, 11.0, BuiltinFont::Helvetica, MUTED, REPORT_SUBTITLE);
        y += 22.0;

        let cards = view.cards();
        let card_width = (PAGE_WIDTH - 2.0 * MARGIN - CARD_GAP * (cards.len() as f32 - 1.0))
            / cards.len() as f32;
        for (i, card) in cards.iter().enumerate() {
            let x = MARGIN + i as f32 * (card_width + CARD_GAP);
            let accent = card.accent.rgb();
            page.rect(x, y, card_width, CARD_HEIGHT, PANEL);
            page.rect(x, y, card_width, 4.0, accent);
            let centre = x + card_width / 2.0;
            let title = card.title.to_uppercase();
            page.text_centered_at(centre, y + 20.0, 8.0, BuiltinFont::HelveticaBold, TEXT, &title);
            page.text_centered_at(
                centre,
                y + 44.0,
                18.0,
                BuiltinFont::HelveticaBold,
                accent,
                &card.value,
            );
            page.text_centered_at(
                centre,
                y + 62.0,
                8.0,
                BuiltinFont::Helvetica,
                MUTED,
                &card.caption,
            );
        }
        y += CARD_HEIGHT + 20.0;

        for section in view.sections() {
            let accent = section.accent.rgb();
            let height = 30.0 + ROW_HEIGHT * section.rows.len() as f32 + 26.0;
            page.rect(MARGIN, y, PAGE_WIDTH - 2.0 * MARGIN, height, PANEL);
            page.text(
                MARGIN + 14.0,
                y + 20.0,
                13.0,
                BuiltinFont::HelveticaBold,
                accent,
                &section.title,
            );
            let mut row_y = y + 30.0 + ROW_HEIGHT - 4.0;
            for row in &section.rows {
                page.row(row_y, 10.0, BuiltinFont::Helvetica, MUTED, TEXT, row.label, &row.value);
                row_y += ROW_HEIGHT;
            }
            page.row(
                row_y + 8.0,
                12.0,
                BuiltinFont::HelveticaBold,
                accent,
                accent,
                section.total.label,
                &section.total.value,
            );
            y += height + 14.0;
        }

        y += 6.0;
        for line in wrap(DISCLAIMER, 7.5, PAGE_WIDTH - 2.0 * MARGIN) {
            page.text_centered(y, 7.5, BuiltinFont::Helvetica, MUTED, &line);
            y += 10.0;
        }
        y += 4.0;
        for line in FOOTER_LINES {
            page.text_centered(y, 7.5, BuiltinFont::Helvetica, MUTED, line);
            y += 10.0;
        }

        let mut doc = PdfDocument::new(REPORT_TITLE);
        doc.pages.push(PdfPage::new(Mm(210.0), Mm(297.0), page.ops));
        let mut bytes = Vec::new();
        let mut warnings = Vec::new();
        doc.save_writer(&mut bytes, &PdfSaveOptions::default(), &mut warnings);
        bytes
    }
}

#[async_trait]
impl ReportRenderer for DocumentRenderer {
    fn name(&self) -> &'static str {
        "document"
    }

    async fn render(&self, view: &ReportView) -> Result<Vec<u8>, RenderError> {
        Ok(self.render_bytes(view))
    }
}

fn colour((r, g, b): Colour) -> printpdf::color::Color {
    let channel = |v: u8| v as f32 / 255.0;
    printpdf::color::Color::Rgb(Rgb::new(channel(r), channel(g), channel(b), None))
}

/// Rough Helvetica advance width; digits and most lowercase letters sit
/// near 0.5 em.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.52
}

/// Only ASCII goes through the standard fonts.
fn ascii_only(text: &str) -> String {
    text.replace('\u{a9}', "(c)")
        .chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate =
            if current.is_empty() { word.to_string() } else { format!("{current} {word}") };
        if text_width(&candidate, size) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Drawing ops for one page. Coordinates are measured from the top edge and
/// flipped to PDF space here.
#[derive(Default)]
struct PageOps {
    ops: Vec<Op>,
}

impl PageOps {
    fn rect(&mut self, x: f32, top: f32, width: f32, height: f32, fill: Colour) {
        let bottom = PAGE_HEIGHT - top - height;
        let corner = |x: f32, y: f32| LinePoint { p: Point { x: Pt(x), y: Pt(y) }, bezier: false };
        let polygon = Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    corner(x, bottom),
                    corner(x + width, bottom),
                    corner(x + width, bottom + height),
                    corner(x, bottom + height),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        };
        self.ops.push(Op::SetFillColor { col: colour(fill) });
        self.ops.push(Op::DrawPolygon { polygon });
    }

    fn text(
        &mut self,
        x: f32,
        baseline: f32,
        size: f32,
        font: BuiltinFont,
        fill: Colour,
        text: &str,
    ) {
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFillColor { col: colour(fill) });
        self.ops.push(Op::SetFontSizeBuiltinFont { size: Pt(size), font });
        self.ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Pt(x), Pt(PAGE_HEIGHT - baseline)),
        });
        self.ops
            .push(Op::WriteTextBuiltinFont { items: vec![TextItem::Text(ascii_only(text))], font });
        self.ops.push(Op::EndTextSection);
    }

    fn text_centered_at(
        &mut self,
        centre: f32,
        baseline: f32,
        size: f32,
        font: BuiltinFont,
        fill: Colour,
        text: &str,
    ) {
        let x = centre - text_width(text, size) / 2.0;
        self.text(x, baseline, size, font, fill, text);
    }

    fn text_centered(
        &mut self,
        baseline: f32,
        size: f32,
        font: BuiltinFont,
        fill: Colour,
        text: &str,
    ) {
        self.text_centered_at(PAGE_WIDTH / 2.0, baseline, size, font, fill, text);
    }

    /// Label on the left, value flush right inside the section panel.
    #[allow(clippy::too_many_arguments)]
    fn row(
        &mut self,
        baseline: f32,
        size: f32,
        font: BuiltinFont,
        label_fill: Colour,
        value_fill: Colour,
        label: &str,
        value: &str,
    ) {
        self.text(MARGIN + 14.0, baseline, size, font, label_fill, label);
        let right = PAGE_WIDTH - MARGIN - 14.0;
        self.text(right - text_width(value, size), baseline, size, font, value_fill, value);
    }
}
