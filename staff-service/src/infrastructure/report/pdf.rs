use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};
use shared::types::StaffRecord;

use crate::{
    config::ReportSettings,
    domain::report::{REPORT_HEADERS, ReportRenderer, report_row},
    error::StaffServiceError,
};

// A4 portrait, in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const CELL_PADDING: f32 = 3.0;
const COLUMN_SHARES: [f32; 4] = [0.2, 0.4, 0.2, 0.2];
/// Glyph advance of Courier as a fraction of the font size.
const COURIER_ADVANCE: f32 = 0.6;
const TITLE_GAP: f32 = 12.0;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Renders staff reports as a paginated PDF table.
///
/// Uses the built-in Courier faces so text width is known without font
/// metrics; long cells wrap inside their column and the header row repeats
/// at the top of every page.
pub struct PdfReportRenderer {
    title: String,
    font_size: f32,
}

impl PdfReportRenderer {
    pub fn new(settings: &ReportSettings) -> Self {
        Self {
            title: settings.title.clone(),
            font_size: settings.font_size,
        }
    }

    fn build(&self, staff: &[StaffRecord]) -> Result<Vec<u8>, lopdf::Error> {
        let layout = TableLayout::new(self.font_size);
        let mut pages = PageWriter::new(&layout, &self.title);
        for record in staff {
            pages.body_row(&report_row(record));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in pages.finish() {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let media_box: Vec<Object> = vec![
            0_i64.into(),
            0_i64.into(),
            (PAGE_WIDTH as i64).into(),
            (PAGE_HEIGHT as i64).into(),
        ];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(win_ansi(&self.title)),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

impl ReportRenderer for PdfReportRenderer {
    #[tracing::instrument(skip_all, fields(rows = staff.len()))]
    fn render(&self, staff: &[StaffRecord]) -> Result<Vec<u8>, StaffServiceError> {
        self.build(staff)
            .map_err(|e| StaffServiceError::Report(format!("pdf: {e}")))
    }
}

struct TableLayout {
    font_size: f32,
    leading: f32,
    widths: [f32; 4],
    /// Characters that fit on one line of each column.
    capacity: [usize; 4],
}

impl TableLayout {
    fn new(font_size: f32) -> Self {
        let table_width = PAGE_WIDTH - 2.0 * MARGIN;
        let widths = COLUMN_SHARES.map(|share| share * table_width);
        let char_width = font_size * COURIER_ADVANCE;
        let capacity =
            widths.map(|width| (((width - 2.0 * CELL_PADDING) / char_width).floor() as usize).max(1));

        Self {
            font_size,
            leading: font_size * 1.2,
            widths,
            capacity,
        }
    }

    fn row_height(&self, lines: usize) -> f32 {
        lines as f32 * self.leading + 2.0 * CELL_PADDING
    }
}

/// Accumulates drawing operations page by page.
struct PageWriter<'a> {
    layout: &'a TableLayout,
    finished: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    cursor_y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(layout: &'a TableLayout, title: &str) -> Self {
        let mut writer = Self {
            layout,
            finished: Vec::new(),
            ops: Vec::new(),
            cursor_y: PAGE_HEIGHT - MARGIN,
        };

        writer.begin_page();
        let title_size = layout.font_size + 5.0;
        writer.cursor_y -= title_size;
        writer.text(BOLD_FONT, title_size, MARGIN, writer.cursor_y, title);
        writer.cursor_y -= TITLE_GAP;
        writer.header_row();
        writer
    }

    fn begin_page(&mut self) {
        self.ops.push(Operation::new("w", vec![0.5_f32.into()]));
    }

    fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.ops));
        self.cursor_y = PAGE_HEIGHT - MARGIN;
        self.begin_page();
        self.header_row();
    }

    fn header_row(&mut self) {
        let cells = REPORT_HEADERS.map(str::to_string);
        self.row(&cells, true);
    }

    fn body_row(&mut self, cells: &[String; 4]) {
        self.row(cells, false);
    }

    fn row(&mut self, cells: &[String; 4], header: bool) {
        let layout = self.layout;
        let lines: Vec<Vec<String>> = cells
            .iter()
            .zip(layout.capacity)
            .map(|(cell, capacity)| wrap(cell, capacity))
            .collect();
        let height = layout.row_height(lines.iter().map(Vec::len).max().unwrap_or(1));

        if !header && self.cursor_y - height < MARGIN {
            self.new_page();
        }

        let top = self.cursor_y;
        let bottom = top - height;
        let table_width: f32 = layout.widths.iter().sum();

        if header {
            self.ops.push(Operation::new("q", vec![]));
            self.ops.push(Operation::new("g", vec![0.9_f32.into()]));
            self.rect(MARGIN, bottom, table_width, height);
            self.ops.push(Operation::new("f", vec![]));
            self.ops.push(Operation::new("Q", vec![]));
        }

        let font = if header { BOLD_FONT } else { REGULAR_FONT };
        let mut x = MARGIN;
        for (width, cell_lines) in layout.widths.iter().zip(&lines) {
            self.rect(x, bottom, *width, height);
            self.ops.push(Operation::new("S", vec![]));

            // Baseline sits roughly one ascent below the top padding.
            let mut baseline = top - CELL_PADDING - layout.font_size * 0.8;
            for line in cell_lines {
                self.text(font, layout.font_size, x + CELL_PADDING, baseline, line);
                baseline -= layout.leading;
            }
            x += width;
        }

        self.cursor_y = bottom;
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops
            .push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.finished.push(self.ops);
        self.finished
    }
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, capacity: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + chars.len() <= capacity {
            current.push(' ');
            current.extend(&chars);
            current_len += 1 + chars.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        while chars.len() > capacity {
            let rest = chars.split_off(capacity);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        current_len = chars.len();
        current = chars.into_iter().collect();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Maps text onto the single-byte WinAnsi range used by the standard fonts.
/// Characters outside Latin-1 are replaced with `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}
