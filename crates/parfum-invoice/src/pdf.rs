//! Page drawing on top of `pdf-writer`.
//!
//! Text is set in the base-14 Helvetica faces with `WinAnsiEncoding`, so no
//! font program is embedded. The content stream is written uncompressed.

use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
        }
    }

    /// Approximate Helvetica advance width in 1/1000 em, by character class.
    /// Digits are exact, which keeps right-aligned amounts flush.
    fn advance(self, c: char) -> f32 {
        let regular = match c {
            'i' | 'j' | 'l' => 222.0,
            ' ' | '.' | ',' | ':' | ';' | '!' | '\'' | '/' | '|' | '[' | ']' | 'I' | 'f' | 't' => {
                278.0
            }
            'r' | '(' | ')' | '-' => 333.0,
            'w' => 722.0,
            'm' | 'M' => 833.0,
            'W' => 944.0,
            'A'..='Z' => 700.0,
            'a'..='z' => 540.0,
            _ => 556.0,
        };
        match self {
            Font::Bold if c.is_ascii_alphabetic() => regular * 1.08,
            _ => regular,
        }
    }
}

/// Fill or stroke colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn gray(level: f32) -> Rgb {
        Rgb(level, level, level)
    }
}

/// Rendered width of `text` in points.
#[must_use]
pub fn text_width(font: Font, size: f32, text: &str) -> f32 {
    text.chars().map(|c| font.advance(c)).sum::<f32>() * size / 1000.0
}

/// Greedy word wrap to `max_width` points. Words wider than a whole line are
/// broken between characters.
#[must_use]
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(font, size, &candidate) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            current.push(c);
            if current.chars().count() > 1 && text_width(font, size, &current) > max_width {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Shorten `text` with a trailing `...` until it fits `max_width`.
#[must_use]
pub fn ellipsize(text: &str, font: Font, size: f32, max_width: f32) -> String {
    if text_width(font, size, text) <= max_width {
        return text.to_string();
    }
    let mut kept: String = text.to_string();
    while !kept.is_empty() && text_width(font, size, &format!("{kept}...")) > max_width {
        kept.pop();
    }
    format!("{}...", kept.trim_end())
}

/// `text` as `WinAnsiEncoding` bytes. Characters outside Latin-1 (other than
/// the euro sign) become `?`; control characters become spaces.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20ac}' => 0x80,
            c if c.is_control() => b' ',
            c => u8::try_from(u32::from(c))
                .ok()
                .filter(|b| *b >= 0xa0 || (b' '..=b'~').contains(b))
                .unwrap_or(b'?'),
        })
        .collect()
}

/// Accumulates page content operators. Coordinates are PDF user space:
/// origin bottom-left, y grows upwards.
pub struct Canvas {
    content: Content,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: Content::new(),
        }
    }

    pub fn text(&mut self, font: Font, size: f32, x: f32, y: f32, color: Rgb, text: &str) {
        let encoded = win_ansi(text);
        self.content
            .set_fill_rgb(color.0, color.1, color.2)
            .begin_text()
            .set_font(font.resource(), size)
            .next_line(x, y)
            .show(Str(&encoded))
            .end_text();
    }

    /// Draw `text` so that it ends at `right_x`.
    pub fn text_right(
        &mut self,
        font: Font,
        size: f32,
        right_x: f32,
        y: f32,
        color: Rgb,
        text: &str,
    ) {
        let x = right_x - text_width(font, size, text);
        self.text(font, size, x, y, color, text);
    }

    pub fn text_centered(&mut self, font: Font, size: f32, y: f32, color: Rgb, text: &str) {
        let x = (PAGE_WIDTH - text_width(font, size, text)) / 2.0;
        self.text(font, size, x, y, color, text);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.content
            .set_fill_rgb(color.0, color.1, color.2)
            .rect(x, y, width, height)
            .fill_nonzero();
    }

    /// Horizontal rule from `x1` to `x2` at height `y`.
    pub fn rule(&mut self, x1: f32, x2: f32, y: f32, line_width: f32, color: Rgb) {
        self.content
            .set_stroke_rgb(color.0, color.1, color.2)
            .set_line_width(line_width)
            .move_to(x1, y)
            .line_to(x2, y)
            .stroke();
    }

    #[must_use]
    pub fn into_content(self) -> Vec<u8> {
        self.content.finish()
    }
}

/// Document information dictionary entries.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInfo<'a> {
    pub title: &'a str,
    pub created_at: DateTime<Utc>,
}

fn pdf_date(at: DateTime<Utc>) -> Date {
    let part = |value: u32| u8::try_from(value).unwrap_or_default();
    Date::new(u16::try_from(at.year()).unwrap_or_default())
        .month(part(at.month()))
        .day(part(at.day()))
        .hour(part(at.hour()))
        .minute(part(at.minute()))
        .second(part(at.second()))
        .utc_offset_hour(0)
}

/// Serialize one A4 page with `content` into a complete PDF file.
#[must_use]
pub fn write_document(content: &[u8], info: &DocumentInfo<'_>) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let regular_id = Ref::new(4);
    let bold_id = Ref::new(5);
    let content_id = Ref::new(6);
    let info_id = Ref::new(7);

    let mut pdf = Pdf::new();

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources()
        .fonts()
        .pair(Font::Regular.resource(), regular_id)
        .pair(Font::Bold.resource(), bold_id);
    page.finish();

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    pdf.stream(content_id, content);

    pdf.document_info(info_id)
        .title(TextStr(info.title))
        .producer(TextStr("parfum-invoice"))
        .creation_date(pdf_date(info.created_at));

    pdf.finish()
}
