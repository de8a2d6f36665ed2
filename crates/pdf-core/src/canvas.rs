//! Fixed-page PDF canvas

use crate::sink::{ChunkWriter, DocumentSink};
use crate::text::{
    calculate_x_offset, generate_line_operators, generate_text_operators, wrap_text,
    TextRenderContext,
};
use crate::{encode_win_ansi, CanvasOptions, PdfError, Result, StandardFont, TextOptions};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::xref::XrefType;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::collections::BTreeMap;
use std::io::Write;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parse a CSS-style hex color (`#rrggbb` or `#rgb`, `#` optional)
    ///
    /// # Example
    /// ```ignore
    /// let gray = Color::from_hex("#444444")?;
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || PdfError::InvalidColor(hex.to_string());

        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::from_rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let expand = |s: &str| channel(s).map(|v| v * 17);
                Ok(Self::from_rgb(
                    expand(&digits[0..1])?,
                    expand(&digits[1..2])?,
                    expand(&digits[2..3])?,
                ))
            }
            _ => Err(invalid()),
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    fn components(&self) -> String {
        use crate::text::format_number;
        format!(
            "{} {} {}",
            format_number(self.r as f64),
            format_number(self.g as f64),
            format_number(self.b as f64)
        )
    }

    /// Non-stroking color operator (`r g b rg`)
    pub fn fill_operator(&self) -> String {
        format!("{} rg\n", self.components())
    }

    /// Stroking color operator (`r g b RG`)
    pub fn stroke_operator(&self) -> String {
        format!("{} RG\n", self.components())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// One line of text placed on a page
///
/// Coordinates are in points from the top-left corner; `y` is the top of the
/// line, `x` its left edge after alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: StandardFont,
    pub font_size: f32,
    pub x: f64,
    pub y: f64,
    /// Rendered width in points
    pub width: f64,
    pub color: Color,
}

impl TextRun {
    /// Right edge of the run
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// A stroked straight line, top-left origin
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: Color,
    pub line_width: f32,
}

/// A buffered drawing operation
///
/// Commands are kept per page and encoded into content streams on finish.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text(TextRun),
    Line(LineSegment),
}

impl DrawCommand {
    /// Top y coordinate of the command
    pub fn y(&self) -> f64 {
        match self {
            DrawCommand::Text(run) => run.y,
            DrawCommand::Line(line) => line.from.1.min(line.to.1),
        }
    }
}

/// Drawing commands of a single page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    commands: Vec<DrawCommand>,
}

impl Page {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text runs in drawing order
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(run) => Some(run),
            DrawCommand::Line(_) => None,
        })
    }

    /// Stroked lines in drawing order
    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line(line) => Some(line),
            DrawCommand::Text(_) => None,
        })
    }

    /// First text run with exactly this text
    pub fn find_text(&self, text: &str) -> Option<&TextRun> {
        self.text_runs().find(|run| run.text == text)
    }

    fn fonts(&self) -> impl Iterator<Item = StandardFont> + '_ {
        self.text_runs().map(|run| run.font)
    }
}

/// A document of fixed-size pages that streams to a [`DocumentSink`]
///
/// Layout calls buffer drawing commands; [`PdfCanvas::finish`] serializes the
/// document, delivers it to the sink in chunks and then completes the sink.
pub struct PdfCanvas<S: DocumentSink> {
    options: CanvasOptions,
    sink: S,
    pages: Vec<Page>,
    font: StandardFont,
    font_size: f32,
    fill_color: Color,
    stroke_color: Color,
    line_width: f32,
}

impl<S: DocumentSink> PdfCanvas<S> {
    /// Create a canvas with one empty page
    ///
    /// # Arguments
    /// * `options` - Page size, margins and output settings
    /// * `sink` - Receiver of the finished document
    pub fn new(options: CanvasOptions, sink: S) -> Result<Self> {
        options.validate()?;

        Ok(Self {
            options,
            sink,
            pages: vec![Page::default()],
            font: StandardFont::Helvetica,
            font_size: 12.0,
            fill_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
        })
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    /// Buffered pages, in order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Start a new page and make it current
    ///
    /// Returns the new page number (1-indexed).
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        log::trace!("started page {}", self.pages.len());
        self.pages.len()
    }

    pub fn set_font(&mut self, font: StandardFont) -> &mut Self {
        self.font = font;
        self
    }

    pub fn set_font_size(&mut self, size: f32) -> &mut Self {
        self.font_size = size;
        self
    }

    /// Set the color used for text
    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.fill_color = color;
        self
    }

    /// Set the color used for stroked lines
    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.stroke_color = color;
        self
    }

    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.line_width = width;
        self
    }

    pub fn font(&self) -> StandardFont {
        self.font
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Width of `text` in points for the current font and size
    pub fn text_width(&self, text: &str) -> f64 {
        self.font.text_width(text, self.font_size)
    }

    /// Place text with its top-left box corner at `x`, `y`
    ///
    /// The box extends `options.width` points to the right, or to the right
    /// margin when no width is given. Text wraps inside the box and each line
    /// is aligned within it. A line that would cross the bottom margin moves
    /// to a new page at the top margin.
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `options` - Box width and alignment
    pub fn text(&mut self, text: &str, x: f64, y: f64, options: TextOptions) -> Result<&mut Self> {
        check_finite("x", x)?;
        check_finite("y", y)?;
        check_finite("font size", self.font_size as f64)?;

        // Skip empty text - nothing to render
        if text.is_empty() {
            return Ok(self);
        }

        let (page_width, page_height) = self.options.size.dimensions();
        let margins = self.options.margins;

        let box_width = match options.width {
            Some(width) => {
                check_finite("width", width)?;
                width
            }
            None => page_width - x - margins.right,
        }
        .max(0.0);

        let line_height = self.font.line_height(self.font_size);
        let max_y = page_height - margins.bottom;
        let mut line_y = y;

        for line in wrap_text(text, self.font, self.font_size, box_width) {
            if line_y + line_height > max_y && line_y > margins.top {
                self.add_page();
                line_y = margins.top;
            }

            if !line.is_empty() {
                let width = self.text_width(&line);
                let run = TextRun {
                    x: x + calculate_x_offset(width, box_width, options.align),
                    y: line_y,
                    width,
                    text: line,
                    font: self.font,
                    font_size: self.font_size,
                    color: self.fill_color,
                };
                self.push(DrawCommand::Text(run));
            }

            line_y += line_height;
        }

        Ok(self)
    }

    /// Stroke a straight line with the current stroke color and width
    pub fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<&mut Self> {
        for (name, value) in [("x1", x1), ("y1", y1), ("x2", x2), ("y2", y2)] {
            check_finite(name, value)?;
        }

        let line = LineSegment {
            from: (x1, y1),
            to: (x2, y2),
            color: self.stroke_color,
            line_width: self.line_width,
        };
        self.push(DrawCommand::Line(line));
        Ok(self)
    }

    fn push(&mut self, command: DrawCommand) {
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
    }

    /// Serialize the document, stream it to the sink and complete the sink
    ///
    /// Completion is signalled exactly once, after the last chunk. If any step
    /// fails the error is returned and the sink is not completed.
    pub fn finish(mut self) -> Result<S> {
        let mut doc = self.build_document()?;

        let (chunks, bytes) = {
            let mut writer = ChunkWriter::new(&mut self.sink, self.options.chunk_size);
            doc.save_to(&mut writer).map_err(PdfError::SinkError)?;
            writer.flush().map_err(PdfError::SinkError)?;
            (writer.chunks, writer.bytes)
        };

        log::debug!(
            "finished PDF: {} pages, {} bytes in {} chunks",
            self.pages.len(),
            bytes,
            chunks
        );

        self.sink.complete().map_err(PdfError::SinkError)?;
        Ok(self.sink)
    }

    /// Build the lopdf document from the buffered pages
    fn build_document(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.3");
        // Cross-reference streams need PDF 1.5
        doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;
        let pages_id = doc.new_object_id();

        // Resource names are assigned in order of first use
        let mut font_resources: BTreeMap<StandardFont, String> = BTreeMap::new();
        for font in self.pages.iter().flat_map(Page::fonts) {
            let next = format!("F{}", font_resources.len() + 1);
            font_resources.entry(font).or_insert(next);
        }

        let mut font_dict = Dictionary::new();
        for (font, name) in &font_resources {
            font_dict.set(name.as_bytes(), Object::Dictionary(font.to_pdf_dictionary()));
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => font_dict,
            "ProcSet" => vec![Object::Name(b"PDF".to_vec()), Object::Name(b"Text".to_vec())],
        });

        let (page_width, page_height) = self.options.size.dimensions();
        let mut kids = Vec::with_capacity(self.pages.len());

        for page in &self.pages {
            let content = self.encode_page(page, &font_resources);
            let stream = if self.options.compress {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&content)?;
                Stream::new(dictionary! { "Filter" => "FlateDecode" }, encoder.finish()?)
            } else {
                Stream::new(Dictionary::new(), content)
            };
            let contents_id = doc.add_object(stream);

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![real(0.0), real(0.0), real(page_width), real(page_height)],
                "Contents" => contents_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info = self.info_dictionary();
        if !info.is_empty() {
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        Ok(doc)
    }

    /// Encode one page's commands as content stream operators
    fn encode_page(&self, page: &Page, fonts: &BTreeMap<StandardFont, String>) -> Vec<u8> {
        let page_height = self.options.size.height();
        let mut content = Vec::new();

        for command in &page.commands {
            match command {
                DrawCommand::Text(run) => {
                    let ctx = TextRenderContext {
                        font_name: fonts.get(&run.font).cloned().unwrap_or_default(),
                        font_size: run.font_size,
                        color: run.color,
                    };
                    // Convert Y coordinate from top-origin line box to PDF baseline
                    let baseline = page_height - (run.y + run.font.ascent(run.font_size));
                    content.extend(generate_text_operators(
                        &encode_win_ansi(&run.text),
                        run.x,
                        baseline,
                        &ctx,
                    ));
                }
                DrawCommand::Line(line) => {
                    content.extend(generate_line_operators(
                        (line.from.0, page_height - line.from.1),
                        (line.to.0, page_height - line.to.1),
                        line.color,
                        line.line_width,
                    ));
                }
            }
        }

        content
    }

    fn info_dictionary(&self) -> Dictionary {
        let info = &self.options.info;
        let mut dict = Dictionary::new();

        let entries = [
            ("Title", &info.title),
            ("Author", &info.author),
            ("Subject", &info.subject),
            ("Creator", &info.creator),
            ("Producer", &info.producer),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                dict.set(key, Object::string_literal(encode_win_ansi(value)));
            }
        }

        if let Some(date) = info.creation_date {
            let stamp = date.format("D:%Y%m%d%H%M%SZ").to_string();
            dict.set("CreationDate", Object::string_literal(stamp));
        }

        dict
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as _)
}

fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PdfError::InvalidNumber(field, value))
    }
}
