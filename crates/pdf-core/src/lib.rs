//! PDF Core - Fixed-page PDF canvas
//!
//! This crate provides functionality for:
//! - Laying out text on fixed-size pages with the standard Type1 fonts
//! - Left, center and right alignment inside a bounded width, with word wrapping
//! - Drawing stroked rules
//! - Streaming the finished document to a sink in ordered chunks
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, CanvasOptions, PdfCanvas, StandardFont, TextOptions};
//!
//! let mut canvas = PdfCanvas::new(CanvasOptions::default(), Vec::new())?;
//! canvas.set_font(StandardFont::HelveticaBold).set_font_size(12.0);
//! canvas.text("Hello, World!", 50.0, 50.0, TextOptions::default())?;
//! canvas.stroke_line(50.0, 70.0, 550.0, 70.0)?;
//! let bytes: Vec<u8> = canvas.finish()?;
//! ```

mod canvas;
mod font;
mod options;
mod sink;
mod text;

pub use canvas::{Color, DrawCommand, LineSegment, Page, PdfCanvas, TextRun};
pub use font::{encode_win_ansi, StandardFont};
pub use options::{CanvasOptions, DocumentInfo, Margins, PageSize};
pub use sink::{CallbackSink, DocumentSink, WriteSink};
pub use text::{
    format_number, generate_line_operators, generate_text_operators, wrap_text, TextRenderContext,
};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Invalid canvas options: {0}")]
    InvalidOptions(String),

    #[error("Invalid number for {0}: {1}")]
    InvalidNumber(&'static str, f64),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Sink error: {0}")]
    SinkError(std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Placement options for a run of text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextOptions {
    /// Width of the box the text is aligned and wrapped in.
    /// `None` extends the box to the right margin.
    pub width: Option<f64>,
    /// Alignment inside the box
    pub align: Align,
}

impl TextOptions {
    /// Right-aligned text reaching to the right margin
    pub fn right() -> Self {
        Self {
            width: None,
            align: Align::Right,
        }
    }

    /// Set an explicit box width
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the alignment
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}
