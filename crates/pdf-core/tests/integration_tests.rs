//! Integration tests for pdf-core
//!
//! These tests drive a canvas end to end and read the result back with lopdf.

use lopdf::Document;
use pdf_core::{
    Align, CallbackSink, CanvasOptions, Color, DocumentInfo, DocumentSink, PdfCanvas, PdfError,
    StandardFont, TextOptions, WriteSink,
};
use pretty_assertions::assert_eq;
use std::io;

fn uncompressed() -> CanvasOptions {
    CanvasOptions {
        compress: false,
        ..Default::default()
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Records every call so ordering can be checked
#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

impl DocumentSink for EventLog {
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.events.push(format!("chunk:{}", chunk.len()));
        Ok(())
    }

    fn complete(&mut self) -> io::Result<()> {
        self.events.push("complete".to_string());
        Ok(())
    }
}

/// Fails on the first chunk
struct BrokenSink {
    completed: bool,
}

impl DocumentSink for BrokenSink {
    fn write_chunk(&mut self, _chunk: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }

    fn complete(&mut self) -> io::Result<()> {
        self.completed = true;
        Ok(())
    }
}

#[test]
fn test_render_and_reload() {
    let mut canvas = PdfCanvas::new(uncompressed(), Vec::new()).unwrap();
    canvas.set_font_size(10.0);
    canvas
        .text("Left", 50.0, 50.0, TextOptions::default())
        .unwrap()
        .text("Right", 200.0, 65.0, TextOptions::right())
        .unwrap();
    canvas.set_font(StandardFont::HelveticaBold);
    canvas
        .text(
            "Center",
            50.0,
            700.0,
            TextOptions::default().width(500.0).align(Align::Center),
        )
        .unwrap();
    canvas
        .set_stroke_color(Color::from_hex("#aaaaaa").unwrap())
        .stroke_line(50.0, 185.0, 550.0, 185.0)
        .unwrap();

    let bytes = canvas.finish().unwrap();

    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    assert!(contains(&bytes, b"(Left) Tj"));
    assert!(contains(&bytes, b"(Right) Tj"));
    assert!(contains(&bytes, b"(Center) Tj"));
    assert!(contains(&bytes, b"0.667 0.667 0.667 RG"));
    assert!(contains(&bytes, b"Helvetica-Bold"));
}

#[test]
fn test_compressed_content_is_not_plain_text() {
    let mut canvas = PdfCanvas::new(CanvasOptions::default(), Vec::new()).unwrap();
    for row in 0..40 {
        canvas
            .text("Compressed words", 50.0, 50.0 + 15.0 * row as f64, TextOptions::default())
            .unwrap();
    }
    let bytes = canvas.finish().unwrap();

    assert!(contains(&bytes, b"FlateDecode"));
    assert!(!contains(&bytes, b"(Compressed words) Tj"));

    let doc = Document::load_mem(&bytes).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let content = doc.get_page_content(page_id).unwrap();
    assert!(contains(&content, b"(Compressed words) Tj"));
}

#[test]
fn test_bold_line_crossing_bottom_margin_moves_to_next_page() {
    let mut canvas = PdfCanvas::new(uncompressed(), Vec::new()).unwrap();
    canvas.set_font(StandardFont::HelveticaBold);
    // 780 + 11.9 passes the 791.89 bottom limit
    canvas.text("Bold", 50.0, 780.0, TextOptions::default()).unwrap();

    let bytes = canvas.finish().unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_classic_cross_reference_table() {
    let mut canvas = PdfCanvas::new(uncompressed(), Vec::new()).unwrap();
    canvas.text("Table", 50.0, 50.0, TextOptions::default()).unwrap();
    let bytes = canvas.finish().unwrap();

    assert!(bytes.starts_with(b"%PDF-1.3"));
    assert!(contains(&bytes, b"xref\n"));
    assert!(contains(&bytes, b"trailer"));
    assert!(!contains(&bytes, b"/XRef"));
    assert!(Document::load_mem(&bytes).is_ok());
}

#[test]
fn test_multiple_pages() {
    let mut canvas = PdfCanvas::new(uncompressed(), Vec::new()).unwrap();
    canvas.text("One", 50.0, 50.0, TextOptions::default()).unwrap();
    assert_eq!(canvas.add_page(), 2);
    canvas.text("Two", 50.0, 50.0, TextOptions::default()).unwrap();

    let bytes = canvas.finish().unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_chunks_arrive_before_single_completion() {
    let options = CanvasOptions {
        chunk_size: 256,
        ..uncompressed()
    };
    let mut canvas = PdfCanvas::new(options, EventLog::default()).unwrap();
    for i in 0..20 {
        canvas
            .text(&format!("Line {i}"), 50.0, 50.0 + 20.0 * i as f64, TextOptions::default())
            .unwrap();
    }
    let log = canvas.finish().unwrap();

    assert!(log.events.len() > 2);
    assert_eq!(log.events.last().map(String::as_str), Some("complete"));
    assert_eq!(
        log.events.iter().filter(|e| e.as_str() == "complete").count(),
        1
    );
    // Every chunk but the last is full-sized
    let chunk_sizes: Vec<&String> = log.events.iter().filter(|e| e.starts_with("chunk:")).collect();
    for event in &chunk_sizes[..chunk_sizes.len() - 1] {
        assert_eq!(event.as_str(), "chunk:256");
    }
}

#[test]
fn test_callback_sink_reassembles_document() {
    let mut received = Vec::new();
    let mut completions = 0;

    let mut canvas = PdfCanvas::new(
        uncompressed(),
        CallbackSink::new(
            |chunk: &[u8]| received.extend_from_slice(chunk),
            || completions += 1,
        ),
    )
    .unwrap();
    canvas.text("Callback", 50.0, 50.0, TextOptions::default()).unwrap();
    canvas.finish().unwrap();

    assert_eq!(completions, 1);
    assert!(received.starts_with(b"%PDF-1.3"));
    assert!(Document::load_mem(&received).is_ok());
}

#[test]
fn test_write_sink() {
    let canvas = PdfCanvas::new(uncompressed(), WriteSink::new(Vec::new())).unwrap();
    let bytes = canvas.finish().unwrap().into_inner();
    assert!(Document::load_mem(&bytes).is_ok());
}

#[test]
fn test_sink_failure_skips_completion() {
    let mut sink = BrokenSink { completed: false };
    {
        let canvas = PdfCanvas::new(uncompressed(), &mut sink).unwrap();
        let result = canvas.finish();
        assert!(result.is_err());
    }
    assert!(!sink.completed);
}

#[test]
fn test_document_info() {
    let options = CanvasOptions {
        info: DocumentInfo {
            title: Some("Invoice 1001".to_string()),
            author: Some("Acme".to_string()),
            ..Default::default()
        },
        ..uncompressed()
    };
    let canvas = PdfCanvas::new(options, Vec::new()).unwrap();
    let bytes = canvas.finish().unwrap();

    let doc = Document::load_mem(&bytes).unwrap();
    let info_id = doc
        .trailer
        .get(b"Info")
        .and_then(|info| info.as_reference())
        .unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    assert_eq!(
        info.get(b"Title").unwrap().as_str().unwrap(),
        b"Invoice 1001"
    );
    assert!(info.get(b"Producer").is_ok());
    assert!(info.get(b"CreationDate").is_err());
}

#[test]
fn test_identical_input_identical_bytes() {
    let render = || {
        let mut canvas = PdfCanvas::new(CanvasOptions::default(), Vec::new()).unwrap();
        canvas.text("Same", 50.0, 50.0, TextOptions::default()).unwrap();
        canvas.finish().unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn test_invalid_number_error() {
    let mut canvas = PdfCanvas::new(uncompressed(), Vec::new()).unwrap();
    let result = canvas.text("x", 50.0, f64::INFINITY, TextOptions::default());
    assert!(matches!(result, Err(PdfError::InvalidNumber("y", _))));
}
