//! Text rendering utilities

use crate::canvas::Color;
use crate::{Align, StandardFont};

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text color (RGB)
    pub color: Color,
}

/// Calculate X offset for text alignment
///
/// # Arguments
/// * `text_width` - Width of text in points
/// * `container_width` - Available width for alignment
/// * `align` - Desired alignment
pub fn calculate_x_offset(text_width: f64, container_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => (container_width - text_width) / 2.0,
        Align::Right => container_width - text_width,
    }
}

/// Format a number for a content stream
///
/// Rounds to three decimals and drops trailing zeros, so `10.0` becomes `10`
/// and `0.6666` becomes `0.667`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Escape bytes for a PDF literal string, including the parentheses
pub fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &byte in bytes {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            _ => out.push(byte),
        }
    }
    out.push(b')');
    out
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) that draw one line
/// of already-encoded text with its baseline starting at `x`, `y`.
///
/// # Arguments
/// * `text` - WinAnsi-encoded text bytes
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate of the baseline in points (PDF coordinates, from bottom)
/// * `ctx` - Text rendering context
pub fn generate_text_operators(text: &[u8], x: f64, y: f64, ctx: &TextRenderContext) -> Vec<u8> {
    let mut ops = Vec::new();

    ops.extend_from_slice(b"BT\n");
    ops.extend_from_slice(ctx.color.fill_operator().as_bytes());
    ops.extend_from_slice(
        format!(
            "/{} {} Tf\n",
            ctx.font_name,
            format_number(ctx.font_size as f64)
        )
        .as_bytes(),
    );
    ops.extend_from_slice(format!("{} {} Td\n", format_number(x), format_number(y)).as_bytes());
    ops.extend_from_slice(&escape_literal(text));
    ops.extend_from_slice(b" Tj\nET\n");

    ops
}

/// Generate PDF operators for a straight stroked line (PDF coordinates)
pub fn generate_line_operators(
    from: (f64, f64),
    to: (f64, f64),
    color: Color,
    line_width: f32,
) -> Vec<u8> {
    format!(
        "{}{} w\n{} {} m\n{} {} l\nS\n",
        color.stroke_operator(),
        format_number(line_width as f64),
        format_number(from.0),
        format_number(from.1),
        format_number(to.0),
        format_number(to.1),
    )
    .into_bytes()
}

/// Split text into lines that fit `max_width` points
///
/// Breaks greedily at spaces; a word wider than the line on its own is
/// broken between characters. Runs of spaces inside a line are kept, spaces
/// at a break are dropped. Explicit newlines always start a new line.
pub fn wrap_text(text: &str, font: StandardFont, font_size: f32, max_width: f64) -> Vec<String> {
    let fits = |candidate: &str| font.text_width(candidate, font_size) <= max_width + 1e-6;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        // Whether `current_line` has taken at least one piece
        let mut started = false;

        // Consecutive spaces show up as empty pieces
        for (index, word) in paragraph.split(' ').enumerate() {
            if index > 0 && !started && word.is_empty() {
                continue;
            }

            let candidate = if started {
                format!("{current_line} {word}")
            } else {
                word.to_string()
            };

            if fits(&candidate) {
                current_line = candidate;
                started = true;
                continue;
            }

            let finished = std::mem::take(&mut current_line);
            let finished = finished.trim_end_matches(' ');
            if !finished.is_empty() {
                lines.push(finished.to_string());
            }
            started = false;

            if word.is_empty() {
                continue;
            }

            if fits(word) {
                current_line = word.to_string();
                started = true;
                continue;
            }

            // Over-long word: break between characters
            for ch in word.chars() {
                current_line.push(ch);
                if !fits(&current_line) && current_line.chars().count() > 1 {
                    current_line.pop();
                    lines.push(std::mem::take(&mut current_line));
                    current_line.push(ch);
                }
            }
            started = true;
        }

        lines.push(current_line);
    }

    lines
}
