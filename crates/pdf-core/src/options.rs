//! Canvas configuration

use crate::{PdfError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Page dimensions in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "name")]
pub enum PageSize {
    A4,
    Letter,
    Custom { width: f64, height: f64 },
}

impl PageSize {
    /// (width, height) in points
    pub fn dimensions(&self) -> (f64, f64) {
        match *self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.dimensions().0
    }

    pub fn height(&self) -> f64 {
        self.dimensions().1
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Page margins in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// The same margin on every side
    pub fn uniform(margin: f64) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(50.0)
    }
}

/// Document information dictionary entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Left unset so that identical input renders identical bytes
    pub creation_date: Option<NaiveDateTime>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            creator: None,
            producer: Some(concat!("pdf-core ", env!("CARGO_PKG_VERSION")).to_string()),
            creation_date: None,
        }
    }
}

/// Options for a new canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasOptions {
    /// Page size
    pub size: PageSize,
    /// Page margins
    pub margins: Margins,
    /// Compress page content streams with FlateDecode
    pub compress: bool,
    /// Size of the chunks handed to the sink, in bytes
    pub chunk_size: usize,
    /// Info dictionary
    pub info: DocumentInfo,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margins: Margins::default(),
            compress: true,
            chunk_size: 16 * 1024,
            info: DocumentInfo::default(),
        }
    }
}

impl CanvasOptions {
    /// Check that the options describe a usable page
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size.dimensions();
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(PdfError::InvalidOptions(format!(
                "page size must be positive, got {width}x{height}"
            )));
        }

        let m = &self.margins;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(PdfError::InvalidOptions(
                "margins must be finite and non-negative".to_string(),
            ));
        }
        if m.left + m.right >= width || m.top + m.bottom >= height {
            return Err(PdfError::InvalidOptions(
                "margins leave no printable area".to_string(),
            ));
        }

        if self.chunk_size == 0 {
            return Err(PdfError::InvalidOptions(
                "chunk size must be at least one byte".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options() {
        let opts = CanvasOptions::default();
        assert_eq!(opts.size, PageSize::A4);
        assert_eq!(opts.margins, Margins::uniform(50.0));
        assert!(opts.compress);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_page_dimensions() {
        assert_eq!(PageSize::A4.dimensions(), (595.28, 841.89));
        assert_eq!(PageSize::Letter.width(), 612.0);
        let custom = PageSize::Custom {
            width: 300.0,
            height: 400.0,
        };
        assert_eq!(custom.height(), 400.0);
    }

    #[test]
    fn test_options_from_json() {
        let json = r#"{
            "size": { "name": "letter" },
            "margins": { "top": 36, "right": 36, "bottom": 36, "left": 36 },
            "compress": false,
            "info": { "title": "Invoice 42" }
        }"#;
        let opts: CanvasOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.size, PageSize::Letter);
        assert_eq!(opts.margins, Margins::uniform(36.0));
        assert!(!opts.compress);
        assert_eq!(opts.chunk_size, 16 * 1024);
        assert_eq!(opts.info.title.as_deref(), Some("Invoice 42"));
    }

    #[test]
    fn test_custom_size_from_json() {
        let json = r#"{ "size": { "name": "custom", "width": 200, "height": 300 } }"#;
        let opts: CanvasOptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            opts.size,
            PageSize::Custom {
                width: 200.0,
                height: 300.0
            }
        );
    }

    #[test]
    fn test_validate_rejects_bad_page() {
        let opts = CanvasOptions {
            size: PageSize::Custom {
                width: 0.0,
                height: 100.0,
            },
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(PdfError::InvalidOptions(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_margins() {
        let opts = CanvasOptions {
            margins: Margins::uniform(400.0),
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(PdfError::InvalidOptions(_))));
    }

    #[test]
    fn test_validate_rejects_zero_chunk() {
        let opts = CanvasOptions {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }
}
