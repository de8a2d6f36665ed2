//! Invoice - render invoice records as PDF documents
//!
//! This crate provides:
//! - Invoice data types (creator, client, line items, dates)
//! - Invoice parsing from JSON
//! - Currency, date and description formatting
//! - The invoice layout renderer, streaming the PDF through callbacks or a sink
//!
//! # Example
//!
//! ```ignore
//! use invoice::{create_invoice, parse_invoice};
//!
//! let invoice = parse_invoice(invoice_json)?;
//! let mut pdf = Vec::new();
//! create_invoice(&invoice, |chunk| pdf.extend_from_slice(chunk), || println!("done"))?;
//! ```

pub mod format;
mod model;
pub mod parser;
mod renderer;

pub use format::{format_currency, format_date, truncate_description};
pub use model::{Invoice, Item, LineEntry, Party, PAID_TO_DATE};
pub use parser::parse_invoice;
pub use renderer::{
    create_invoice, render_invoice, render_invoice_to_bytes, InvoiceRenderer, RenderOptions,
};

use thiserror::Error;

/// Errors that can occur while rendering an invoice
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("Failed to parse invoice: {0}")]
    ParseError(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for invoice operations
pub type Result<T> = std::result::Result<T, InvoiceError>;
