//! Invoice Renderer
//!
//! Renders an invoice JSON document to an A4 PDF.
//!
//! Usage:
//!   cargo run --example render_invoice -- <invoice.json> [output.pdf]
//!
//! Examples:
//!   cargo run --example render_invoice -- demos/invoice.json
//!   RUST_LOG=debug cargo run --example render_invoice -- demos/invoice.json output/acme.pdf

use invoice::{parse_invoice, render_invoice, RenderOptions};
use pdf_core::WriteSink;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <invoice.json> [output.pdf]", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  cargo run --example render_invoice -- demos/invoice.json");
        std::process::exit(1);
    }

    let input_path = &args[1];

    // Derive output path from the input name if not provided
    let output_path = if args.len() > 2 {
        args[2].clone()
    } else {
        let name = Path::new(input_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");
        format!("output/{}.pdf", name)
    };

    if let Some(parent) = Path::new(&output_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let invoice_json = std::fs::read_to_string(input_path)
        .map_err(|e| format!("Failed to read invoice '{}': {}", input_path, e))?;
    let invoice = parse_invoice(&invoice_json)?;

    let file = File::create(&output_path)
        .map_err(|e| format!("Failed to create '{}': {}", output_path, e))?;
    render_invoice(
        &invoice,
        &RenderOptions::default(),
        WriteSink::new(BufWriter::new(file)),
    )?;

    println!(
        "Generated: {} (invoice {}, {} items)",
        output_path,
        invoice.invoice_number,
        invoice.items.len()
    );

    Ok(())
}
