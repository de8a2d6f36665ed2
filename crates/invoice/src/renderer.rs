//! Invoice layout rendering

use crate::format::{format_currency, format_date, truncate_description};
use crate::{Invoice, Result, PAID_TO_DATE};
use pdf_core::{
    Align, CallbackSink, CanvasOptions, Color, DocumentSink, PdfCanvas, StandardFont, TextOptions,
};
use serde::{Deserialize, Serialize};

/// Y of the table header row
pub const TABLE_TOP: f64 = 330.0;
/// Vertical distance between table rows
pub const ROW_HEIGHT: f64 = 30.0;
/// Lowest y a table row's rule or the balance due row may reach on a page
pub const TABLE_BOTTOM_LIMIT: f64 = 770.0;

const RULE_OFFSET: f64 = 20.0;
const PAID_OFFSET: f64 = 20.0;
const DUE_OFFSET: f64 = 25.0;
const CUSTOMER_TOP: f64 = 200.0;
const FOOTER_TOP: f64 = 780.0;
const RULE_START: f64 = 50.0;
const RULE_END: f64 = 550.0;

/// Gray used for everything below the header
const TEXT_COLOR: &str = "#444444";
const RULE_COLOR: &str = "#aaaaaa";

/// Options for rendering an invoice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Page, margin and output settings of the canvas
    pub canvas: CanvasOptions,
}

impl RenderOptions {
    /// Load options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Lays an invoice out on a canvas
pub struct InvoiceRenderer<'a> {
    invoice: &'a Invoice,
}

impl<'a> InvoiceRenderer<'a> {
    pub fn new(invoice: &'a Invoice) -> Self {
        Self { invoice }
    }

    /// Draw the whole invoice without finishing the canvas
    pub fn render<S: DocumentSink>(&self, canvas: &mut PdfCanvas<S>) -> Result<()> {
        log::debug!(
            "rendering invoice {} with {} items",
            self.invoice.invoice_number,
            self.invoice.items.len()
        );

        self.generate_header(canvas)?;
        self.generate_customer_information(canvas)?;
        self.generate_invoice_table(canvas)?;
        self.generate_footer(canvas)?;
        Ok(())
    }

    fn generate_header<S: DocumentSink>(&self, canvas: &mut PdfCanvas<S>) -> Result<()> {
        let creator = &self.invoice.creator;

        canvas
            .set_fill_color(Color::black())
            .set_font(StandardFont::Helvetica)
            .set_font_size(10.0);
        canvas
            .text(&creator.name, 200.0, 50.0, TextOptions::right())?
            .text(&creator.email, 200.0, 65.0, TextOptions::right())?
            .text(&creator.address, 200.0, 80.0, TextOptions::right())?;
        Ok(())
    }

    fn generate_customer_information<S: DocumentSink>(
        &self,
        canvas: &mut PdfCanvas<S>,
    ) -> Result<()> {
        let invoice = self.invoice;
        let top = CUSTOMER_TOP;
        let left = TextOptions::default();

        // Body text stays gray from here to the end of the document
        canvas
            .set_fill_color(Color::from_hex(TEXT_COLOR)?)
            .set_font_size(20.0);
        canvas.text("Invoice", 50.0, 160.0, left)?;

        generate_hr(canvas, 185.0)?;

        canvas.set_font_size(10.0);
        canvas.text("Invoice Number:", 50.0, top, left)?;
        canvas.set_font(StandardFont::HelveticaBold);
        canvas.text(&invoice.invoice_number, 150.0, top, left)?;
        canvas.set_font(StandardFont::Helvetica);
        canvas
            .text("Invoice Date:", 50.0, top + 15.0, left)?
            .text(&format_date(invoice.created_at), 150.0, top + 15.0, left)?
            .text("Balance Due:", 50.0, top + 30.0, left)?
            .text(&format_currency(invoice.balance_due()), 150.0, top + 30.0, left)?;

        canvas.set_font(StandardFont::HelveticaBold);
        canvas.text(&invoice.client.name, 300.0, top, left)?;
        canvas.set_font(StandardFont::Helvetica);
        canvas
            .text(&invoice.client.email, 300.0, top + 15.0, left)?
            .text(&invoice.client.address, 300.0, top + 30.0, left)?;

        generate_hr(canvas, 252.0)?;
        Ok(())
    }

    fn generate_invoice_table<S: DocumentSink>(&self, canvas: &mut PdfCanvas<S>) -> Result<()> {
        let mut position = TABLE_TOP;
        generate_table_header(canvas, position)?;

        for entry in &self.invoice.items {
            position += ROW_HEIGHT;
            if position + RULE_OFFSET > TABLE_BOTTOM_LIMIT {
                position = continue_table(canvas)? + ROW_HEIGHT;
            }

            generate_table_row(
                canvas,
                position,
                &entry.item.name,
                &truncate_description(&entry.item.description),
                &format_currency(entry.item.cost),
                &entry.quantity.to_string(),
                &format_currency(entry.amount()),
            )?;
            generate_hr(canvas, position + RULE_OFFSET)?;
        }

        let mut subtotal_position = position + ROW_HEIGHT;
        if subtotal_position + PAID_OFFSET + DUE_OFFSET > TABLE_BOTTOM_LIMIT {
            subtotal_position = continue_table(canvas)? + ROW_HEIGHT;
        }

        let subtotal = self.invoice.subtotal();
        generate_table_row(
            canvas,
            subtotal_position,
            "",
            "",
            "Subtotal",
            "",
            &format_currency(subtotal),
        )?;

        let paid_to_date_position = subtotal_position + PAID_OFFSET;
        generate_table_row(
            canvas,
            paid_to_date_position,
            "",
            "",
            "Paid To Date",
            "",
            &format_currency(PAID_TO_DATE),
        )?;

        let due_position = paid_to_date_position + DUE_OFFSET;
        canvas.set_font(StandardFont::HelveticaBold);
        generate_table_row(
            canvas,
            due_position,
            "",
            "",
            "Balance Due",
            "",
            &format_currency(self.invoice.balance_due()),
        )?;
        canvas.set_font(StandardFont::Helvetica);

        Ok(())
    }

    fn generate_footer<S: DocumentSink>(&self, canvas: &mut PdfCanvas<S>) -> Result<()> {
        let message = format!(
            "Payment is due {}. Thank you for your business.",
            format_date(self.invoice.due_date)
        );

        canvas.set_font_size(10.0);
        canvas.text(
            &message,
            50.0,
            FOOTER_TOP,
            TextOptions::default().width(500.0).align(Align::Center),
        )?;
        Ok(())
    }
}

fn generate_table_header<S: DocumentSink>(canvas: &mut PdfCanvas<S>, y: f64) -> Result<()> {
    canvas.set_font(StandardFont::HelveticaBold);
    generate_table_row(
        canvas,
        y,
        "Item",
        "Description",
        "Unit Cost",
        "Quantity",
        "Line Total",
    )?;
    generate_hr(canvas, y + RULE_OFFSET)?;
    canvas.set_font(StandardFont::Helvetica);
    Ok(())
}

/// Start a new page and repeat the table header at its top
///
/// Returns the y of the repeated header row.
fn continue_table<S: DocumentSink>(canvas: &mut PdfCanvas<S>) -> Result<f64> {
    let page = canvas.add_page();
    let top = canvas.options().margins.top;
    log::trace!("item table continues on page {page}");

    generate_table_header(canvas, top)?;
    Ok(top)
}

fn generate_table_row<S: DocumentSink>(
    canvas: &mut PdfCanvas<S>,
    y: f64,
    item: &str,
    description: &str,
    unit_cost: &str,
    quantity: &str,
    line_total: &str,
) -> Result<()> {
    let column = TextOptions::default().width(90.0).align(Align::Right);

    canvas.set_font_size(10.0);
    canvas
        .text(item, 50.0, y, TextOptions::default())?
        .text(description, 150.0, y, TextOptions::default())?
        .text(unit_cost, 280.0, y, column)?
        .text(quantity, 370.0, y, column)?
        .text(line_total, 0.0, y, TextOptions::right())?;
    Ok(())
}

fn generate_hr<S: DocumentSink>(canvas: &mut PdfCanvas<S>, y: f64) -> Result<()> {
    canvas
        .set_stroke_color(Color::from_hex(RULE_COLOR)?)
        .set_line_width(1.0)
        .stroke_line(RULE_START, y, RULE_END, y)?;
    Ok(())
}

/// Render an invoice and stream it to `sink`
///
/// The sink receives every chunk of the document in order and is completed
/// once afterwards. On error the sink is never completed.
pub fn render_invoice<S: DocumentSink>(
    invoice: &Invoice,
    options: &RenderOptions,
    sink: S,
) -> Result<S> {
    let mut canvas = PdfCanvas::new(options.canvas.clone(), sink)?;
    InvoiceRenderer::new(invoice).render(&mut canvas)?;
    Ok(canvas.finish()?)
}

/// Render an invoice into an in-memory PDF
pub fn render_invoice_to_bytes(invoice: &Invoice, options: &RenderOptions) -> Result<Vec<u8>> {
    render_invoice(invoice, options, Vec::new())
}

/// Render an invoice on A4 with 50pt margins, delivering the PDF through callbacks
///
/// `on_chunk` is called with each piece of the document in order;
/// `on_complete` is called once after the last piece. If rendering fails the
/// error is returned and `on_complete` is not called.
///
/// # Example
/// ```ignore
/// let mut pdf = Vec::new();
/// create_invoice(&invoice, |chunk| pdf.extend_from_slice(chunk), || {})?;
/// ```
pub fn create_invoice<C, E>(invoice: &Invoice, on_chunk: C, on_complete: E) -> Result<()>
where
    C: FnMut(&[u8]),
    E: FnOnce(),
{
    render_invoice(
        invoice,
        &RenderOptions::default(),
        CallbackSink::new(on_chunk, on_complete),
    )?;
    Ok(())
}
