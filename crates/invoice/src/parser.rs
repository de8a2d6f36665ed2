//! Invoice JSON parsing

use crate::{Invoice, InvoiceError, Result};

/// Parse an invoice from JSON string
pub fn parse_invoice(json: &str) -> Result<Invoice> {
    serde_json::from_str(json).map_err(|e| InvoiceError::ParseError(e.to_string()))
}

/// Build an invoice from an already-parsed JSON value
pub fn invoice_from_value(value: serde_json::Value) -> Result<Invoice> {
    serde_json::from_value(value).map_err(|e| InvoiceError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const INVOICE_JSON: &str = r#"{
        "invoice_number": 1234,
        "createdAt": "2024-03-07T12:00:00.000Z",
        "due_date": "2024-04-06",
        "creator": { "name": "Acme Ltd", "email": "billing@acme.test", "address": "1 Main St" },
        "client": { "name": "Jane Doe", "email": "jane@example.test", "address": "2 Side Rd" },
        "items": [
            { "quantity": 2, "item": { "name": "Widget", "description": "A small widget", "cost": 9.99 } }
        ]
    }"#;

    #[test]
    fn test_parse_invoice() {
        let invoice = parse_invoice(INVOICE_JSON).unwrap();

        assert_eq!(invoice.invoice_number, "1234");
        assert_eq!(
            invoice.created_at,
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
        );
        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2024, 4, 6).unwrap());
        assert_eq!(invoice.creator.name, "Acme Ltd");
        assert_eq!(invoice.client.email, "jane@example.test");
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].quantity, 2);
        assert_eq!(invoice.items[0].item.cost, 9.99);
    }

    #[test]
    fn test_parse_invoice_missing_items() {
        let json = r#"{
            "invoice_number": "INV-1",
            "createdAt": "2024-01-01",
            "due_date": "2024-01-31",
            "creator": { "name": "A", "email": "a@a", "address": "A" },
            "client": { "name": "B", "email": "b@b", "address": "B" }
        }"#;
        let invoice = parse_invoice(json).unwrap();
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn test_parse_invoice_bad_date() {
        let json = INVOICE_JSON.replace("2024-04-06", "next tuesday");
        let err = parse_invoice(&json).unwrap_err();
        assert!(matches!(err, InvoiceError::ParseError(_)));
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_parse_invoice_negative_quantity() {
        let json = INVOICE_JSON.replace("\"quantity\": 2", "\"quantity\": -2");
        assert!(parse_invoice(&json).is_err());
    }

    #[test]
    fn test_invoice_from_value() {
        let value = json!({
            "invoice_number": "A-1",
            "createdAt": "2024-05-01",
            "due_date": "2024-05-31",
            "creator": { "name": "A", "email": "a@a", "address": "A" },
            "client": { "name": "B", "email": "b@b", "address": "B" },
            "items": []
        });
        let invoice = invoice_from_value(value).unwrap();
        assert_eq!(invoice.invoice_number, "A-1");
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let invoice = parse_invoice(INVOICE_JSON).unwrap();
        let value = serde_json::to_value(&invoice).unwrap();
        assert_eq!(value["createdAt"], json!("2024-03-07"));
        assert_eq!(value["due_date"], json!("2024-04-06"));
        assert_eq!(value["invoice_number"], json!("1234"));
    }
}
