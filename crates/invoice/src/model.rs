//! Invoice data types

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

/// Amount already paid; invoices are always rendered as fully outstanding
pub const PAID_TO_DATE: f64 = 0.0;

/// An invoice to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number, shown in bold
    #[serde(deserialize_with = "string_or_number")]
    pub invoice_number: String,

    /// Issue date
    #[serde(rename = "createdAt", deserialize_with = "calendar_date")]
    pub created_at: NaiveDate,

    /// Payment due date
    #[serde(deserialize_with = "calendar_date")]
    pub due_date: NaiveDate,

    /// Party issuing the invoice
    pub creator: Party,

    /// Party being billed
    pub client: Party,

    /// Line items in display order
    #[serde(default)]
    pub items: Vec<LineEntry>,
}

impl Invoice {
    /// Sum of all line totals, in item order
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .fold(0.0, |total, entry| total + entry.amount())
    }

    /// Amount still owed
    pub fn balance_due(&self) -> f64 {
        self.subtotal() - PAID_TO_DATE
    }
}

/// Name and contact details of a creator or client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// One invoice row: a quantity of a priced item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineEntry {
    pub quantity: u32,
    pub item: Item,
}

impl LineEntry {
    pub fn new(quantity: u32, item: Item) -> Self {
        Self { quantity, item }
    }

    /// Line total (quantity x unit cost)
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.item.cost
    }
}

/// A priced item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit cost
    pub cost: f64,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            cost,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Integer(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    })
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
///
/// Timestamps take the calendar day of the local time zone.
fn calendar_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_calendar_date(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {text}")))
}

pub(crate) fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    parse_calendar_date_in(text, &Local)
}

/// Parse a date, reading timestamps in `tz`
fn parse_calendar_date_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(tz).date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}
