// 🔎 Purchase Query Service
//
// Publisher (by id or exact name) → book → stock → sale → shop, inner joins
// throughout, oldest sale first. Read-only: takes a shared connection.

use crate::entities::publisher::{self, Publisher};
use crate::error::Result;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Display width of the shop column in the text report
pub const SHOP_COLUMN_WIDTH: usize = 15;

// ============================================================================
// PUBLISHER REFERENCE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherRef {
    Id(i64),
    Name(String),
}

impl PublisherRef {
    /// Only ASCII digits make an id (no sign); anything else is an exact name
    pub fn parse(input: &str) -> PublisherRef {
        let input = input.trim();
        let all_digits = !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit());
        match input.parse::<i64>() {
            Ok(id) if all_digits => PublisherRef::Id(id),
            _ => PublisherRef::Name(input.to_string()),
        }
    }
}

impl fmt::Display for PublisherRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublisherRef::Id(id) => write!(f, "{}", id),
            PublisherRef::Name(name) => f.write_str(name),
        }
    }
}

pub fn find_publisher(conn: &Connection, reference: &PublisherRef) -> Result<Option<Publisher>> {
    match reference {
        PublisherRef::Id(id) => publisher::find_by_id(conn, *id),
        PublisherRef::Name(name) => publisher::find_by_name(conn, name),
    }
}

// ============================================================================
// PURCHASES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Purchase {
    pub title: String,
    #[serde(rename = "shop")]
    pub shop_name: String,
    pub price: Decimal,
    pub date_sale: NaiveDateTime,
}

impl Purchase {
    /// `title | shop (padded/cut to 15) | price | dd-mm-YYYY`
    pub fn report_line(&self) -> String {
        format!(
            "{} | {:<width$.width$} | {} | {}",
            self.title,
            self.shop_name,
            self.price,
            self.date_sale.format("%d-%m-%Y"),
            width = SHOP_COLUMN_WIDTH
        )
    }
}

/// Outcome of a purchase lookup. An unknown publisher is a normal result.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseLookup {
    PublisherNotFound(PublisherRef),
    Found {
        publisher: Publisher,
        purchases: Vec<Purchase>,
    },
}

impl PurchaseLookup {
    pub fn purchases(&self) -> &[Purchase] {
        match self {
            PurchaseLookup::PublisherNotFound(_) => &[],
            PurchaseLookup::Found { purchases, .. } => purchases,
        }
    }

    /// Human-facing report: header plus one line per purchase, or the
    /// not-found notice
    pub fn render(&self) -> String {
        match self {
            PurchaseLookup::PublisherNotFound(reference) => {
                format!("Publisher '{}' not found.", reference)
            }
            PurchaseLookup::Found { publisher, purchases } => {
                let mut out = format!("Purchases of books by publisher '{}':", publisher.name);
                for purchase in purchases {
                    out.push('\n');
                    out.push_str(&purchase.report_line());
                }
                out
            }
        }
    }
}

/// Resolve `input` to a publisher and list its purchases, oldest first
pub fn find_purchases_by_publisher(conn: &Connection, input: &str) -> Result<PurchaseLookup> {
    let reference = PublisherRef::parse(input);

    let publisher = match find_publisher(conn, &reference)? {
        Some(publisher) => publisher,
        None => return Ok(PurchaseLookup::PublisherNotFound(reference)),
    };

    let purchases = purchases_for_publisher(conn, publisher.id)?;
    Ok(PurchaseLookup::Found {
        publisher,
        purchases,
    })
}

pub fn purchases_for_publisher(conn: &Connection, publisher_id: i64) -> Result<Vec<Purchase>> {
    let mut stmt = conn.prepare(
        "SELECT book.title, shop.name, sale.price, sale.date_sale
         FROM book
         JOIN stock ON stock.book_id = book.id
         JOIN sale ON sale.stock_id = stock.id
         JOIN shop ON shop.id = stock.shop_id
         WHERE book.publisher_id = ?1
         ORDER BY sale.date_sale, sale.id",
    )?;

    let purchases = stmt
        .query_map(params![publisher_id], |row| {
            let price: String = row.get(2)?;
            let price = Decimal::from_str(&price).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
            })?;

            Ok(Purchase {
                title: row.get(0)?,
                shop_name: row.get(1)?,
                price,
                date_sale: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(purchases)
}

/// Export purchases as CSV with a `title,shop,price,date_sale` header
pub fn write_csv<W: Write>(purchases: &[Purchase], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for purchase in purchases {
        wtr.serialize(purchase)?;
    }
    wtr.flush()?;
    Ok(())
}
