// Entity Models - one module per table
//
// Each entity has:
// - A New* type (what a fixture supplies, id excluded)
// - An insert function taking a borrowed connection, so the same code runs
//   against a plain Connection or an open Transaction
// Entities with a natural key also have a row type and a lookup by that key.

pub mod publisher;
pub mod shop;
pub mod book;
pub mod stock;
pub mod sale;

pub use publisher::{NewPublisher, Publisher};
pub use shop::{NewShop, Shop};
pub use book::{Book, NewBook};
pub use stock::NewStock;
pub use sale::{parse_sale_date, NewSale};

use serde::Serialize;
use std::fmt;

// ============================================================================
// ENTITY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Publisher,
    Shop,
    Book,
    Stock,
    Sale,
}

/// Parents before children. Never derived from input order.
pub const LOAD_ORDER: [EntityKind; 5] = [
    EntityKind::Publisher,
    EntityKind::Shop,
    EntityKind::Book,
    EntityKind::Stock,
    EntityKind::Sale,
];

impl EntityKind {
    /// Fixture `model` tag
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::Publisher => "publisher",
            EntityKind::Shop => "shop",
            EntityKind::Book => "book",
            EntityKind::Stock => "stock",
            EntityKind::Sale => "sale",
        }
    }

    pub fn from_tag(tag: &str) -> Option<EntityKind> {
        LOAD_ORDER.iter().copied().find(|kind| kind.tag() == tag)
    }

    /// Table backing this entity
    pub fn table(&self) -> &'static str {
        self.tag()
    }

    /// Publisher, Shop and Book carry a natural key and are skipped when
    /// already present; Stock and Sale rows are always appended.
    pub fn has_natural_key(&self) -> bool {
        matches!(
            self,
            EntityKind::Publisher | EntityKind::Shop | EntityKind::Book
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// RECORD - closed tagged variant over the five entity kinds
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", content = "fields", rename_all = "lowercase")]
pub enum Record {
    Publisher(NewPublisher),
    Shop(NewShop),
    Book(NewBook),
    Stock(NewStock),
    Sale(NewSale),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Publisher(_) => EntityKind::Publisher,
            Record::Shop(_) => EntityKind::Shop,
            Record::Book(_) => EntityKind::Book,
            Record::Stock(_) => EntityKind::Stock,
            Record::Sale(_) => EntityKind::Sale,
        }
    }

    /// Build the variant for `kind` from a fixture's `fields` object
    pub fn from_fields(
        kind: EntityKind,
        fields: serde_json::Value,
    ) -> Result<Record, serde_json::Error> {
        Ok(match kind {
            EntityKind::Publisher => Record::Publisher(serde_json::from_value(fields)?),
            EntityKind::Shop => Record::Shop(serde_json::from_value(fields)?),
            EntityKind::Book => Record::Book(serde_json::from_value(fields)?),
            EntityKind::Stock => Record::Stock(serde_json::from_value(fields)?),
            EntityKind::Sale => Record::Sale(serde_json::from_value(fields)?),
        })
    }

    /// Fields rendered as compact JSON, for error context
    pub fn fields_json(&self) -> String {
        let fields = match self {
            Record::Publisher(r) => serde_json::to_string(r),
            Record::Shop(r) => serde_json::to_string(r),
            Record::Book(r) => serde_json::to_string(r),
            Record::Stock(r) => serde_json::to_string(r),
            Record::Sale(r) => serde_json::to_string(r),
        };
        fields.unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
pub(crate) fn test_connection() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    crate::schema::setup_database(&conn).unwrap();
    conn
}
