// Bookshop Ledger - Core Library
// Seeds the publisher/book/shop/stock/sale schema from a fixture and
// answers the purchases-by-publisher report. Used by the CLI and the tests.

pub mod error;
pub mod schema;
pub mod entities;
pub mod fixtures;
pub mod reset;
pub mod loader;
pub mod query;
pub mod storage;

// Re-export commonly used types
pub use error::{LedgerError, Result};
pub use schema::{setup_database, sorted_tables, TableDef};
pub use entities::{
    EntityKind, Record, LOAD_ORDER,
    Publisher, NewPublisher, Shop, NewShop, Book, NewBook,
    NewStock, NewSale,
};
pub use fixtures::{read_fixture, parse_fixture, Fixture, ParsedFixture, RawRecord, SkippedRecord};
pub use reset::{truncate_all_tables, ResetReport};
pub use loader::{insert_records, table_counts, KindCounts, LoadReport};
pub use query::{
    find_purchases_by_publisher, write_csv, Purchase, PublisherRef, PurchaseLookup,
};
pub use storage::Storage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
