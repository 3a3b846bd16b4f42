// 📐 Schema Model - table definitions and their FK dependency graph
//
// Tables are declared once with the tables they reference. Creation and
// insertion follow the topological order of that graph; deletion follows
// its reverse.

use crate::error::{LedgerError, Result};
use rusqlite::Connection;

// ============================================================================
// TABLE DEFINITIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    /// Tables this one holds foreign keys into
    pub depends_on: &'static [&'static str],
    pub ddl: &'static str,
}

pub static PUBLISHER: TableDef = TableDef {
    name: "publisher",
    depends_on: &[],
    ddl: "CREATE TABLE IF NOT EXISTS publisher (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(40) NOT NULL UNIQUE
        )",
};

pub static BOOK: TableDef = TableDef {
    name: "book",
    depends_on: &["publisher"],
    ddl: "CREATE TABLE IF NOT EXISTS book (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title VARCHAR(40) NOT NULL UNIQUE,
            publisher_id INTEGER NOT NULL REFERENCES publisher(id)
        )",
};

pub static SHOP: TableDef = TableDef {
    name: "shop",
    depends_on: &[],
    ddl: "CREATE TABLE IF NOT EXISTS shop (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(40) NOT NULL UNIQUE
        )",
};

pub static STOCK: TableDef = TableDef {
    name: "stock",
    depends_on: &["book", "shop"],
    ddl: "CREATE TABLE IF NOT EXISTS stock (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            count INTEGER NOT NULL CHECK (count >= 0),
            book_id INTEGER NOT NULL REFERENCES book(id),
            shop_id INTEGER NOT NULL REFERENCES shop(id)
        )",
};

pub static SALE: TableDef = TableDef {
    name: "sale",
    depends_on: &["stock"],
    ddl: "CREATE TABLE IF NOT EXISTS sale (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            price TEXT NOT NULL,
            date_sale TEXT NOT NULL,
            count INTEGER NOT NULL CHECK (count >= 0),
            stock_id INTEGER NOT NULL REFERENCES stock(id)
        )",
};

/// Every table of the schema, in declaration order
pub static TABLES: &[&TableDef] = &[&PUBLISHER, &BOOK, &SHOP, &STOCK, &SALE];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_book_publisher ON book(publisher_id)",
    "CREATE INDEX IF NOT EXISTS idx_stock_book ON stock(book_id)",
    "CREATE INDEX IF NOT EXISTS idx_stock_shop ON stock(shop_id)",
    "CREATE INDEX IF NOT EXISTS idx_sale_stock ON sale(stock_id)",
    "CREATE INDEX IF NOT EXISTS idx_sale_date ON sale(date_sale)",
];

// ============================================================================
// TOPOLOGICAL ORDER
// ============================================================================

/// Sort tables so every table comes after the tables it references.
///
/// Kahn's algorithm; among tables that are ready at the same time the one
/// declared first wins, so the result is deterministic.
pub fn sort_tables<'a>(tables: &[&'a TableDef]) -> Result<Vec<&'a TableDef>> {
    for table in tables {
        for dep in table.depends_on {
            if !tables.iter().any(|t| t.name == *dep) {
                return Err(LedgerError::Schema(format!(
                    "table '{}' references unknown table '{}'",
                    table.name, dep
                )));
            }
        }
    }

    let mut sorted: Vec<&TableDef> = Vec::with_capacity(tables.len());
    let mut remaining: Vec<&TableDef> = tables.to_vec();

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|t| {
            t.depends_on
                .iter()
                .all(|dep| sorted.iter().any(|s| s.name == *dep))
        });

        match ready {
            Some(pos) => sorted.push(remaining.remove(pos)),
            None => {
                let names: Vec<&str> = remaining.iter().map(|t| t.name).collect();
                return Err(LedgerError::Schema(format!(
                    "dependency cycle among tables: {}",
                    names.join(", ")
                )));
            }
        }
    }

    Ok(sorted)
}

/// Tables of this schema in creation (= insertion) order
pub fn sorted_tables() -> Result<Vec<&'static TableDef>> {
    sort_tables(TABLES)
}

/// Create every table (if missing) plus the FK and date indexes
pub fn setup_database(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    for table in sorted_tables()? {
        conn.execute(table.ddl, [])?;
    }

    for index in INDEXES {
        conn.execute(index, [])?;
    }

    Ok(())
}
