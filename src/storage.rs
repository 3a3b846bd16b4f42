// 🗄️ Storage handle - the one connection every operation runs against
//
// Constructed explicitly and handed to the reset engine, the loader and the
// query service. Each operation opens and closes its own transaction.

use crate::entities::Record;
use crate::error::{LedgerError, Result};
use crate::loader::{self, LoadReport};
use crate::query::{self, PurchaseLookup};
use crate::reset::{self, ResetReport};
use crate::schema::setup_database;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const IN_MEMORY: &str = ":memory:";

pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open a database file (created if missing) or `:memory:`, then make
    /// sure the schema exists
    pub fn open(target: &str) -> Result<Storage> {
        let conn = if target == IN_MEMORY {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(target))
        }
        .map_err(|e| LedgerError::Configuration(format!("cannot open database '{}': {}", target, e)))?;

        if target != IN_MEMORY {
            // WAL for crash recovery
            conn.pragma_update(None, "journal_mode", "WAL")?;
        }

        setup_database(&conn)?;
        info!(database = target, "storage ready");
        Ok(Storage { conn })
    }

    pub fn open_in_memory() -> Result<Storage> {
        Storage::open(IN_MEMORY)
    }

    /// Borrow the raw connection (read-only use)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn reset(&mut self) -> Result<ResetReport> {
        reset::truncate_all_tables(&mut self.conn)
    }

    pub fn load(&mut self, records: &[Record]) -> Result<LoadReport> {
        loader::insert_records(&mut self.conn, records)
    }

    /// Full reseed: empty the schema, then load
    pub fn reseed(&mut self, records: &[Record]) -> Result<(ResetReport, LoadReport)> {
        let reset = self.reset()?;
        let load = self.load(records)?;
        Ok((reset, load))
    }

    pub fn purchases(&self, publisher: &str) -> Result<PurchaseLookup> {
        query::find_purchases_by_publisher(&self.conn, publisher)
    }

    pub fn table_counts(&self) -> Result<BTreeMap<&'static str, i64>> {
        loader::table_counts(&self.conn)
    }
}
