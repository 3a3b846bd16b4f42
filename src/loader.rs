// 🚚 Dependency-Ordered Loader
//
// Records are grouped by entity kind and inserted parents-first
// (publisher, shop, book, stock, sale) whatever order they arrived in.
// Publisher/Shop/Book are skipped when their natural key already exists;
// Stock and Sale are event rows and always appended.
// The whole call is one transaction: any constraint failure rolls back
// every row staged by this call.

use crate::entities::{book, publisher, sale, shop, stock, EntityKind, Record, LOAD_ORDER};
use crate::error::{is_constraint_violation, LedgerError, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub publisher: usize,
    pub shop: usize,
    pub book: usize,
    pub stock: usize,
    pub sale: usize,
}

impl KindCounts {
    pub fn get(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Publisher => self.publisher,
            EntityKind::Shop => self.shop,
            EntityKind::Book => self.book,
            EntityKind::Stock => self.stock,
            EntityKind::Sale => self.sale,
        }
    }

    fn bump(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Publisher => self.publisher += 1,
            EntityKind::Shop => self.shop += 1,
            EntityKind::Book => self.book += 1,
            EntityKind::Stock => self.stock += 1,
            EntityKind::Sale => self.sale += 1,
        }
    }

    pub fn total(&self) -> usize {
        LOAD_ORDER.iter().map(|k| self.get(*k)).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub inserted: KindCounts,
    /// Natural-key matches that were left untouched
    pub skipped: KindCounts,
}

/// Insert `records` in dependency order inside a single transaction.
///
/// # Errors
/// `IntegrityViolation` when a row breaks a UNIQUE/FK/CHECK constraint;
/// nothing from this call is persisted in that case.
pub fn insert_records(conn: &mut Connection, records: &[Record]) -> Result<LoadReport> {
    let tx = conn.transaction()?;
    let mut report = LoadReport::default();

    for kind in LOAD_ORDER {
        for (index, record) in records.iter().enumerate().filter(|(_, r)| r.kind() == kind) {
            if let Some(existing_id) = find_existing(&tx, record)? {
                debug!(%kind, existing_id, "natural key already present, skipping");
                report.skipped.bump(kind);
                continue;
            }

            insert_one(&tx, record).map_err(|e| load_error(index, record, e))?;
            report.inserted.bump(kind);
        }
    }

    tx.commit()?;

    info!(
        inserted = report.inserted.total(),
        skipped = report.skipped.total(),
        "records loaded"
    );
    Ok(report)
}

/// Id of the row already holding this record's natural key, if any.
/// Always `None` for kinds without a natural key.
pub fn find_existing(conn: &Connection, record: &Record) -> Result<Option<i64>> {
    if !record.kind().has_natural_key() {
        return Ok(None);
    }

    let id = match record {
        Record::Publisher(p) => publisher::find_by_name(conn, &p.name)?.map(|row| row.id),
        Record::Shop(s) => shop::find_by_name(conn, &s.name)?.map(|row| row.id),
        Record::Book(b) => book::find_by_title(conn, &b.title)?.map(|row| row.id),
        Record::Stock(_) | Record::Sale(_) => None,
    };
    Ok(id)
}

fn insert_one(conn: &Connection, record: &Record) -> rusqlite::Result<i64> {
    match record {
        Record::Publisher(p) => publisher::insert(conn, p),
        Record::Shop(s) => shop::insert(conn, s),
        Record::Book(b) => book::insert(conn, b),
        Record::Stock(s) => stock::insert(conn, s),
        Record::Sale(s) => sale::insert(conn, s),
    }
}

fn load_error(index: usize, record: &Record, err: rusqlite::Error) -> LedgerError {
    if !is_constraint_violation(&err) {
        return err.into();
    }

    let violation = LedgerError::IntegrityViolation {
        entity: record.kind(),
        index,
        record: record.fields_json(),
        detail: err.to_string(),
    };
    warn!(error = %violation, "load rolled back");
    violation
}

/// Row count per table
pub fn table_counts(conn: &Connection) -> Result<BTreeMap<&'static str, i64>> {
    let mut counts = BTreeMap::new();
    for kind in LOAD_ORDER {
        let n: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table()),
            [],
            |row| row.get(0),
        )?;
        counts.insert(kind.table(), n);
    }
    Ok(counts)
}
