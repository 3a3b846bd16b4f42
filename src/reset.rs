// 🧹 Truncation/Reset Engine
//
// Empties every table children-first and rewinds each AUTOINCREMENT
// counter so the next row gets id = 1. One transaction: either every
// table is reset or none is.

use crate::error::{is_constraint_violation, LedgerError, Result};
use crate::schema::{sort_tables, TableDef, TABLES};
use rusqlite::{params, Connection};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    /// (table, rows deleted), in deletion order
    pub deleted: Vec<(&'static str, usize)>,
}

impl ResetReport {
    pub fn total_deleted(&self) -> usize {
        self.deleted.iter().map(|(_, n)| n).sum()
    }
}

/// Destructive: removes every row of the schema
pub fn truncate_all_tables(conn: &mut Connection) -> Result<ResetReport> {
    truncate_tables(conn, TABLES)
}

pub fn truncate_tables(conn: &mut Connection, tables: &[&'static TableDef]) -> Result<ResetReport> {
    let mut order = sort_tables(tables)?;
    order.reverse();

    let tx = conn.transaction()?;
    let mut deleted = Vec::with_capacity(order.len());

    for table in order {
        let rows = tx
            .execute(&format!("DELETE FROM {}", table.name), [])
            .map_err(|e| reset_error(table.name, e))?;

        // sqlite_sequence exists once any AUTOINCREMENT table does
        tx.execute(
            "DELETE FROM sqlite_sequence WHERE name = ?1",
            params![table.name],
        )?;

        deleted.push((table.name, rows));
    }

    tx.commit()?;

    let report = ResetReport { deleted };
    info!(
        tables = report.deleted.len(),
        rows = report.total_deleted(),
        "schema reset, identity counters restarted at 1"
    );
    Ok(report)
}

fn reset_error(table: &str, err: rusqlite::Error) -> LedgerError {
    if !is_constraint_violation(&err) {
        return err.into();
    }

    warn!(table, error = %err, "reset rolled back");
    LedgerError::ResetViolation {
        table: table.to_string(),
        detail: err.to_string(),
    }
}
