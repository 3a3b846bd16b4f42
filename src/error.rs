// ⚠️ Error types for the ledger library
// Constraint failures roll a transaction back; everything else is caught
// before a mutating statement runs.

use crate::entities::EntityKind;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// UNIQUE / FOREIGN KEY / CHECK / NOT NULL failure during load.
    /// The surrounding transaction has already been rolled back.
    #[error("integrity violation in {entity} record #{index} {record}: {detail}")]
    IntegrityViolation {
        entity: EntityKind,
        /// Position of the record in the loader's input slice
        index: usize,
        /// Fields of the offending record, rendered as JSON
        record: String,
        detail: String,
    },

    /// A table could not be emptied because rows outside the reset set still
    /// reference it. Nothing was deleted.
    #[error("integrity violation while resetting table {table}: {detail}")]
    ResetViolation { table: String, detail: String },

    /// Fixture record with an unknown model tag or missing/mistyped fields.
    #[error("malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// Missing fixture file, unopenable database, ...
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Table definitions do not form a DAG
    #[error("schema error: {0}")]
    Schema(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            LedgerError::IntegrityViolation { .. } | LedgerError::ResetViolation { .. }
        )
    }
}

/// True when SQLite rejected a statement because of a constraint
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
