// 📂 Fixture reader - JSON file → typed records
//
// Input shape: [{ "model": "book", "pk": 1, "fields": { ... } }, ...]
// `pk` is ignored, ids are always assigned by the database.
// A malformed record is set aside with its reason; it never aborts a load.

use crate::entities::{EntityKind, Record};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::warn;

/// One `{model, fields}` object exactly as it appears in the file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawRecord {
    pub model: String,
    #[serde(default)]
    pub fields: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct Fixture {
    pub records: Vec<RawRecord>,
    /// SHA-256 of the file contents (hex)
    pub digest: String,
    /// Path the fixture was read from; `None` for in-memory bytes
    pub source: Option<String>,
}

/// A fixture record that could not be turned into a `Record`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub model: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedFixture {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRecord>,
}

pub fn compute_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Read and parse a fixture file. Runs before any transaction is opened.
pub fn read_fixture(path: &Path) -> Result<Fixture> {
    let content = std::fs::read(path).map_err(|e| {
        LedgerError::Configuration(format!(
            "cannot read fixture file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut fixture = parse_fixture(&content)?;
    fixture.source = Some(path.display().to_string());
    Ok(fixture)
}

/// Parse fixture bytes; the top level must be a JSON array
pub fn parse_fixture(content: &[u8]) -> Result<Fixture> {
    let value: serde_json::Value = serde_json::from_slice(content)?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(LedgerError::Configuration(
                "fixture must be a JSON array of {model, fields} objects".to_string(),
            ))
        }
    };

    // Items that are not even {model, fields} objects are kept with an empty
    // tag so they surface as skipped records with their original index
    let records = items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|_| RawRecord {
                model: String::new(),
                fields: serde_json::Value::Null,
            })
        })
        .collect();

    Ok(Fixture {
        records,
        digest: compute_digest(content),
        source: None,
    })
}

impl RawRecord {
    /// Total mapping from tag to variant; anything else is a MalformedRecord
    pub fn to_record(&self, index: usize) -> Result<Record> {
        let kind = EntityKind::from_tag(&self.model).ok_or_else(|| LedgerError::MalformedRecord {
            index,
            reason: format!("unknown model '{}'", self.model),
        })?;

        Record::from_fields(kind, self.fields.clone()).map_err(|e| LedgerError::MalformedRecord {
            index,
            reason: format!("{} fields: {}", kind, e),
        })
    }
}

impl Fixture {
    /// Where the records came from, for logs and CLI output
    pub fn source_name(&self) -> &str {
        self.source.as_deref().unwrap_or("<inline>")
    }

    pub fn into_records(self) -> ParsedFixture {
        let mut parsed = ParsedFixture::default();

        for (index, raw) in self.records.iter().enumerate() {
            match raw.to_record(index) {
                Ok(record) => parsed.records.push(record),
                Err(err) => {
                    let reason = match err {
                        LedgerError::MalformedRecord { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    warn!(
                        source = self.source_name(),
                        index,
                        model = %raw.model,
                        %reason,
                        "skipping malformed fixture record"
                    );
                    parsed.skipped.push(SkippedRecord {
                        index,
                        model: raw.model.clone(),
                        reason,
                    });
                }
            }
        }

        parsed
    }
}
