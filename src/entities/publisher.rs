// 🏢 Publisher - natural key: name

use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPublisher {
    pub name: String,
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Publisher>> {
    let publisher = conn
        .query_row(
            "SELECT id, name FROM publisher WHERE name = ?1",
            params![name],
            |row| {
                Ok(Publisher {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(publisher)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Publisher>> {
    let publisher = conn
        .query_row(
            "SELECT id, name FROM publisher WHERE id = ?1",
            params![id],
            |row| {
                Ok(Publisher {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(publisher)
}

/// Insert and return the assigned id
pub fn insert(conn: &Connection, new: &NewPublisher) -> rusqlite::Result<i64> {
    conn.execute("INSERT INTO publisher (name) VALUES (?1)", params![new.name])?;
    Ok(conn.last_insert_rowid())
}
