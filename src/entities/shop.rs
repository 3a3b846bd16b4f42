// 🏪 Shop - natural key: name

use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShop {
    pub name: String,
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Shop>> {
    let shop = conn
        .query_row(
            "SELECT id, name FROM shop WHERE name = ?1",
            params![name],
            |row| {
                Ok(Shop {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(shop)
}

pub fn insert(conn: &Connection, new: &NewShop) -> rusqlite::Result<i64> {
    conn.execute("INSERT INTO shop (name) VALUES (?1)", params![new.name])?;
    Ok(conn.last_insert_rowid())
}
