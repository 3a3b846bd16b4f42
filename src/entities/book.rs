// 📚 Book - natural key: title, belongs to a Publisher

use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub publisher_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(alias = "id_publisher")]
    pub publisher_id: i64,
}

pub fn find_by_title(conn: &Connection, title: &str) -> Result<Option<Book>> {
    let book = conn
        .query_row(
            "SELECT id, title, publisher_id FROM book WHERE title = ?1",
            params![title],
            |row| {
                Ok(Book {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    publisher_id: row.get(2)?,
                })
            },
        )
        .optional()?;

    Ok(book)
}

/// Fails with a FOREIGN KEY violation when `publisher_id` does not exist
pub fn insert(conn: &Connection, new: &NewBook) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO book (title, publisher_id) VALUES (?1, ?2)",
        params![new.title, new.publisher_id],
    )?;
    Ok(conn.last_insert_rowid())
}
