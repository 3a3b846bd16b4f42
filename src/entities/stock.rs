// 📦 Stock - one book title available at one shop
// No natural key: every fixture row becomes a new inventory line.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStock {
    pub count: i64,
    #[serde(alias = "id_book")]
    pub book_id: i64,
    #[serde(alias = "id_shop")]
    pub shop_id: i64,
}

pub fn insert(conn: &Connection, new: &NewStock) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO stock (count, book_id, shop_id) VALUES (?1, ?2, ?3)",
        params![new.count, new.book_id, new.shop_id],
    )?;
    Ok(conn.last_insert_rowid())
}
