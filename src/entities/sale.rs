// 💰 Sale - a purchase event against a stock line
// No natural key. Price is fixed-point with exactly two fraction digits.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Fraction digits kept for every price
pub const PRICE_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    #[serde(deserialize_with = "deserialize_sale_date")]
    pub date_sale: NaiveDateTime,
    pub count: i64,
    #[serde(alias = "id_stock")]
    pub stock_id: i64,
}

/// Round half away from zero (as a NUMERIC(_, 2) column does) and pin the
/// scale, so 20 renders as "20.00"
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut price = price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(PRICE_SCALE);
    price
}

/// Accepts RFC 3339 (wall-clock time kept, offset dropped), naive ISO
/// date-times with `T` or a space, and bare dates (midnight).
pub fn parse_sale_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => n.to_string(),
        RawPrice::Text(s) => s,
    };

    Decimal::from_str(text.trim())
        .map(normalize_price)
        .map_err(|e| serde::de::Error::custom(format!("invalid price '{}': {}", text, e)))
}

fn deserialize_sale_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_sale_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date_sale '{}'", raw)))
}

/// Price is stored as canonical decimal text
pub fn insert(conn: &Connection, new: &NewSale) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO sale (price, date_sale, count, stock_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            normalize_price(new.price).to_string(),
            new.date_sale,
            new.count,
            new.stock_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
