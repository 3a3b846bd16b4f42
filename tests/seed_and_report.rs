// End-to-end: fixture file → reseed → purchases report

use bookshop_ledger::{read_fixture, LedgerError, PurchaseLookup, Record, Storage};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CATALOG: &str = r#"[
    {"model": "publisher", "pk": 1, "fields": {"name": "Acme"}},
    {"model": "shop", "pk": 1, "fields": {"name": "Downtown"}},
    {"model": "book", "pk": 1, "fields": {"title": "Widgets 101", "id_publisher": 1}},
    {"model": "stock", "pk": 1, "fields": {"id_shop": 1, "id_book": 1, "count": 5}},
    {"model": "sale", "pk": 1, "fields": {"price": "19.99", "date_sale": "2024-01-15T00:00:00.000Z", "count": 1, "id_stock": 1}}
]"#;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn records_from(dir: &TempDir, content: &str) -> Vec<Record> {
    let path = write_fixture(dir, "fixture.json", content);
    let parsed = read_fixture(&path).unwrap().into_records();
    assert!(parsed.skipped.is_empty(), "unexpected skips: {:?}", parsed.skipped);
    parsed.records
}

fn counts(storage: &Storage) -> Vec<i64> {
    let counts = storage.table_counts().unwrap();
    ["publisher", "shop", "book", "stock", "sale"]
        .iter()
        .map(|t| counts[t])
        .collect()
}

#[test]
fn test_query_by_id_and_name() {
    let dir = TempDir::new().unwrap();
    let records = records_from(&dir, CATALOG);
    let mut storage = Storage::open_in_memory().unwrap();
    storage.reseed(&records).unwrap();

    for input in ["1", "Acme"] {
        let lookup = storage.purchases(input).unwrap();
        let purchases = lookup.purchases();
        assert_eq!(purchases.len(), 1, "input {input}");
        assert_eq!(purchases[0].title, "Widgets 101");
        assert_eq!(purchases[0].shop_name, "Downtown");
        assert_eq!(purchases[0].price.to_string(), "19.99");
        assert_eq!(purchases[0].date_sale.format("%Y-%m-%d").to_string(), "2024-01-15");
        assert_eq!(
            lookup.render(),
            "Purchases of books by publisher 'Acme':\nWidgets 101 | Downtown        | 19.99 | 15-01-2024"
        );
    }

    for input in ["2", "Unknown"] {
        let lookup = storage.purchases(input).unwrap();
        assert!(matches!(lookup, PurchaseLookup::PublisherNotFound(_)));
        assert!(lookup.purchases().is_empty());
        assert!(lookup.render().ends_with("not found."));
    }
}

#[test]
fn test_reseed_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let records = records_from(&dir, CATALOG);
    let mut storage = Storage::open_in_memory().unwrap();

    storage.reseed(&records).unwrap();
    assert_eq!(counts(&storage), vec![1, 1, 1, 1, 1]);

    storage.reseed(&records).unwrap();
    assert_eq!(counts(&storage), vec![1, 1, 1, 1, 1]);
    assert_eq!(storage.purchases("1").unwrap().purchases().len(), 1);
}

#[test]
fn test_load_twice_without_reset_duplicates_only_events() {
    let dir = TempDir::new().unwrap();
    let records = records_from(&dir, CATALOG);
    let mut storage = Storage::open_in_memory().unwrap();

    storage.load(&records).unwrap();
    let report = storage.load(&records).unwrap();

    assert_eq!(report.skipped.total(), 3);
    assert_eq!(counts(&storage), vec![1, 1, 1, 2, 2]);
}

#[test]
fn test_shuffled_input_still_loads() {
    let dir = TempDir::new().unwrap();
    let shuffled = r#"[
        {"model": "sale", "fields": {"price": 19.99, "date_sale": "2024-01-15", "count": 1, "stock_id": 1}},
        {"model": "stock", "fields": {"shop_id": 1, "book_id": 1, "count": 5}},
        {"model": "book", "fields": {"title": "Widgets 101", "publisher_id": 1}},
        {"model": "shop", "fields": {"name": "Downtown"}},
        {"model": "publisher", "fields": {"name": "Acme"}}
    ]"#;
    let records = records_from(&dir, shuffled);
    let mut storage = Storage::open_in_memory().unwrap();

    let (_, report) = storage.reseed(&records).unwrap();
    assert_eq!(report.inserted.total(), 5);
    assert_eq!(storage.purchases("Acme").unwrap().purchases().len(), 1);
}

#[test]
fn test_dangling_sale_persists_nothing() {
    let dir = TempDir::new().unwrap();
    let broken = CATALOG.replace(
        "\n]",
        r#",
    {"model": "sale", "fields": {"price": "5.00", "date_sale": "2024-02-01", "count": 1, "stock_id": 99}}
]"#,
    );
    let records = records_from(&dir, &broken);
    let mut storage = Storage::open_in_memory().unwrap();

    let err = storage.load(&records).unwrap_err();
    assert!(matches!(err, LedgerError::IntegrityViolation { .. }));
    assert_eq!(counts(&storage), vec![0, 0, 0, 0, 0]);

    // Existing rows are untouched by a failed call as well
    storage.load(&records_from(&dir, CATALOG)).unwrap();
    assert!(storage.load(&records).is_err());
    assert_eq!(counts(&storage), vec![1, 1, 1, 1, 1]);
}

#[test]
fn test_reset_restarts_ids_at_one() {
    let dir = TempDir::new().unwrap();
    let records = records_from(&dir, CATALOG);
    let mut storage = Storage::open_in_memory().unwrap();

    storage.load(&records).unwrap();
    storage.load(&records).unwrap();
    let report = storage.reset().unwrap();
    assert_eq!(report.total_deleted(), 7);
    assert_eq!(counts(&storage), vec![0, 0, 0, 0, 0]);

    // A fresh load lines up with the fixture's hard-coded ids again
    storage.load(&records).unwrap();
    let max_ids: Vec<i64> = ["publisher", "shop", "book", "stock", "sale"]
        .iter()
        .map(|t| {
            storage
                .connection()
                .query_row(&format!("SELECT MAX(id) FROM {t}"), [], |row| row.get(0))
                .unwrap()
        })
        .collect();
    assert_eq!(max_ids, vec![1, 1, 1, 1, 1]);
}

#[test]
fn test_other_publishers_sales_excluded() {
    let dir = TempDir::new().unwrap();
    let two_publishers = r#"[
        {"model": "publisher", "fields": {"name": "Acme"}},
        {"model": "publisher", "fields": {"name": "Rival"}},
        {"model": "shop", "fields": {"name": "Downtown"}},
        {"model": "book", "fields": {"title": "Widgets 101", "publisher_id": 1}},
        {"model": "book", "fields": {"title": "Rival Reads", "publisher_id": 2}},
        {"model": "stock", "fields": {"shop_id": 1, "book_id": 1, "count": 5}},
        {"model": "stock", "fields": {"shop_id": 1, "book_id": 2, "count": 5}},
        {"model": "sale", "fields": {"price": "19.99", "date_sale": "2024-01-15", "count": 1, "stock_id": 1}},
        {"model": "sale", "fields": {"price": "8.00", "date_sale": "2024-01-10", "count": 1, "stock_id": 2}}
    ]"#;
    let records = records_from(&dir, two_publishers);
    let mut storage = Storage::open_in_memory().unwrap();
    storage.reseed(&records).unwrap();

    let acme = storage.purchases("Acme").unwrap();
    let titles: Vec<&str> = acme.purchases().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Widgets 101"]);

    let rival = storage.purchases("2").unwrap();
    let titles: Vec<&str> = rival.purchases().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Rival Reads"]);
}

#[test]
fn test_malformed_records_do_not_abort_load() {
    let dir = TempDir::new().unwrap();
    let messy = r#"[
        {"model": "publisher", "fields": {"name": "Acme"}},
        {"model": "magazine", "fields": {"name": "Monthly"}},
        {"model": "shop", "fields": {"label": "no name key"}},
        {"model": "sale", "fields": {"price": 1.0, "date_sale": "yesterday", "count": 1, "stock_id": 1}}
    ]"#;
    let path = write_fixture(&dir, "messy.json", messy);
    let parsed = read_fixture(&path).unwrap().into_records();

    let skipped: Vec<usize> = parsed.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, vec![1, 2, 3]);

    let mut storage = Storage::open_in_memory().unwrap();
    let report = storage.reseed(&parsed.records).unwrap().1;
    assert_eq!(report.inserted.publisher, 1);
    assert_eq!(counts(&storage), vec![1, 0, 0, 0, 0]);
}

#[test]
fn test_file_database_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let records = records_from(&dir, CATALOG);
    let db_path = dir.path().join("ledger.db");
    let db = db_path.to_str().unwrap();

    {
        let mut storage = Storage::open(db).unwrap();
        storage.reseed(&records).unwrap();
    }

    let storage = Storage::open(db).unwrap();
    assert_eq!(storage.purchases("Acme").unwrap().purchases().len(), 1);
}
