#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use super::*;
use crate::db::TransactionFilter;
use crate::import::{import_file, ColumnMapping, ImportMode};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed(db: &Database) {
    db.add_transaction(date(2024, 1, 20), 90000, "rent", Some("January, rent"))
        .unwrap();
    db.add_transaction(date(2024, 1, 5), 1234, "food", None).unwrap();
    db.add_transaction(date(2024, 1, 5), -500, "food", Some("refund \"late\""))
        .unwrap();
    db.add_transaction(date(2024, 2, 1), 777, "fun", None).unwrap();
}

fn tuples(db: &Database) -> Vec<(NaiveDate, i64, String, Option<String>)> {
    let mut rows: Vec<_> = db
        .get_transactions(&TransactionFilter {
            limit: usize::MAX,
            ..TransactionFilter::default()
        })
        .unwrap()
        .into_iter()
        .map(|t| (t.date, t.amount_cents, t.category, t.note))
        .collect();
    rows.sort();
    rows
}

#[test]
fn test_export_month_writes_header_and_rows_in_order() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("jan.csv");

    let count = export_month(&db, &Month::parse("2024-01").unwrap(), &out).unwrap();
    assert_eq!(count, 3);

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "date,amount,category,note");
    assert_eq!(lines[1], "2024-01-05,12.34,food,");
    assert_eq!(lines[2], "2024-01-05,-5.00,food,\"refund \"\"late\"\"\"");
    assert_eq!(lines[3], "2024-01-20,900.00,rent,\"January, rent\"");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_export_creates_missing_directories() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("deeper").join("feb.csv");

    let count = export_month(&db, &Month::parse("2024-02").unwrap(), &out).unwrap();
    assert_eq!(count, 1);
    assert!(out.exists());
}

#[test]
fn test_export_overwrites_existing_file() {
    let db = Database::open_in_memory().unwrap();
    seed(&db);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("month.csv");
    std::fs::write(&out, "stale content that is much longer than the export\n".repeat(50)).unwrap();

    export_month(&db, &Month::parse("2024-02").unwrap(), &out).unwrap();
    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content, "date,amount,category,note\n2024-02-01,7.77,fun,\n");
}

#[test]
fn test_export_empty_month_writes_header_only() {
    let db = Database::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.csv");

    let count = export_month(&db, &Month::parse("2031-07").unwrap(), &out).unwrap();
    assert_eq!(count, 0);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "date,amount,category,note\n");
}

#[test]
fn test_export_then_reimport_roundtrip() {
    let source = Database::open_in_memory().unwrap();
    seed(&source);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("jan.csv");
    let jan = Month::parse("2024-01").unwrap();
    export_month(&source, &jan, &out).unwrap();

    let mut target = Database::open_in_memory().unwrap();
    let mapping = ColumnMapping {
        description_column: "note".into(),
        category_column: Some("category".into()),
        ..ColumnMapping::default()
    };
    let outcome = import_file(&mut target, &out, &mapping, ImportMode::Commit).unwrap();
    assert_eq!(outcome.inserted, 3);

    let expected: Vec<_> = tuples(&source)
        .into_iter()
        .filter(|(d, ..)| Month::of(*d) == jan)
        .collect();
    assert_eq!(tuples(&target), expected);
}
