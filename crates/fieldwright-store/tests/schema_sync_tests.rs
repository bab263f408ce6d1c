//! Schema synchronization tests
//!
//! Verifies that every registered field ends up owning exactly one column in
//! the wide value table.

use fieldwright_domain::traits::{FieldRegistry, SchemaSynchronizer};
use fieldwright_domain::{ColumnOutcome, DataType, PhysicalType};
use fieldwright_store::{SqliteStore, StoreError};
use std::thread;
use tempfile::TempDir;

fn store_with(fields: &[(&str, DataType)]) -> SqliteStore {
    let mut store = SqliteStore::new(":memory:").unwrap();
    for (name, data_type) in fields {
        store.register(name, *data_type, "").unwrap();
    }
    store
}

#[test]
fn test_ensure_column_creates_once() {
    let mut store = store_with(&[("amount_due", DataType::Currency)]);

    assert_eq!(
        store.ensure_column("amount_due", DataType::Currency).unwrap(),
        ColumnOutcome::Created
    );
    assert_eq!(
        store.ensure_column("amount_due", DataType::Currency).unwrap(),
        ColumnOutcome::AlreadyPresent
    );

    let wide = store.wide_table_columns().unwrap();
    assert_eq!(wide.iter().filter(|c| c.as_str() == "amount_due").count(), 1);

    let columns = store.columns().unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].physical_type, PhysicalType::Decimal { precision: 15, scale: 2 });
}

#[test]
fn test_column_types_follow_data_type() {
    let mut store = store_with(&[
        ("filing_date", DataType::Date),
        ("email_address", DataType::Email),
        ("is_minor", DataType::Boolean),
    ]);
    store.ensure_column("filing_date", DataType::Date).unwrap();
    store.ensure_column("email_address", DataType::Email).unwrap();
    store.ensure_column("is_minor", DataType::Boolean).unwrap();

    let types: Vec<String> = store
        .columns()
        .unwrap()
        .iter()
        .map(|c| c.physical_type.sql_type())
        .collect();
    assert_eq!(types, vec!["DATE", "VARCHAR(255)", "BOOLEAN"]);
}

#[test]
fn test_physical_name_collision() {
    let mut store = store_with(&[("zip-code", DataType::Text), ("zip code", DataType::Text)]);

    store.ensure_column("zip-code", DataType::Text).unwrap();
    let err = store.ensure_column("zip code", DataType::Text).unwrap_err();
    match err {
        StoreError::PhysicalNameCollision { canonical_name, physical_name, owner } => {
            assert_eq!(canonical_name, "zip code");
            assert_eq!(physical_name, "zip_code");
            assert_eq!(owner, "zip-code");
        }
        other => panic!("expected collision, got {other:?}"),
    }

    // The existing owner is unaffected
    assert_eq!(
        store.ensure_column("zip-code", DataType::Text).unwrap(),
        ColumnOutcome::AlreadyPresent
    );
}

#[test]
fn test_reserved_column_collision() {
    let mut store = store_with(&[("form_id", DataType::Text)]);
    let result = store.ensure_column("form_id", DataType::Text);
    assert!(matches!(result, Err(StoreError::PhysicalNameCollision { .. })));
}

#[test]
fn test_column_requires_registered_field() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    assert!(store.ensure_column("unregistered", DataType::Text).is_err());
    // The ALTER rolled back with the bookkeeping insert
    assert!(!store.wide_table_columns().unwrap().contains(&"unregistered".to_string()));
}

#[test]
fn test_concurrent_ensure_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registry.db");
    {
        let mut store = SqliteStore::new(&path).unwrap();
        store.register("case_number", DataType::Integer, "").unwrap();
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let mut store = SqliteStore::new(&path).unwrap();
                store.ensure_column("case_number", DataType::Integer).unwrap()
            })
        })
        .collect();

    let outcomes: Vec<ColumnOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outcomes.iter().filter(|o| **o == ColumnOutcome::Created).count(), 1);

    let store = SqliteStore::new(&path).unwrap();
    let wide = store.wide_table_columns().unwrap();
    assert_eq!(wide.iter().filter(|c| c.as_str() == "case_number").count(), 1);
    assert_eq!(store.columns().unwrap().len(), 1);
}
