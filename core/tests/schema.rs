use bankdash_core::error::CoreError;
use bankdash_core::stats::StatsSchema;
use bankdash_core::store::{ClientStore, ColumnKind};

// ── Test helpers ────────────────────────────────────────────────────────────

fn client_columns() -> Vec<(&'static str, ColumnKind)> {
    vec![
        ("ID", ColumnKind::Text),
        ("GPI_AGE", ColumnKind::Integer),
        ("DEM_SEG", ColumnKind::Integer),
        ("FIN_SEG", ColumnKind::Integer),
        ("TRANS_SEG", ColumnKind::Integer),
        ("PROD_SEG", ColumnKind::Integer),
        ("DIG_SEG", ColumnKind::Integer),
        ("REL_SEG", ColumnKind::Integer),
    ]
}

// ── Tests ───────────────────────────────────────────────────────────────────

/// With all three tables and the required client columns present,
/// startup verification passes.
#[test]
fn verify_passes_on_complete_schema() {
    let store = ClientStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.create_clients_table(&client_columns()).unwrap();

    store.verify_schema().unwrap();
}

/// A missing clients table is fatal at startup.
#[test]
fn missing_clients_table_is_fatal() {
    let store = ClientStore::in_memory().unwrap();
    store.migrate().unwrap();

    let err = store.verify_schema().unwrap_err();
    assert!(matches!(err, CoreError::TableMissing { table } if table == "clients"));
}

/// Missing catalog tables are just as fatal as a missing clients table.
#[test]
fn missing_catalog_tables_are_fatal() {
    let store = ClientStore::in_memory().unwrap();
    store.create_clients_table(&client_columns()).unwrap();

    let err = store.verify_schema().unwrap_err();
    assert!(matches!(err, CoreError::TableMissing { table } if table == "products"));
}

/// A clients table that lacks a segment column cannot serve the
/// resolver and fails verification by name.
#[test]
fn missing_segment_column_is_fatal() {
    let store = ClientStore::in_memory().unwrap();
    store.migrate().unwrap();
    let mut columns = client_columns();
    columns.retain(|(name, _)| *name != "REL_SEG");
    store.create_clients_table(&columns).unwrap();

    let err = store.verify_schema().unwrap_err();
    assert!(matches!(err, CoreError::ColumnMissing { column, .. } if column == "REL_SEG"));
}

/// Statistics discovery requires the clients table to exist, even though
/// every metric column is optional.
#[test]
fn stats_discovery_requires_clients_table() {
    let store = ClientStore::in_memory().unwrap();
    store.migrate().unwrap();

    let err = StatsSchema::discover(&store).unwrap_err();
    assert!(matches!(err, CoreError::TableMissing { table } if table == "clients"));
}
