use bankdash_core::error::CoreError;
use bankdash_core::segments;
use bankdash_core::store::{ClientStore, ColumnKind};
use bankdash_core::types::SegmentDimension;
use serde_json::json;

// ── Test helpers ────────────────────────────────────────────────────────────

fn seeded_store() -> ClientStore {
    let store = ClientStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
        .create_clients_table(&[
            ("ID", ColumnKind::Text),
            ("GPI_AGE", ColumnKind::Integer),
            ("DEM_SEG", ColumnKind::Integer),
            ("FIN_SEG", ColumnKind::Integer),
            ("TRANS_SEG", ColumnKind::Integer),
            ("PROD_SEG", ColumnKind::Integer),
            ("DIG_SEG", ColumnKind::Integer),
            ("REL_SEG", ColumnKind::Integer),
        ])
        .unwrap();
    store
}

fn insert_client(store: &ClientStore, id: &str, age: Option<i64>, segs: [Option<i64>; 6]) {
    let record = json!({
        "ID": id,
        "GPI_AGE": age,
        "DEM_SEG": segs[0],
        "FIN_SEG": segs[1],
        "TRANS_SEG": segs[2],
        "PROD_SEG": segs[3],
        "DIG_SEG": segs[4],
        "REL_SEG": segs[5],
    });
    store.insert_client(record.as_object().unwrap()).unwrap();
}

// ── Tests ───────────────────────────────────────────────────────────────────

/// Age and all six cluster values come back from a single resolve call.
#[test]
fn resolve_returns_full_profile() {
    let store = seeded_store();
    insert_client(
        &store,
        "C001",
        Some(34),
        [Some(3), Some(1), Some(0), Some(2), Some(4), Some(5)],
    );

    let profile = segments::resolve(&store, "C001").unwrap();
    assert_eq!(profile.client_id, "C001");
    assert_eq!(profile.age, Some(34));
    assert_eq!(profile.cluster(SegmentDimension::Demographic), Some(3));
    assert_eq!(profile.cluster(SegmentDimension::Financial), Some(1));
    assert_eq!(profile.cluster(SegmentDimension::Transactional), Some(0));
    assert_eq!(profile.cluster(SegmentDimension::Product), Some(2));
    assert_eq!(profile.cluster(SegmentDimension::Digital), Some(4));
    assert_eq!(profile.cluster(SegmentDimension::Relationship), Some(5));
}

/// A NULL segment column resolves to an unset dimension, not an error.
#[test]
fn null_segments_resolve_as_unset() {
    let store = seeded_store();
    insert_client(&store, "C002", Some(40), [Some(2), None, None, None, None, Some(1)]);

    let profile = segments::resolve(&store, "C002").unwrap();
    assert_eq!(profile.cluster(SegmentDimension::Demographic), Some(2));
    assert_eq!(profile.cluster(SegmentDimension::Financial), None);
    assert_eq!(profile.cluster(SegmentDimension::Digital), None);
    assert_eq!(profile.cluster(SegmentDimension::Relationship), Some(1));
}

/// A NULL age resolves to None rather than a default.
#[test]
fn missing_age_resolves_as_none() {
    let store = seeded_store();
    insert_client(&store, "C003", None, [Some(0), None, None, None, None, None]);

    let profile = segments::resolve(&store, "C003").unwrap();
    assert_eq!(profile.age, None);
}

/// An unknown id fails with not-found.
#[test]
fn unknown_client_is_not_found() {
    let store = seeded_store();
    let err = segments::resolve(&store, "nonexistent-id").unwrap_err();
    assert!(matches!(err, CoreError::ClientNotFound { .. }));
}

/// An empty id is rejected before the store is consulted.
#[test]
fn empty_id_is_rejected() {
    let store = seeded_store();
    let err = segments::resolve(&store, "").unwrap_err();
    assert!(matches!(err, CoreError::EmptyClientId));
}
