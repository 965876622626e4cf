//! Graceful degradation E2E tests for the KBLI dashboard.
//!
//! A table that is missing or malformed disables only the views that read
//! it. Opening the dashboard never fails because of table contents.

use pretty_assertions::assert_eq;

use e2e_tests::{TestHarness, ASSIGNMENTS_CSV, JOBS_CSV, REFERENCE_CSV};
use kbli_service::{ExportView, ServiceError};
use kbli_types::TableKind;

fn unavailable_table(err: ServiceError) -> TableKind {
    match err {
        ServiceError::Unavailable { table, .. } => table,
        other => panic!("Expected Unavailable, got {other:?}"),
    }
}

/// Worst case: empty data directory. Every table-backed view is disabled,
/// the summary still renders.
#[test]
fn test_degradation_all_tables_missing() {
    let harness = TestHarness::new();
    let snapshot = harness.open().snapshot();

    assert_eq!(
        unavailable_table(snapshot.multi(false).unwrap_err()),
        TableKind::Assignments
    );
    assert_eq!(
        unavailable_table(snapshot.search("jagung").unwrap_err()),
        TableKind::Reference
    );
    assert_eq!(
        unavailable_table(snapshot.unclassified().unwrap_err()),
        TableKind::Unclassified
    );
    assert_eq!(
        unavailable_table(snapshot.jobs().unwrap_err()),
        TableKind::Jobs
    );

    let summary = snapshot.summary();
    assert_eq!(summary.assignment_rows, None);
    assert_eq!(summary.reference_rows, None);
    assert_eq!(summary.jobs, None);
    assert!(summary.index.is_none());
    assert_eq!(summary.tables.len(), 4);
    assert!(summary.tables.iter().all(|s| !s.available && s.error.is_some()));
}

/// Reference table missing: listings lose descriptions, search is disabled,
/// index views are unaffected.
#[test]
fn test_degradation_reference_missing() {
    let harness = TestHarness::new();
    harness.write_table(TableKind::Assignments, ASSIGNMENTS_CSV);
    let snapshot = harness.open().snapshot();

    let listing = snapshot.cluster_listing(Some("Pangan")).unwrap();
    assert_eq!(listing.len(), 3);
    assert!(listing.members.iter().all(|m| m.description.is_none()));

    assert!(snapshot.search("jagung").unwrap_err().is_unavailable());
    assert_eq!(snapshot.multi(false).unwrap().len(), 2);
    assert_eq!(snapshot.cooccurrence().unwrap().pairs().len(), 4);
}

/// Assignment table missing: search still works, hits say the cluster is
/// not available.
#[test]
fn test_degradation_assignments_missing() {
    let harness = TestHarness::new();
    harness.write_table(TableKind::Reference, REFERENCE_CSV);
    harness.write_table(TableKind::Jobs, JOBS_CSV);
    let snapshot = harness.open().snapshot();

    let hits = snapshot.search("pakaian").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].cluster, "not available");
    assert!(hits[0].clusters.is_empty());

    assert!(snapshot.cluster_listing(None).unwrap_err().is_unavailable());
    assert!(snapshot.clusters().unwrap_err().is_unavailable());
    assert_eq!(snapshot.jobs().unwrap().total_jobs(), 4);
}

/// A required column missing from the header disables that table only.
#[test]
fn test_degradation_malformed_header() {
    let harness = TestHarness::with_all_tables();
    harness.write_table(
        TableKind::Assignments,
        "KODE_KBLI,JUDUL_KBLI\n01111,Pertanian Jagung\n",
    );
    let snapshot = harness.open().snapshot();

    let status = &snapshot.status()[0];
    assert_eq!(status.table, TableKind::Assignments);
    assert!(!status.available);
    assert!(status
        .error
        .as_deref()
        .is_some_and(|e| e.contains("CLUSTER")));

    assert!(snapshot.single().unwrap_err().is_unavailable());
    assert!(snapshot.unclassified().is_ok());
    assert_eq!(snapshot.search("jagung").unwrap()[0].cluster, "not available");
}

/// Header-only tables are valid and produce empty, consistent views.
#[test]
fn test_degradation_empty_tables() {
    let harness = TestHarness::new();
    harness.write_table(TableKind::Assignments, "KODE_KBLI,JUDUL_KBLI,CLUSTER\n");
    harness.write_table(TableKind::Jobs, "List Pekerjaan UMKM,CLUSTER\n");
    let snapshot = harness.open().snapshot();

    assert!(snapshot.multi(false).unwrap().is_empty());
    assert!(snapshot.single().unwrap().is_empty());
    assert!(snapshot.cooccurrence().unwrap().is_empty());
    assert!(snapshot.clusters().unwrap().is_empty());

    let listing = snapshot.cluster_listing(None).unwrap();
    assert_eq!(listing.cluster, "");
    assert!(listing.is_empty());

    let jobs = snapshot.jobs().unwrap();
    assert_eq!(jobs.total_jobs(), 0);
    assert_eq!(jobs.classification_rate(), 0.0);
}

/// Exporting a disabled view reports the missing table instead of writing.
#[test]
fn test_degradation_export_unavailable() {
    let harness = TestHarness::new();
    harness.write_table(TableKind::Assignments, ASSIGNMENTS_CSV);
    let snapshot = harness.open().snapshot();

    let mut out = Vec::new();
    let err = ExportView::Resolved
        .export(&snapshot, None, &mut out)
        .unwrap_err();
    assert_eq!(unavailable_table(err), TableKind::Unclassified);
    assert!(out.is_empty());

    let err = ExportView::Search
        .export(&snapshot, None, &mut out)
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}
