//! Dashboard service: owns the current snapshot and handles reloads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use kbli_index::IndexConfig;
use kbli_storage::TableSet;
use kbli_types::Settings;
use tracing::{info, instrument, warn};

use crate::cache::{CacheStats, IndexCache};
use crate::error::ServiceError;
use crate::snapshot::Snapshot;

/// Serves dashboard views from a versioned, shared snapshot.
///
/// Readers take an `Arc<Snapshot>` and keep it for the whole request; a
/// reload swaps in a new snapshot without touching existing readers.
#[derive(Debug)]
pub struct DashboardService {
    settings: Settings,
    cache: IndexCache,
    current: RwLock<Arc<Snapshot>>,
    next_version: AtomicU64,
}

impl DashboardService {
    /// Load every table named in `settings` and build the first snapshot.
    ///
    /// Table load failures do not fail this call; they surface as
    /// unavailable views.
    pub fn open(settings: Settings) -> Result<Self, ServiceError> {
        let tables = TableSet::load(&settings);
        Self::with_tables(settings, tables)
    }

    /// Build a service over an already loaded table set.
    pub fn with_tables(settings: Settings, tables: TableSet) -> Result<Self, ServiceError> {
        settings.validate()?;
        IndexConfig::from_settings(&settings).validate()?;

        let cache = IndexCache::new(settings.cache_capacity);
        let snapshot = build_snapshot(&settings, &cache, 1, tables);

        Ok(Self {
            settings,
            cache,
            current: RwLock::new(Arc::new(snapshot)),
            next_version: AtomicU64::new(2),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Re-read every table from disk and publish a new snapshot.
    #[instrument(skip(self))]
    pub fn reload(&self) -> Arc<Snapshot> {
        let tables = TableSet::load(&self.settings);
        self.replace_tables(tables)
    }

    /// Publish a new snapshot over `tables`.
    pub fn replace_tables(&self, tables: TableSet) -> Arc<Snapshot> {
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let snapshot = Arc::new(build_snapshot(&self.settings, &self.cache, version, tables));

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::clone(&snapshot);
        info!(version, "Published snapshot");
        snapshot
    }

    /// Drop memoized indexes; the next reload rebuilds them.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn build_snapshot(settings: &Settings, cache: &IndexCache, version: u64, tables: TableSet) -> Snapshot {
    let artifacts = match tables.assignments.table() {
        Some(table) => Some(cache.get_or_build(table)),
        None => {
            warn!(version, "Assignment table unavailable; index views disabled");
            None
        }
    };
    Snapshot::new(version, tables, artifacts, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbli_storage::{Table, TableState};
    use kbli_types::{
        AssignmentRow, JobClusterRow, ReferenceRow, TableKind, UnclassifiedJobRow,
    };

    fn assignments() -> TableState<AssignmentRow> {
        Table::from_rows(vec![
            AssignmentRow::new("01111", "Pertanian Jagung", "Pangan"),
            AssignmentRow::new("10110", "Pemotongan Hewan", "Pangan"),
            AssignmentRow::new("10110", "Pemotongan Hewan", "Kuliner"),
            AssignmentRow::new("10110", "Pemotongan Hewan", "Peternakan"),
            AssignmentRow::new("14111", "Pakaian Jadi", "Fashion"),
        ])
        .unwrap()
        .into()
    }

    fn reference() -> TableState<ReferenceRow> {
        Table::from_rows(vec![
            ReferenceRow::new("01111", "Pertanian Jagung", "Budidaya jagung"),
            ReferenceRow::new("62010", "Pemrograman Komputer", "Perangkat lunak"),
        ])
        .unwrap()
        .into()
    }

    fn full_tables() -> TableSet {
        TableSet::from_states(
            assignments(),
            reference(),
            Table::from_rows(vec![
                UnclassifiedJobRow::new("Jual pulsa", "47413"),
                UnclassifiedJobRow::new("Jasa titip", "Tidak Ditemukan"),
            ])
            .unwrap()
            .into(),
            Table::from_rows(vec![JobClusterRow::new("Tukang jahit", "Fashion")])
                .unwrap()
                .into(),
        )
    }

    fn service(tables: TableSet) -> DashboardService {
        DashboardService::with_tables(Settings::default(), tables).unwrap()
    }

    #[test]
    fn test_all_views_available() {
        let service = service(full_tables());
        let snapshot = service.snapshot();

        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.multi(false).unwrap().len(), 1);
        assert_eq!(snapshot.multi(true).unwrap().len(), 1);
        assert_eq!(snapshot.single().unwrap().len(), 2);
        assert_eq!(snapshot.cooccurrence().unwrap().total(), 3);
        assert_eq!(snapshot.unclassified().unwrap().not_found.len(), 1);
        assert_eq!(snapshot.jobs().unwrap().total_jobs(), 1);

        let summary = snapshot.summary();
        assert_eq!(summary.assignment_rows, Some(5));
        assert_eq!(summary.reference_rows, Some(2));
        assert_eq!(summary.jobs, Some(1));
        assert_eq!(summary.index.unwrap().flagged, 1);
    }

    #[test]
    fn test_cluster_listing_defaults_to_first_cluster() {
        let snapshot = service(full_tables()).snapshot();
        let listing = snapshot.cluster_listing(None).unwrap();
        assert_eq!(listing.cluster, "Pangan");
        assert_eq!(listing.len(), 2);
        assert_eq!(
            listing.members[0].description.as_deref(),
            Some("Budidaya jagung")
        );
        assert!(listing.members[1].description.is_none());
    }

    #[test]
    fn test_search_with_and_without_index() {
        let snapshot = service(full_tables()).snapshot();
        let hits = snapshot.search("komputer").unwrap();
        assert_eq!(hits[0].cluster, "uncategorized");

        let degraded = service(TableSet::from_states(
            TableState::unavailable("missing file"),
            reference(),
            TableState::unavailable("missing file"),
            TableState::unavailable("missing file"),
        ))
        .snapshot();
        let hits = degraded.search("jagung").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].cluster, "not available");
    }

    #[test]
    fn test_missing_assignments_disables_index_views_only() {
        let snapshot = service(TableSet::from_states(
            TableState::unavailable("missing file"),
            reference(),
            TableState::unavailable("missing file"),
            Table::from_rows(vec![JobClusterRow::new("Tukang jahit", "Fashion")])
                .unwrap()
                .into(),
        ))
        .snapshot();

        let err = snapshot.multi(false).unwrap_err();
        match err {
            ServiceError::Unavailable { table, .. } => assert_eq!(table, TableKind::Assignments),
            other => panic!("Expected Unavailable, got {other:?}"),
        }
        assert!(snapshot.cooccurrence().unwrap_err().is_unavailable());
        assert!(snapshot.unclassified().unwrap_err().is_unavailable());
        assert!(snapshot.jobs().is_ok());
        assert!(snapshot.summary().index.is_none());
    }

    #[test]
    fn test_reload_versions_and_reuses_index() {
        let service = service(full_tables());
        let first = service.snapshot();

        let second = service.replace_tables(full_tables());
        assert_eq!(second.version(), 2);
        assert_eq!(service.snapshot().version(), 2);
        // Old readers keep their snapshot
        assert_eq!(first.version(), 1);

        assert!(Arc::ptr_eq(
            first.artifacts().unwrap(),
            second.artifacts().unwrap()
        ));
        assert_eq!(service.cache_stats().hits, 1);
        assert_eq!(service.cache_stats().misses, 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            review_threshold: 1,
            ..Default::default()
        };
        let err = DashboardService::with_tables(settings, full_tables()).unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }
}
