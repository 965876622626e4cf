//! The four source tables loaded together as one snapshot.
//!
//! Each table loads independently. A table that fails to load is kept as
//! [`TableState::Unavailable`] with the reason, and only the views that
//! depend on it go dark.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kbli_types::{
    AssignmentRow, JobClusterRow, ReferenceRow, Settings, TableKind, UnclassifiedJobRow,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::record::TableRecord;
use crate::table::Table;
use crate::version::TableVersion;

/// Load outcome of a single table.
#[derive(Debug, Clone)]
pub enum TableState<T> {
    Loaded(Arc<Table<T>>),
    Unavailable { reason: String },
}

impl<T: TableRecord> TableState<T> {
    /// Load a table from `path`, capturing any failure as `Unavailable`.
    pub fn load(path: PathBuf) -> Self {
        match Table::<T>::load(&path) {
            Ok(table) => TableState::Loaded(Arc::new(table)),
            Err(e) => {
                warn!(table = %T::KIND, path = %path.display(), error = %e, "Table unavailable");
                TableState::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        TableState::Unavailable {
            reason: reason.into(),
        }
    }
}

impl<T> TableState<T> {
    pub fn table(&self) -> Option<&Arc<Table<T>>> {
        match self {
            TableState::Loaded(table) => Some(table),
            TableState::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TableState::Loaded(_))
    }

    fn status(&self, kind: TableKind, path: Option<PathBuf>) -> TableStatus {
        match self {
            TableState::Loaded(table) => TableStatus {
                table: kind,
                path,
                available: true,
                version: Some(table.version().clone()),
                error: None,
            },
            TableState::Unavailable { reason } => TableStatus {
                table: kind,
                path,
                available: false,
                version: None,
                error: Some(reason.clone()),
            },
        }
    }
}

impl<T: TableRecord> From<Table<T>> for TableState<T> {
    fn from(table: Table<T>) -> Self {
        TableState::Loaded(Arc::new(table))
    }
}

/// Availability report for one table.
#[derive(Debug, Clone, Serialize)]
pub struct TableStatus {
    pub table: TableKind,
    pub path: Option<PathBuf>,
    pub available: bool,
    pub version: Option<TableVersion>,
    pub error: Option<String>,
}

/// All source tables as read at one point in time.
#[derive(Debug, Clone)]
pub struct TableSet {
    pub assignments: TableState<AssignmentRow>,
    pub reference: TableState<ReferenceRow>,
    pub unclassified: TableState<UnclassifiedJobRow>,
    pub jobs: TableState<JobClusterRow>,
    /// Where each table was read from; `None` for in-memory sets
    pub data_dir: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
}

impl TableSet {
    /// Load every table named in `settings`. Never fails as a whole.
    pub fn load(settings: &Settings) -> Self {
        let set = Self {
            assignments: TableState::load(settings.table_path(TableKind::Assignments)),
            reference: TableState::load(settings.table_path(TableKind::Reference)),
            unclassified: TableState::load(settings.table_path(TableKind::Unclassified)),
            jobs: TableState::load(settings.table_path(TableKind::Jobs)),
            data_dir: Some(settings.expanded_data_dir()),
            loaded_at: Utc::now(),
        };

        let available = set.status(settings).iter().filter(|s| s.available).count();
        info!(
            data_dir = %settings.expanded_data_dir().display(),
            available,
            total = TableKind::ALL.len(),
            "Loaded table set"
        );
        set
    }

    /// Build a set from in-memory tables.
    pub fn from_states(
        assignments: TableState<AssignmentRow>,
        reference: TableState<ReferenceRow>,
        unclassified: TableState<UnclassifiedJobRow>,
        jobs: TableState<JobClusterRow>,
    ) -> Self {
        Self {
            assignments,
            reference,
            unclassified,
            jobs,
            data_dir: None,
            loaded_at: Utc::now(),
        }
    }

    /// Availability of each table, in [`TableKind::ALL`] order.
    pub fn status(&self, settings: &Settings) -> Vec<TableStatus> {
        let path = |kind| self.data_dir.as_ref().map(|_| settings.table_path(kind));
        vec![
            self.assignments
                .status(TableKind::Assignments, path(TableKind::Assignments)),
            self.reference
                .status(TableKind::Reference, path(TableKind::Reference)),
            self.unclassified
                .status(TableKind::Unclassified, path(TableKind::Unclassified)),
            self.jobs.status(TableKind::Jobs, path(TableKind::Jobs)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings_for(dir: &std::path::Path) -> Settings {
        Settings {
            data_dir: dir.to_string_lossy().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_partial_set() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(
            temp.path().join("kbli_cluster.csv"),
            "KODE_KBLI,JUDUL_KBLI,CLUSTER\n01111,Jagung,Pangan\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("cluster_pekerjaan.csv"),
            "List Pekerjaan UMKM\nTukang jahit\n",
        )
        .unwrap();

        let settings = settings_for(temp.path());
        let set = TableSet::load(&settings);

        assert!(set.assignments.is_available());
        assert!(!set.reference.is_available());
        assert!(!set.unclassified.is_available());
        // Jobs file exists but lacks the CLUSTER column
        assert!(!set.jobs.is_available());

        let status = set.status(&settings);
        assert_eq!(status.len(), 4);
        assert_eq!(status[0].table, TableKind::Assignments);
        assert_eq!(status[0].version.as_ref().map(|v| v.rows), Some(1));
        assert!(status[3]
            .error
            .as_deref()
            .unwrap()
            .contains("missing column CLUSTER"));
    }

    #[test]
    fn test_from_states() {
        let assignments = Table::from_rows(vec![AssignmentRow::new("A", "T1", "C1")]).unwrap();
        let set = TableSet::from_states(
            assignments.into(),
            TableState::unavailable("not provided"),
            TableState::unavailable("not provided"),
            TableState::unavailable("not provided"),
        );
        assert!(set.assignments.is_available());
        let status = set.status(&Settings::default());
        assert!(status.iter().all(|s| s.path.is_none()));
        assert_eq!(status.iter().filter(|s| s.available).count(), 1);
    }
}
