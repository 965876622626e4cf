//! One immutable, versioned view of the source tables and their analysis.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kbli_index::{
    by_cluster, search, ClusterListing, CooccurrenceReport, IndexConfig, IndexStats,
    JobClusterReport, MembershipIndex, MultiClusterEntry, ReferenceIndex, SearchHit,
    SingleClusterEntry, UnclassifiedReport,
};
use kbli_storage::{Table, TableSet, TableState, TableStatus};
use kbli_types::{LabelSettings, Settings, TableKind};
use serde::Serialize;

use crate::cache::IndexArtifacts;
use crate::error::ServiceError;

/// Header metrics and availability for the whole dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    /// Rows in the assignment table
    pub assignment_rows: Option<usize>,
    /// Rows in the reference table
    pub reference_rows: Option<usize>,
    /// Rows in the job-cluster table
    pub jobs: Option<usize>,
    pub index: Option<IndexStats>,
    pub tables: Vec<TableStatus>,
}

/// Tables plus derived analysis, frozen at one version.
#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    tables: TableSet,
    artifacts: Option<Arc<IndexArtifacts>>,
    config: IndexConfig,
    labels: LabelSettings,
    table_status: Vec<TableStatus>,
}

fn require<T>(state: &TableState<T>, table: TableKind) -> Result<&Arc<Table<T>>, ServiceError> {
    match state {
        TableState::Loaded(t) => Ok(t),
        TableState::Unavailable { reason } => Err(ServiceError::Unavailable {
            table,
            reason: reason.clone(),
        }),
    }
}

impl Snapshot {
    pub(crate) fn new(
        version: u64,
        tables: TableSet,
        artifacts: Option<Arc<IndexArtifacts>>,
        settings: &Settings,
    ) -> Self {
        Self {
            version,
            table_status: tables.status(settings),
            tables,
            artifacts,
            config: IndexConfig::from_settings(settings),
            labels: settings.labels.clone(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.tables.loaded_at
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn status(&self) -> &[TableStatus] {
        &self.table_status
    }

    pub fn labels(&self) -> &LabelSettings {
        &self.labels
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Derived analysis, shared with the index cache.
    pub fn artifacts(&self) -> Result<&Arc<IndexArtifacts>, ServiceError> {
        match (&self.artifacts, &self.tables.assignments) {
            (Some(artifacts), _) => Ok(artifacts),
            (None, TableState::Unavailable { reason }) => Err(ServiceError::Unavailable {
                table: TableKind::Assignments,
                reason: reason.clone(),
            }),
            (None, TableState::Loaded(_)) => Err(ServiceError::Unavailable {
                table: TableKind::Assignments,
                reason: "index not built".to_string(),
            }),
        }
    }

    pub fn index(&self) -> Result<&MembershipIndex, ServiceError> {
        Ok(&self.artifacts()?.index)
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            version: self.version,
            loaded_at: self.loaded_at(),
            assignment_rows: self.tables.assignments.table().map(|t| t.len()),
            reference_rows: self.tables.reference.table().map(|t| t.len()),
            jobs: self.tables.jobs.table().map(|t| t.len()),
            index: self
                .index()
                .ok()
                .map(|index| index.stats(self.config.review_threshold)),
            tables: self.table_status.clone(),
        }
    }

    /// Distinct clusters with their code counts, in first-seen order.
    pub fn clusters(&self) -> Result<Vec<(String, usize)>, ServiceError> {
        Ok(self.index()?.cluster_sizes())
    }

    /// Codes of one cluster, defaulting to the first cluster.
    ///
    /// Descriptions are attached when the reference table is available.
    pub fn cluster_listing(&self, cluster: Option<&str>) -> Result<ClusterListing, ServiceError> {
        let index = self.index()?;
        let cluster = match cluster {
            Some(name) => name,
            None => index.clusters().first().map(String::as_str).unwrap_or(""),
        };

        let reference = self
            .tables
            .reference
            .table()
            .map(|t| ReferenceIndex::new(t.rows()));
        Ok(by_cluster(index, reference.as_ref(), cluster))
    }

    /// Multi-cluster codes, optionally only those at or above the review threshold.
    pub fn multi(&self, flagged_only: bool) -> Result<Vec<MultiClusterEntry>, ServiceError> {
        let index = self.index()?;
        let entries = if flagged_only {
            index
                .flagged(self.config.review_threshold)
                .into_iter()
                .cloned()
                .collect()
        } else {
            index.multi().to_vec()
        };
        Ok(entries)
    }

    pub fn single(&self) -> Result<&[SingleClusterEntry], ServiceError> {
        Ok(self.index()?.single())
    }

    pub fn cooccurrence(&self) -> Result<&CooccurrenceReport, ServiceError> {
        Ok(&self.artifacts()?.cooccurrence)
    }

    /// Free-text search over the reference table.
    ///
    /// Needs the reference table. Without the assignment table, hits carry
    /// the "not available" placeholder instead of a cluster.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>, ServiceError> {
        let reference = require(&self.tables.reference, TableKind::Reference)?;
        let reference = ReferenceIndex::new(reference.rows());

        match self.index() {
            Ok(index) => Ok(search(
                &reference,
                index,
                query,
                &self.config.uncategorized_label,
            )),
            Err(_) => Ok(search(
                &reference,
                &MembershipIndex::default(),
                query,
                &self.labels.unavailable,
            )),
        }
    }

    pub fn unclassified(&self) -> Result<UnclassifiedReport<'_>, ServiceError> {
        let table = require(&self.tables.unclassified, TableKind::Unclassified)?;
        Ok(UnclassifiedReport::build(
            table.rows(),
            &self.config.not_found_sentinel,
        ))
    }

    pub fn jobs(&self) -> Result<JobClusterReport<'_>, ServiceError> {
        let table = require(&self.tables.jobs, TableKind::Jobs)?;
        Ok(JobClusterReport::build(
            table.rows(),
            &self.config.unclassified_cluster,
        ))
    }
}
