//! Reports over the job tables.
//!
//! These tables are reported on their own and never feed the membership
//! index.

use kbli_types::{normalize, JobClusterRow, UnclassifiedJobRow};
use serde::Serialize;

/// Classification results split into resolved and unresolved jobs.
///
/// A job is unresolved when its code equals the "not found" sentinel
/// exactly; every other row counts as resolved.
#[derive(Debug, Clone, Serialize)]
pub struct UnclassifiedReport<'a> {
    pub resolved: Vec<&'a UnclassifiedJobRow>,
    pub not_found: Vec<&'a UnclassifiedJobRow>,
}

impl<'a> UnclassifiedReport<'a> {
    pub fn build(rows: &'a [UnclassifiedJobRow], not_found_sentinel: &str) -> Self {
        let (not_found, resolved): (Vec<_>, Vec<_>) = rows
            .iter()
            .partition(|row| row.code.as_deref() == Some(not_found_sentinel));
        Self {
            resolved,
            not_found,
        }
    }

    pub fn total(&self) -> usize {
        self.resolved.len() + self.not_found.len()
    }

    /// Percentage of resolved jobs; 0 when there are no jobs.
    pub fn success_rate(&self) -> f64 {
        percentage(self.resolved.len(), self.total())
    }
}

/// Jobs of one cluster within the job-cluster table.
#[derive(Debug, Clone, Serialize)]
pub struct JobClusterSelection<'a> {
    pub cluster: String,
    pub jobs: Vec<&'a JobClusterRow>,
    /// Share of all jobs, in percent
    pub share: f64,
}

impl JobClusterSelection<'_> {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Overview of the UMKM job-cluster table.
#[derive(Debug, Clone)]
pub struct JobClusterReport<'a> {
    rows: &'a [JobClusterRow],
    clusters: Vec<String>,
    unclassified_cluster: String,
}

impl<'a> JobClusterReport<'a> {
    pub fn build(rows: &'a [JobClusterRow], unclassified_cluster: &str) -> Self {
        let mut clusters: Vec<String> = Vec::new();
        for cluster in rows.iter().filter_map(|r| normalize(r.cluster.as_deref())) {
            if !clusters.iter().any(|c| c == cluster) {
                clusters.push(cluster.to_string());
            }
        }
        Self {
            rows,
            clusters,
            unclassified_cluster: unclassified_cluster.to_string(),
        }
    }

    /// Distinct clusters in first-seen order.
    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    pub fn total_jobs(&self) -> usize {
        self.rows.len()
    }

    /// Jobs filed under the unclassified cluster.
    pub fn unclassified(&self) -> usize {
        self.select(&self.unclassified_cluster).len()
    }

    /// Percentage of jobs outside the unclassified cluster; 0 when empty.
    pub fn classification_rate(&self) -> f64 {
        let total = self.total_jobs();
        percentage(total - self.unclassified(), total)
    }

    /// Jobs of `cluster`, in table order.
    pub fn select(&self, cluster: &str) -> JobClusterSelection<'a> {
        let cluster = cluster.trim();
        let jobs: Vec<&'a JobClusterRow> = self
            .rows
            .iter()
            .filter(|r| normalize(r.cluster.as_deref()) == Some(cluster))
            .collect();
        JobClusterSelection {
            cluster: cluster.to_string(),
            share: percentage(jobs.len(), self.total_jobs()),
            jobs,
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
