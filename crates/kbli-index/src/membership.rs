//! Membership index: which clusters each KBLI code belongs to.
//!
//! ## Building
//!
//! 1. Rows with a blank code or cluster are dropped; both values are trimmed.
//! 2. Rows are grouped by code, keeping each distinct cluster once, in the
//!    order first seen. Repeating a (code, cluster) pair never inflates the
//!    count.
//! 3. Codes are partitioned into `multi` (two or more clusters) and `single`.
//!
//! Every indexed code lands in exactly one partition.

use std::collections::HashMap;

use kbli_types::AssignmentRow;
use tracing::{debug, instrument};

use crate::types::{IndexStats, MultiClusterEntry, SingleClusterEntry};

/// Clusters of one code, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMembership {
    pub code: String,
    pub title: String,
    pub clusters: Vec<String>,
}

impl CodeMembership {
    fn new(code: &str, title: &str) -> Self {
        Self {
            code: code.to_string(),
            title: title.to_string(),
            clusters: Vec::new(),
        }
    }

    /// Distinct cluster count.
    pub fn count(&self) -> usize {
        self.clusters.len()
    }

    pub fn contains(&self, cluster: &str) -> bool {
        self.clusters.iter().any(|c| c == cluster)
    }

    fn add(&mut self, title: &str, cluster: &str) {
        if self.title.is_empty() && !title.is_empty() {
            self.title = title.to_string();
        }
        if !self.contains(cluster) {
            self.clusters.push(cluster.to_string());
        }
    }
}

/// Code-to-clusters index with its multi/single partitions.
///
/// Immutable once built. Build it with [`build_index`] or
/// [`MembershipIndex::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    /// Codes in order of first appearance
    memberships: Vec<CodeMembership>,
    /// Code -> position in `memberships`
    positions: HashMap<String, usize>,
    /// Distinct clusters in order of first appearance
    clusters: Vec<String>,
    multi: Vec<MultiClusterEntry>,
    single: Vec<SingleClusterEntry>,
    rows: usize,
    dropped_rows: usize,
}

/// Build a membership index from raw assignment rows.
pub fn build_index(rows: &[AssignmentRow]) -> MembershipIndex {
    MembershipIndex::build(rows)
}

impl MembershipIndex {
    /// Build the index. Empty input yields an empty index.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn build(rows: &[AssignmentRow]) -> Self {
        let mut memberships: Vec<CodeMembership> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut clusters: Vec<String> = Vec::new();
        let mut dropped_rows = 0;

        for row in rows {
            let (Some(code), Some(cluster)) = (row.normalized_code(), row.normalized_cluster())
            else {
                dropped_rows += 1;
                continue;
            };

            let position = *positions.entry(code.to_string()).or_insert_with(|| {
                memberships.push(CodeMembership::new(code, row.title_or_empty()));
                memberships.len() - 1
            });
            memberships[position].add(row.title_or_empty(), cluster);

            if !clusters.iter().any(|c| c == cluster) {
                clusters.push(cluster.to_string());
            }
        }

        let (multi, single) = partition(&memberships);

        debug!(
            codes = memberships.len(),
            multi = multi.len(),
            single = single.len(),
            clusters = clusters.len(),
            dropped_rows,
            "Built membership index"
        );

        Self {
            memberships,
            positions,
            clusters,
            multi,
            single,
            rows: rows.len(),
            dropped_rows,
        }
    }

    /// Codes with two or more distinct clusters, in first-seen order.
    pub fn multi(&self) -> &[MultiClusterEntry] {
        &self.multi
    }

    /// Codes with exactly one cluster, in first-seen order.
    pub fn single(&self) -> &[SingleClusterEntry] {
        &self.single
    }

    /// Multi-cluster codes with at least `review_threshold` clusters.
    pub fn flagged(&self, review_threshold: usize) -> Vec<&MultiClusterEntry> {
        self.multi
            .iter()
            .filter(|entry| entry.is_flagged(review_threshold))
            .collect()
    }

    /// Distinct clusters in order of first appearance.
    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    /// Every indexed code, in order of first appearance.
    pub fn memberships(&self) -> &[CodeMembership] {
        &self.memberships
    }

    /// Membership of a code; surrounding whitespace in `code` is ignored.
    pub fn get(&self, code: &str) -> Option<&CodeMembership> {
        self.positions
            .get(code.trim())
            .map(|&position| &self.memberships[position])
    }

    /// Distinct clusters of a code, empty when the code is not indexed.
    pub fn clusters_of(&self, code: &str) -> &[String] {
        self.get(code).map(|m| m.clusters.as_slice()).unwrap_or(&[])
    }

    /// Distinct cluster count of a code, 0 when the code is not indexed.
    pub fn count(&self, code: &str) -> usize {
        self.clusters_of(code).len()
    }

    /// Number of codes in each cluster, in cluster first-seen order.
    pub fn cluster_sizes(&self) -> Vec<(String, usize)> {
        let mut sizes: HashMap<&str, usize> = HashMap::new();
        for membership in &self.memberships {
            for cluster in &membership.clusters {
                *sizes.entry(cluster.as_str()).or_default() += 1;
            }
        }
        self.clusters
            .iter()
            .map(|c| (c.clone(), sizes.get(c.as_str()).copied().unwrap_or(0)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }

    pub fn stats(&self, review_threshold: usize) -> IndexStats {
        IndexStats {
            rows: self.rows,
            dropped_rows: self.dropped_rows,
            codes: self.memberships.len(),
            multi: self.multi.len(),
            single: self.single.len(),
            clusters: self.clusters.len(),
            flagged: self.flagged(review_threshold).len(),
        }
    }
}

fn partition(memberships: &[CodeMembership]) -> (Vec<MultiClusterEntry>, Vec<SingleClusterEntry>) {
    let mut multi = Vec::new();
    let mut single = Vec::new();

    for membership in memberships {
        match membership.clusters.as_slice() {
            [cluster] => single.push(SingleClusterEntry {
                code: membership.code.clone(),
                title: membership.title.clone(),
                cluster: cluster.clone(),
            }),
            clusters => multi.push(MultiClusterEntry {
                code: membership.code.clone(),
                title: membership.title.clone(),
                clusters: clusters.to_vec(),
            }),
        }
    }

    (multi, single)
}
