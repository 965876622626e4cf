//! Derived view types.

use serde::{Deserialize, Serialize};

/// A code assigned to two or more distinct clusters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiClusterEntry {
    pub code: String,
    /// Title from the first contributing row
    pub title: String,
    /// Distinct clusters in first-seen order
    pub clusters: Vec<String>,
}

impl MultiClusterEntry {
    /// Number of distinct clusters, always >= 2.
    pub fn count(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_flagged(&self, review_threshold: usize) -> bool {
        self.count() >= review_threshold
    }
}

/// A code assigned to exactly one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleClusterEntry {
    pub code: String,
    pub title: String,
    pub cluster: String,
}

/// An unordered pair of distinct clusters, stored with `first < second`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterPair {
    pub first: String,
    pub second: String,
}

impl ClusterPair {
    /// Canonical pair; `None` when both names are equal.
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a.to_string(),
                second: b.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b.to_string(),
                second: a.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn contains(&self, cluster: &str) -> bool {
        self.first == cluster || self.second == cluster
    }
}

/// A cluster pair with the number of multi-cluster codes containing both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooccurrencePair {
    pub pair: ClusterPair,
    pub count: usize,
}

/// One code in a by-cluster listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMember {
    pub code: String,
    pub title: String,
    /// Every cluster of this code; a single element for single-cluster codes
    pub clusters: Vec<String>,
    /// Description from the reference table, when found
    pub description: Option<String>,
}

impl ClusterMember {
    pub fn is_multi(&self) -> bool {
        self.clusters.len() >= 2
    }
}

/// All codes assigned to one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterListing {
    pub cluster: String,
    pub members: Vec<ClusterMember>,
}

impl ClusterListing {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A reference-table entry matching a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    /// Clusters from the membership index, empty when uncategorized
    pub clusters: Vec<String>,
    /// First cluster, or the uncategorized label
    pub cluster: String,
}

/// Counts describing a built index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Input rows seen
    pub rows: usize,
    /// Rows discarded for a blank code or cluster
    pub dropped_rows: usize,
    /// Distinct normalized codes
    pub codes: usize,
    pub multi: usize,
    pub single: usize,
    /// Distinct clusters
    pub clusters: usize,
    /// Multi-cluster codes at or above the review threshold
    pub flagged: usize,
}
