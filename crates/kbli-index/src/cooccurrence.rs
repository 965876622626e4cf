//! Pairwise cluster co-occurrence over multi-cluster codes.
//!
//! Every multi-cluster code with `k` clusters contributes one count to each
//! of its `C(k, 2)` unordered cluster pairs. Pairs are keyed canonically so
//! `(A, B)` and `(B, A)` accumulate together.
//!
//! ## Usage
//!
//! ```rust
//! use kbli_index::{build_index, CooccurrenceBuilder};
//! use kbli_types::AssignmentRow;
//!
//! let index = build_index(&[
//!     AssignmentRow::new("A", "T1", "Pangan"),
//!     AssignmentRow::new("A", "T1", "Kriya"),
//! ]);
//!
//! let mut builder = CooccurrenceBuilder::new();
//! for entry in index.multi() {
//!     builder.add_entry(entry);
//! }
//! let report = builder.build();
//! assert_eq!(report.total(), 1);
//! ```

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::types::{ClusterPair, CooccurrencePair, MultiClusterEntry};

/// Accumulates pair counts across multi-cluster entries.
#[derive(Debug, Default)]
pub struct CooccurrenceBuilder {
    counts: HashMap<ClusterPair, usize>,
    entries: usize,
}

impl CooccurrenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every unordered pair of this entry's clusters once.
    ///
    /// Repeated cluster names within the entry are ignored.
    pub fn add_entry(&mut self, entry: &MultiClusterEntry) {
        let clusters = &entry.clusters;
        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                if let Some(pair) = ClusterPair::new(&clusters[i], &clusters[j]) {
                    *self.counts.entry(pair).or_default() += 1;
                }
            }
        }
        self.entries += 1;
    }

    /// Rank pairs by count descending, ties by pair order.
    #[instrument(skip_all)]
    pub fn build(self) -> CooccurrenceReport {
        let mut pairs: Vec<CooccurrencePair> = self
            .counts
            .into_iter()
            .map(|(pair, count)| CooccurrencePair { pair, count })
            .collect();

        pairs.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.pair.cmp(&b.pair)));

        debug!(
            entries = self.entries,
            pairs = pairs.len(),
            "Ranked cluster co-occurrence"
        );

        CooccurrenceReport {
            pairs,
            entries: self.entries,
        }
    }
}

/// Ranked co-occurrence pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooccurrenceReport {
    pairs: Vec<CooccurrencePair>,
    entries: usize,
}

impl CooccurrenceReport {
    pub fn pairs(&self) -> &[CooccurrencePair] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<CooccurrencePair> {
        self.pairs
    }

    /// The `n` highest-ranked pairs.
    pub fn top(&self, n: usize) -> &[CooccurrencePair] {
        &self.pairs[..n.min(self.pairs.len())]
    }

    /// Sum of all pair counts.
    pub fn total(&self) -> usize {
        self.pairs.iter().map(|p| p.count).sum()
    }

    /// Number of multi-cluster entries that contributed.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Distinct partner clusters per cluster, sorted by degree descending
    /// then name.
    pub fn degrees(&self) -> Vec<(String, usize)> {
        let mut partners: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for p in &self.pairs {
            partners
                .entry(&p.pair.first)
                .or_default()
                .insert(&p.pair.second);
            partners
                .entry(&p.pair.second)
                .or_default()
                .insert(&p.pair.first);
        }

        let mut degrees: Vec<(String, usize)> = partners
            .into_iter()
            .map(|(cluster, set)| (cluster.to_string(), set.len()))
            .collect();
        degrees.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        degrees
    }
}

/// Rank cluster pairs over the multi-cluster partition.
pub fn analyze_cooccurrence(multi: &[MultiClusterEntry]) -> Vec<CooccurrencePair> {
    let mut builder = CooccurrenceBuilder::new();
    for entry in multi {
        builder.add_entry(entry);
    }
    builder.build().into_pairs()
}
