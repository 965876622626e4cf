//! # kbli-index
//!
//! Multi-cluster membership analysis for KBLI codes.
//!
//! The index is a pure function of the assignment rows: codes are cleaned,
//! grouped, and partitioned by how many distinct clusters they belong to.
//! Everything else here reads from a built index.
//!
//! ## Features
//! - Membership index with multi/single partitions
//! - Pairwise cluster co-occurrence ranking
//! - By-cluster listing and free-text search with description enrichment
//! - Reports over the unclassified-jobs and job-cluster tables
//!
//! ## Usage
//!
//! ```rust
//! use kbli_index::{analyze_cooccurrence, build_index};
//! use kbli_types::AssignmentRow;
//!
//! let rows = vec![
//!     AssignmentRow::new("A", "T1", "C1"),
//!     AssignmentRow::new("A", "T1", "C2"),
//!     AssignmentRow::new("B", "T2", "C1"),
//! ];
//! let index = build_index(&rows);
//! assert_eq!(index.multi().len(), 1);
//! assert_eq!(index.single().len(), 1);
//!
//! let pairs = analyze_cooccurrence(index.multi());
//! assert_eq!(pairs[0].count, 1);
//! ```

pub mod config;
pub mod cooccurrence;
pub mod error;
pub mod jobs;
pub mod lookup;
pub mod membership;
pub mod types;

pub use config::IndexConfig;
pub use cooccurrence::{analyze_cooccurrence, CooccurrenceBuilder, CooccurrenceReport};
pub use error::IndexError;
pub use jobs::{JobClusterReport, JobClusterSelection, UnclassifiedReport};
pub use lookup::{by_cluster, search, ReferenceIndex};
pub use membership::{build_index, CodeMembership, MembershipIndex};
pub use types::{
    ClusterListing, ClusterMember, ClusterPair, CooccurrencePair, IndexStats, MultiClusterEntry,
    SearchHit, SingleClusterEntry,
};
