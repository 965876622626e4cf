//! Memoized index builds keyed by assignment-table content.
//!
//! ## Key Design Points
//!
//! - **Content-keyed**: entries are keyed by the SHA-256 of the assignment
//!   table, so a reload of identical data is a cache hit
//! - **Bounded**: at most `capacity` versions are kept (LRU eviction)
//! - **Shared read-only**: entries are handed out as `Arc`s and never mutated
//! - **Manual invalidation**: [`IndexCache::invalidate`] drops every entry

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use kbli_index::{CooccurrenceBuilder, CooccurrenceReport, MembershipIndex};
use kbli_storage::Table;
use kbli_types::AssignmentRow;
use lru::LruCache;
use serde::Serialize;
use tracing::{debug, info};

/// Everything derived from one version of the assignment table.
#[derive(Debug)]
pub struct IndexArtifacts {
    /// Content hash of the assignment table these were built from
    pub source_hash: String,
    pub index: MembershipIndex,
    pub cooccurrence: CooccurrenceReport,
}

impl IndexArtifacts {
    /// Build the index and its co-occurrence ranking.
    pub fn build(table: &Table<AssignmentRow>) -> Self {
        let index = MembershipIndex::build(table.rows());
        let mut builder = CooccurrenceBuilder::new();
        for entry in index.multi() {
            builder.add_entry(entry);
        }
        Self {
            source_hash: table.version().hash.clone(),
            cooccurrence: builder.build(),
            index,
        }
    }
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// LRU cache of built indexes.
pub struct IndexCache {
    entries: Mutex<LruCache<String, Arc<IndexArtifacts>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl IndexCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the artifacts for this table version, building them on a miss.
    pub fn get_or_build(&self, table: &Table<AssignmentRow>) -> Arc<IndexArtifacts> {
        let key = &table.version().hash;

        let cached = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.get(key).cloned()
        };
        if let Some(artifacts) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(version = table.version().short_hash(), "Index cache hit");
            return artifacts;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let artifacts = Arc::new(IndexArtifacts::build(table));
        info!(
            version = table.version().short_hash(),
            codes = artifacts.index.memberships().len(),
            multi = artifacts.index.multi().len(),
            "Built membership index"
        );

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.put(key.clone(), Arc::clone(&artifacts));
        artifacts
    }

    /// Drop every cached build.
    pub fn invalidate(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let dropped = entries.len();
        entries.clear();
        info!(dropped, "Invalidated index cache");
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("stats", &self.stats())
            .finish()
    }
}
