//! Read-only queries over a built membership index.
//!
//! - [`by_cluster`]: every code assigned to one cluster
//! - [`search`]: case-insensitive substring search over the reference table
//!
//! Misses are never errors; they yield zero rows or placeholders.

use std::collections::HashMap;

use kbli_types::{normalize, ReferenceRow};
use tracing::debug;

use crate::membership::MembershipIndex;
use crate::types::{ClusterListing, ClusterMember, SearchHit};

/// Reference entries addressable by normalized code.
///
/// When a code appears more than once the first row wins.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex<'a> {
    rows: &'a [ReferenceRow],
    by_code: HashMap<&'a str, usize>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn new(rows: &'a [ReferenceRow]) -> Self {
        let mut by_code = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            if let Some(code) = row.normalized_code() {
                by_code.entry(code).or_insert(position);
            }
        }
        Self { rows, by_code }
    }

    pub fn get(&self, code: &str) -> Option<&'a ReferenceRow> {
        self.by_code.get(code.trim()).map(|&position| &self.rows[position])
    }

    /// Non-blank description of a code.
    pub fn description(&self, code: &str) -> Option<&'a str> {
        self.get(code)
            .and_then(|row| normalize(row.description.as_deref()))
    }

    pub fn rows(&self) -> &'a [ReferenceRow] {
        self.rows
    }
}

/// Every indexed code assigned to `cluster`, in code first-seen order.
///
/// Descriptions come from `reference` when it is available. An unknown
/// cluster yields an empty listing.
pub fn by_cluster(
    index: &MembershipIndex,
    reference: Option<&ReferenceIndex<'_>>,
    cluster: &str,
) -> ClusterListing {
    let cluster = cluster.trim();
    let members: Vec<ClusterMember> = index
        .memberships()
        .iter()
        .filter(|m| m.contains(cluster))
        .map(|m| ClusterMember {
            code: m.code.clone(),
            title: m.title.clone(),
            clusters: m.clusters.clone(),
            description: reference
                .and_then(|r| r.description(&m.code))
                .map(str::to_string),
        })
        .collect();

    debug!(cluster, members = members.len(), "Listed cluster");

    ClusterListing {
        cluster: cluster.to_string(),
        members,
    }
}

/// Reference entries whose code, title, or description contains `query`,
/// ignoring case. Blank queries match nothing.
///
/// Each hit carries its clusters from `index`, or `uncategorized_label`
/// when the code is not indexed.
pub fn search(
    reference: &ReferenceIndex<'_>,
    index: &MembershipIndex,
    query: &str,
    uncategorized_label: &str,
) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let matches = |value: Option<&str>| {
        value
            .map(|v| v.to_lowercase().contains(&needle))
            .unwrap_or(false)
    };

    let hits: Vec<SearchHit> = reference
        .rows()
        .iter()
        .filter(|row| {
            matches(row.code.as_deref())
                || matches(row.title.as_deref())
                || matches(row.description.as_deref())
        })
        .map(|row| {
            let code = normalize(row.code.as_deref()).unwrap_or_default().to_string();
            let clusters = index.clusters_of(&code).to_vec();
            let cluster = clusters
                .first()
                .cloned()
                .unwrap_or_else(|| uncategorized_label.to_string());
            SearchHit {
                title: normalize(row.title.as_deref()).unwrap_or_default().to_string(),
                description: normalize(row.description.as_deref()).map(str::to_string),
                code,
                clusters,
                cluster,
            }
        })
        .collect();

    debug!(query, hits = hits.len(), "Searched reference table");
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::build_index;
    use kbli_types::AssignmentRow;

    fn index() -> MembershipIndex {
        build_index(&[
            AssignmentRow::new("01111", "Pertanian Jagung", "Pangan"),
            AssignmentRow::new("10110", "Pemotongan Hewan", "Pangan"),
            AssignmentRow::new("10110", "Pemotongan Hewan", "Kuliner"),
            AssignmentRow::new("14111", "Pakaian Jadi", "Fashion"),
        ])
    }

    fn reference_rows() -> Vec<ReferenceRow> {
        vec![
            ReferenceRow::new("01111", "Pertanian Jagung", "Budidaya tanaman jagung"),
            ReferenceRow::new("10110", "Pemotongan Hewan", "Kegiatan rumah potong hewan"),
            ReferenceRow {
                code: Some("62010".to_string()),
                title: Some("Pemrograman Komputer".to_string()),
                description: None,
            },
        ]
    }

    #[test]
    fn test_by_cluster_includes_multi_and_single() {
        let index = index();
        let rows = reference_rows();
        let reference = ReferenceIndex::new(&rows);

        let listing = by_cluster(&index, Some(&reference), "Pangan");
        assert_eq!(listing.cluster, "Pangan");
        assert_eq!(listing.len(), 2);

        let corn = &listing.members[0];
        assert_eq!(corn.code, "01111");
        assert!(!corn.is_multi());
        assert_eq!(corn.description.as_deref(), Some("Budidaya tanaman jagung"));

        let slaughter = &listing.members[1];
        assert!(slaughter.is_multi());
        assert_eq!(slaughter.clusters, vec!["Pangan", "Kuliner"]);
    }

    #[test]
    fn test_by_cluster_missing_description() {
        let index = index();
        let listing = by_cluster(&index, None, "Fashion");
        assert_eq!(listing.len(), 1);
        assert!(listing.members[0].description.is_none());
    }

    #[test]
    fn test_by_cluster_unknown() {
        let listing = by_cluster(&index(), None, "Otomotif");
        assert!(listing.is_empty());
    }

    #[test]
    fn test_search_matches_code_title_description() {
        let index = index();
        let rows = reference_rows();
        let reference = ReferenceIndex::new(&rows);

        let by_code = search(&reference, &index, "0111", "uncategorized");
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].code, "01111");
        assert_eq!(by_code[0].cluster, "Pangan");

        let by_title = search(&reference, &index, "PEMOTONGAN", "uncategorized");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].clusters, vec!["Pangan", "Kuliner"]);

        let by_description = search(&reference, &index, "rumah potong", "uncategorized");
        assert_eq!(by_description[0].code, "10110");
    }

    #[test]
    fn test_search_uncategorized() {
        let index = index();
        let rows = reference_rows();
        let reference = ReferenceIndex::new(&rows);

        let hits = search(&reference, &index, "komputer", "uncategorized");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].clusters.is_empty());
        assert_eq!(hits[0].cluster, "uncategorized");
        assert!(hits[0].description.is_none());
    }

    #[test]
    fn test_search_empty_results() {
        let index = index();
        let rows = reference_rows();
        let reference = ReferenceIndex::new(&rows);

        assert!(search(&reference, &index, "tidak ada", "uncategorized").is_empty());
        assert!(search(&reference, &index, "   ", "uncategorized").is_empty());
    }

    #[test]
    fn test_reference_first_row_wins() {
        let rows = vec![
            ReferenceRow::new(" 01111", "Jagung", "Pertama"),
            ReferenceRow::new("01111", "Jagung", "Kedua"),
        ];
        let reference = ReferenceIndex::new(&rows);
        assert_eq!(reference.description("01111"), Some("Pertama"));
        assert_eq!(reference.description("99999"), None);
    }
}
