//! CSV export of filtered views.
//!
//! Output is UTF-8 with a header row and one record per line. The header is
//! always written, so an empty view exports as a header-only file.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use kbli_index::{
    ClusterMember, CooccurrencePair, MultiClusterEntry, SearchHit, SingleClusterEntry,
};
use kbli_types::{JobClusterRow, UnclassifiedJobRow};
use serde::Serialize;
use tracing::debug;

use crate::error::ServiceError;
use crate::snapshot::Snapshot;

/// Separator used when a list of clusters shares one CSV field.
const LIST_SEPARATOR: &str = "; ";

/// A flat record with a fixed header row.
pub trait ExportRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

/// Write `records` as CSV, returning how many were written.
pub fn write_csv<W, R, I>(writer: W, records: I) -> Result<usize, ServiceError>
where
    W: Write,
    R: ExportRecord,
    I: IntoIterator<Item = R>,
{
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(R::HEADERS)?;

    let mut written = 0;
    for record in records {
        csv.serialize(record)?;
        written += 1;
    }
    csv.flush()?;
    Ok(written)
}

#[derive(Debug, Serialize)]
struct MemberRecord<'a> {
    code: &'a str,
    title: &'a str,
    clusters: String,
    description: &'a str,
}

impl ExportRecord for MemberRecord<'_> {
    const HEADERS: &'static [&'static str] = &["code", "title", "clusters", "description"];
}

impl<'a> MemberRecord<'a> {
    fn new(member: &'a ClusterMember, placeholder: &'a str) -> Self {
        Self {
            code: &member.code,
            title: &member.title,
            clusters: member.clusters.join(LIST_SEPARATOR),
            description: member.description.as_deref().unwrap_or(placeholder),
        }
    }
}

#[derive(Debug, Serialize)]
struct MultiRecord<'a> {
    code: &'a str,
    title: &'a str,
    clusters: String,
    count: usize,
}

impl ExportRecord for MultiRecord<'_> {
    const HEADERS: &'static [&'static str] = &["code", "title", "clusters", "count"];
}

impl<'a> From<&'a MultiClusterEntry> for MultiRecord<'a> {
    fn from(entry: &'a MultiClusterEntry) -> Self {
        Self {
            code: &entry.code,
            title: &entry.title,
            clusters: entry.clusters.join(LIST_SEPARATOR),
            count: entry.count(),
        }
    }
}

impl ExportRecord for &SingleClusterEntry {
    const HEADERS: &'static [&'static str] = &["code", "title", "cluster"];
}

#[derive(Debug, Serialize)]
struct PairRecord<'a> {
    cluster_a: &'a str,
    cluster_b: &'a str,
    count: usize,
}

impl ExportRecord for PairRecord<'_> {
    const HEADERS: &'static [&'static str] = &["cluster_a", "cluster_b", "count"];
}

impl<'a> From<&'a CooccurrencePair> for PairRecord<'a> {
    fn from(p: &'a CooccurrencePair) -> Self {
        Self {
            cluster_a: &p.pair.first,
            cluster_b: &p.pair.second,
            count: p.count,
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRecord<'a> {
    code: &'a str,
    title: &'a str,
    cluster: &'a str,
    clusters: String,
    description: &'a str,
}

impl ExportRecord for SearchRecord<'_> {
    const HEADERS: &'static [&'static str] =
        &["code", "title", "cluster", "clusters", "description"];
}

impl<'a> SearchRecord<'a> {
    fn new(hit: &'a SearchHit, placeholder: &'a str) -> Self {
        Self {
            code: &hit.code,
            title: &hit.title,
            cluster: &hit.cluster,
            clusters: hit.clusters.join(LIST_SEPARATOR),
            description: hit.description.as_deref().unwrap_or(placeholder),
        }
    }
}

#[derive(Debug, Serialize)]
struct JobRecord<'a> {
    job: &'a str,
    code: &'a str,
    title: &'a str,
    cluster: &'a str,
    description: &'a str,
}

impl ExportRecord for JobRecord<'_> {
    const HEADERS: &'static [&'static str] = &["job", "code", "title", "cluster", "description"];
}

impl<'a> From<&'a UnclassifiedJobRow> for JobRecord<'a> {
    fn from(row: &'a UnclassifiedJobRow) -> Self {
        Self {
            job: row.job.as_deref().unwrap_or_default(),
            code: row.code.as_deref().unwrap_or_default(),
            title: row.title.as_deref().unwrap_or_default(),
            cluster: row.cluster.as_deref().unwrap_or_default(),
            description: row.description.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct JobClusterRecord<'a> {
    job: &'a str,
    cluster: &'a str,
}

impl ExportRecord for JobClusterRecord<'_> {
    const HEADERS: &'static [&'static str] = &["job", "cluster"];
}

impl<'a> From<&'a JobClusterRow> for JobClusterRecord<'a> {
    fn from(row: &'a JobClusterRow) -> Self {
        Self {
            job: row.job.as_deref().unwrap_or_default(),
            cluster: row.cluster.as_deref().unwrap_or_default(),
        }
    }
}

/// Views that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportView {
    /// Codes of one cluster (argument: cluster, default first)
    Cluster,
    /// Multi-cluster codes
    Multi,
    /// Multi-cluster codes at or above the review threshold
    Flagged,
    /// Single-cluster codes
    Single,
    /// Ranked cluster pairs
    Cooccurrence,
    /// Search results (argument: query)
    Search,
    /// Jobs resolved to a code
    Resolved,
    /// Jobs marked with the "not found" sentinel
    NotFound,
    /// Jobs of one cluster (argument: cluster, default first)
    Jobs,
}

impl ExportView {
    pub const ALL: [ExportView; 9] = [
        ExportView::Cluster,
        ExportView::Multi,
        ExportView::Flagged,
        ExportView::Single,
        ExportView::Cooccurrence,
        ExportView::Search,
        ExportView::Resolved,
        ExportView::NotFound,
        ExportView::Jobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportView::Cluster => "cluster",
            ExportView::Multi => "multi",
            ExportView::Flagged => "flagged",
            ExportView::Single => "single",
            ExportView::Cooccurrence => "cooccurrence",
            ExportView::Search => "search",
            ExportView::Resolved => "resolved",
            ExportView::NotFound => "not-found",
            ExportView::Jobs => "jobs",
        }
    }

    /// Write this view of `snapshot` as CSV.
    ///
    /// `arg` selects the cluster or carries the search query.
    pub fn export<W: Write>(
        &self,
        snapshot: &Snapshot,
        arg: Option<&str>,
        writer: W,
    ) -> Result<usize, ServiceError> {
        let placeholder = snapshot.labels().unavailable.as_str();
        let written = match self {
            ExportView::Cluster => {
                let listing = snapshot.cluster_listing(arg)?;
                write_csv(
                    writer,
                    listing.members.iter().map(|m| MemberRecord::new(m, placeholder)),
                )?
            }
            ExportView::Multi | ExportView::Flagged => {
                let entries = snapshot.multi(*self == ExportView::Flagged)?;
                write_csv(writer, entries.iter().map(MultiRecord::from))?
            }
            ExportView::Single => write_csv(writer, snapshot.single()?.iter())?,
            ExportView::Cooccurrence => {
                let report = snapshot.cooccurrence()?;
                write_csv(writer, report.pairs().iter().map(PairRecord::from))?
            }
            ExportView::Search => {
                let query = arg.ok_or_else(|| {
                    ServiceError::InvalidInput("search export needs a query".to_string())
                })?;
                let hits = snapshot.search(query)?;
                write_csv(
                    writer,
                    hits.iter().map(|h| SearchRecord::new(h, placeholder)),
                )?
            }
            ExportView::Resolved => {
                let report = snapshot.unclassified()?;
                write_csv(writer, report.resolved.iter().map(|r| JobRecord::from(*r)))?
            }
            ExportView::NotFound => {
                let report = snapshot.unclassified()?;
                write_csv(writer, report.not_found.iter().map(|r| JobRecord::from(*r)))?
            }
            ExportView::Jobs => {
                let report = snapshot.jobs()?;
                let cluster = arg
                    .or_else(|| report.clusters().first().map(String::as_str))
                    .unwrap_or("");
                let selection = report.select(cluster);
                write_csv(
                    writer,
                    selection.jobs.iter().map(|r| JobClusterRecord::from(*r)),
                )?
            }
        };

        debug!(view = self.as_str(), records = written, "Exported view");
        Ok(written)
    }
}

impl fmt::Display for ExportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportView {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ExportView::ALL
            .into_iter()
            .find(|view| view.as_str() == s || view.as_str().replace('-', "_") == s)
            .ok_or_else(|| ServiceError::InvalidInput(format!("unknown view: {s}")))
    }
}
