//! Input row types, one per source table.
//!
//! Header names follow the source spreadsheet sheets; each field also
//! accepts a snake_case alias so hand-written CSV files stay readable.
//! Every column is optional at the type level: blank cells deserialize to
//! `None` and cleaning happens downstream.

use serde::{Deserialize, Serialize};

/// Trim a raw cell value, mapping blank values to `None`.
pub fn normalize(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One (code, title, cluster) assignment from the "KBLI berdasarkan Cluster" sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    #[serde(rename = "KODE_KBLI", alias = "code", default)]
    pub code: Option<String>,

    #[serde(rename = "JUDUL_KBLI", alias = "title", default)]
    pub title: Option<String>,

    #[serde(rename = "CLUSTER", alias = "cluster", default)]
    pub cluster: Option<String>,
}

impl AssignmentRow {
    /// Create a fully populated row.
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            title: Some(title.into()),
            cluster: Some(cluster.into()),
        }
    }

    /// Code with surrounding whitespace removed, `None` when null or blank.
    pub fn normalized_code(&self) -> Option<&str> {
        normalize(self.code.as_deref())
    }

    /// Cluster with surrounding whitespace removed, `None` when null or blank.
    pub fn normalized_cluster(&self) -> Option<&str> {
        normalize(self.cluster.as_deref())
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or("")
    }
}

/// One entry of the full KBLI reference sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
    #[serde(rename = "KODE KBLI", alias = "code", default)]
    pub code: Option<String>,

    #[serde(rename = "JUDUL KBLI", alias = "title", default)]
    pub title: Option<String>,

    #[serde(rename = "DESKRIPSI KBLI", alias = "description", default)]
    pub description: Option<String>,
}

impl ReferenceRow {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    pub fn normalized_code(&self) -> Option<&str> {
        normalize(self.code.as_deref())
    }
}

/// A job description from the classification result sheet.
///
/// `code` holds either a resolved KBLI code or the "not found" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnclassifiedJobRow {
    #[serde(rename = "List Pekerjaan UMKM", alias = "job", default)]
    pub job: Option<String>,

    #[serde(rename = "KODE KBLI", alias = "code", default)]
    pub code: Option<String>,

    #[serde(rename = "JUDUL KBLI", alias = "title", default)]
    pub title: Option<String>,

    #[serde(rename = "CLUSTER", alias = "cluster", default)]
    pub cluster: Option<String>,

    #[serde(rename = "DESKRIPSI KBLI", alias = "description", default)]
    pub description: Option<String>,
}

impl UnclassifiedJobRow {
    pub fn new(job: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            job: Some(job.into()),
            code: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A UMKM job description and the cluster it was filed under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobClusterRow {
    #[serde(rename = "List Pekerjaan UMKM", alias = "job", default)]
    pub job: Option<String>,

    #[serde(rename = "CLUSTER", alias = "cluster", default)]
    pub cluster: Option<String>,
}

impl JobClusterRow {
    pub fn new(job: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            job: Some(job.into()),
            cluster: Some(cluster.into()),
        }
    }
}
