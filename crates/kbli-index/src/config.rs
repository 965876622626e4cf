//! Index configuration.

use kbli_types::Settings;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Thresholds and labels used when deriving views from the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Multi-cluster codes with at least this many clusters are flagged
    #[serde(default = "default_review_threshold")]
    pub review_threshold: usize,

    /// Cluster shown for a searched code absent from the index
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized_label: String,

    /// Code value marking an unresolved job
    #[serde(default = "default_not_found_sentinel")]
    pub not_found_sentinel: String,

    /// Cluster value marking an unclassified UMKM job
    #[serde(default = "default_unclassified_cluster")]
    pub unclassified_cluster: String,
}

fn default_review_threshold() -> usize {
    3
}
fn default_uncategorized_label() -> String {
    "uncategorized".to_string()
}
fn default_not_found_sentinel() -> String {
    "Tidak Ditemukan".to_string()
}
fn default_unclassified_cluster() -> String {
    "Tidak Terklasifikasi".to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            review_threshold: default_review_threshold(),
            uncategorized_label: default_uncategorized_label(),
            not_found_sentinel: default_not_found_sentinel(),
            unclassified_cluster: default_unclassified_cluster(),
        }
    }
}

impl IndexConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            review_threshold: settings.review_threshold,
            uncategorized_label: settings.labels.uncategorized.clone(),
            not_found_sentinel: settings.labels.not_found_sentinel.clone(),
            unclassified_cluster: settings.labels.unclassified_cluster.clone(),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.review_threshold < 2 {
            return Err(IndexError::InvalidConfig(format!(
                "review_threshold must be >= 2, got {}",
                self.review_threshold
            )));
        }
        if self.not_found_sentinel.trim().is_empty() {
            return Err(IndexError::InvalidConfig(
                "not_found_sentinel must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
