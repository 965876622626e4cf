//! Configuration loading for the KBLI dashboard.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/kbli-dashboard/config.toml`.

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::KbliError;
use crate::table::TableKind;

/// File names of the source tables, relative to `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSettings {
    /// "KBLI berdasarkan Cluster" sheet
    #[serde(default = "default_assignments_file")]
    pub assignments: String,

    /// "KBLI" reference sheet
    #[serde(default = "default_reference_file")]
    pub reference: String,

    /// "Hasil Klasifikasi" sheet
    #[serde(default = "default_unclassified_file")]
    pub unclassified: String,

    /// "Cluster Pekerjaan" sheet
    #[serde(default = "default_jobs_file")]
    pub jobs: String,
}

fn default_assignments_file() -> String {
    "kbli_cluster.csv".to_string()
}

fn default_reference_file() -> String {
    "kbli.csv".to_string()
}

fn default_unclassified_file() -> String {
    "hasil_klasifikasi.csv".to_string()
}

fn default_jobs_file() -> String {
    "cluster_pekerjaan.csv".to_string()
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            assignments: default_assignments_file(),
            reference: default_reference_file(),
            unclassified: default_unclassified_file(),
            jobs: default_jobs_file(),
        }
    }
}

impl TableSettings {
    pub fn file_name(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::Assignments => &self.assignments,
            TableKind::Reference => &self.reference,
            TableKind::Unclassified => &self.unclassified,
            TableKind::Jobs => &self.jobs,
        }
    }
}

/// Sentinel values found in the data and placeholders shown for misses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSettings {
    /// Code value marking a job that could not be resolved
    #[serde(default = "default_not_found_sentinel")]
    pub not_found_sentinel: String,

    /// Cluster value marking an unclassified UMKM job
    #[serde(default = "default_unclassified_cluster")]
    pub unclassified_cluster: String,

    /// Shown for a searched code with no cluster assignment
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized: String,

    /// Shown when a description lookup misses
    #[serde(default = "default_unavailable_placeholder")]
    pub unavailable: String,
}

fn default_not_found_sentinel() -> String {
    "Tidak Ditemukan".to_string()
}

fn default_unclassified_cluster() -> String {
    "Tidak Terklasifikasi".to_string()
}

fn default_uncategorized_label() -> String {
    "uncategorized".to_string()
}

fn default_unavailable_placeholder() -> String {
    "not available".to_string()
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            not_found_sentinel: default_not_found_sentinel(),
            unclassified_cluster: default_unclassified_cluster(),
            uncategorized: default_uncategorized_label(),
            unavailable: default_unavailable_placeholder(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the CSV exports of the source sheets
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Multi-cluster codes at or above this many clusters are flagged for review
    #[serde(default = "default_review_threshold")]
    pub review_threshold: usize,

    /// Number of built indexes kept per distinct assignment-table version
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub tables: TableSettings,

    #[serde(default)]
    pub labels: LabelSettings,
}

fn default_data_dir() -> String {
    ProjectDirs::from("", "", "kbli-dashboard")
        .map(|p| p.data_local_dir().join("data"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .to_string()
}

fn default_review_threshold() -> usize {
    3
}

fn default_cache_capacity() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tables: TableSettings::default(),
            labels: LabelSettings::default(),
            review_threshold: default_review_threshold(),
            cache_capacity: default_cache_capacity(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/kbli-dashboard/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (KBLI_*, nested keys joined with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, KbliError> {
        let config_dir = ProjectDirs::from("", "", "kbli-dashboard")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("data_dir", default_data_dir())
            .map_err(|e| KbliError::Config(e.to_string()))?
            .set_default("review_threshold", default_review_threshold() as i64)
            .map_err(|e| KbliError::Config(e.to_string()))?
            .set_default("cache_capacity", default_cache_capacity() as i64)
            .map_err(|e| KbliError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| KbliError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: KBLI_DATA_DIR, KBLI_REVIEW_THRESHOLD, KBLI_LABELS__NOT_FOUND_SENTINEL
        builder = builder.add_source(
            Environment::with_prefix("KBLI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| KbliError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| KbliError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), KbliError> {
        if self.review_threshold < 2 {
            return Err(KbliError::Config(format!(
                "review_threshold must be >= 2, got {}",
                self.review_threshold
            )));
        }
        if self.cache_capacity == 0 {
            return Err(KbliError::Config("cache_capacity must be > 0".to_string()));
        }
        Ok(())
    }

    /// Expand ~ in data_dir to the actual home directory
    pub fn expanded_data_dir(&self) -> PathBuf {
        if let Some(rest) = self.data_dir.strip_prefix("~/") {
            if let Some(dirs) = BaseDirs::new() {
                return dirs.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.data_dir)
    }

    /// Full path of a source table's CSV file.
    pub fn table_path(&self, kind: TableKind) -> PathBuf {
        self.expanded_data_dir().join(self.tables.file_name(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.review_threshold, 3);
        assert_eq!(settings.cache_capacity, 4);
        assert_eq!(settings.labels.not_found_sentinel, "Tidak Ditemukan");
        assert_eq!(settings.labels.unclassified_cluster, "Tidak Terklasifikasi");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
data_dir = "/srv/kbli"
review_threshold = 4

[tables]
assignments = "clusters.csv"

[labels]
uncategorized = "tanpa cluster"
"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.data_dir, "/srv/kbli");
        assert_eq!(settings.review_threshold, 4);
        assert_eq!(settings.tables.assignments, "clusters.csv");
        assert_eq!(settings.tables.reference, "kbli.csv");
        assert_eq!(settings.labels.uncategorized, "tanpa cluster");
        assert_eq!(settings.labels.not_found_sentinel, "Tidak Ditemukan");
    }

    #[test]
    fn test_load_missing_cli_file_fails() {
        let result = Settings::load(Some("/nonexistent/kbli/config.toml"));
        assert!(matches!(result, Err(KbliError::Config(_))));
    }

    #[test]
    fn test_validation() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.review_threshold = 1;
        assert!(settings.validate().is_err());

        settings.review_threshold = 3;
        settings.cache_capacity = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_table_path() {
        let settings = Settings {
            data_dir: "/data".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.table_path(TableKind::Jobs),
            PathBuf::from("/data/cluster_pekerjaan.csv")
        );
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let decoded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.review_threshold, settings.review_threshold);
        assert_eq!(decoded.tables.jobs, settings.tables.jobs);
    }
}
