//! CLI argument parsing for the dashboard.
//!
//! CLI flags override all other config sources.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// KBLI Cluster Dashboard
///
/// Read-only analysis of KBLI code cluster assignments.
#[derive(Parser, Debug)]
#[command(name = "kbli-dashboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/kbli-dashboard/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override the directory holding the source CSV files
    #[arg(short, long, global = true)]
    pub data_dir: Option<String>,

    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Dashboard commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show header metrics, table availability and index statistics
    Summary,

    /// List clusters with their code counts
    Clusters,

    /// List the codes of one cluster
    Cluster {
        /// Cluster name (default: first cluster)
        name: Option<String>,
    },

    /// List codes assigned to two or more clusters
    Multi {
        /// Only codes at or above the review threshold
        #[arg(short, long)]
        flagged: bool,
    },

    /// List codes assigned to exactly one cluster
    Single,

    /// Rank cluster pairs by how many codes share them
    Cooccurrence {
        /// Show only the N highest-ranked pairs
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Search codes, titles and descriptions
    Search {
        /// Case-insensitive search term
        query: String,
    },

    /// Show resolved and unresolved job classifications
    Unclassified,

    /// Show UMKM jobs by cluster
    Jobs {
        /// Cluster name (default: first cluster)
        cluster: Option<String>,
    },

    /// Export a view as CSV
    Export {
        /// View: cluster, multi, flagged, single, cooccurrence, search,
        /// resolved, not-found, jobs
        view: String,

        /// Cluster name or search query, depending on the view
        arg: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_summary() {
        let cli = Cli::parse_from(["kbli-dashboard", "summary"]);
        assert!(matches!(cli.command, Commands::Summary));
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_cluster_default() {
        let cli = Cli::parse_from(["kbli-dashboard", "cluster"]);
        match cli.command {
            Commands::Cluster { name } => assert!(name.is_none()),
            _ => panic!("Expected Cluster command"),
        }
    }

    #[test]
    fn test_cli_cluster_named() {
        let cli = Cli::parse_from(["kbli-dashboard", "cluster", "Pangan"]);
        match cli.command {
            Commands::Cluster { name } => assert_eq!(name.as_deref(), Some("Pangan")),
            _ => panic!("Expected Cluster command"),
        }
    }

    #[test]
    fn test_cli_multi_flagged() {
        let cli = Cli::parse_from(["kbli-dashboard", "multi", "--flagged"]);
        match cli.command {
            Commands::Multi { flagged } => assert!(flagged),
            _ => panic!("Expected Multi command"),
        }
    }

    #[test]
    fn test_cli_cooccurrence_top() {
        let cli = Cli::parse_from(["kbli-dashboard", "cooccurrence", "-t", "5"]);
        match cli.command {
            Commands::Cooccurrence { top } => assert_eq!(top, Some(5)),
            _ => panic!("Expected Cooccurrence command"),
        }
    }

    #[test]
    fn test_cli_search() {
        let cli = Cli::parse_from(["kbli-dashboard", "search", "jagung"]);
        match cli.command {
            Commands::Search { query } => assert_eq!(query, "jagung"),
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_export() {
        let cli = Cli::parse_from([
            "kbli-dashboard",
            "export",
            "cluster",
            "Pangan",
            "-o",
            "/tmp/pangan.csv",
        ]);
        match cli.command {
            Commands::Export { view, arg, output } => {
                assert_eq!(view, "cluster");
                assert_eq!(arg.as_deref(), Some("Pangan"));
                assert_eq!(output, Some(PathBuf::from("/tmp/pangan.csv")));
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "kbli-dashboard",
            "--config",
            "/etc/kbli.toml",
            "multi",
            "--data-dir",
            "/srv/data",
            "--json",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.config.as_deref(), Some("/etc/kbli.toml"));
        assert_eq!(cli.data_dir.as_deref(), Some("/srv/data"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.json);
    }
}
