//! KBLI Cluster Dashboard
//!
//! Read-only analysis of KBLI code cluster assignments.
//!
//! # Usage
//!
//! ```bash
//! kbli-dashboard summary
//! kbli-dashboard multi --flagged
//! kbli-dashboard cooccurrence --top 10
//! kbli-dashboard search jagung
//! kbli-dashboard export cluster Pangan -o pangan.csv
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/kbli-dashboard/config.toml)
//! 3. Environment variables (KBLI_*)
//! 4. CLI flags

use anyhow::Result;

use kbli_dashboard::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse_args())
}
