//! KBLI Dashboard Library
//!
//! Command-line front end for the KBLI cluster dashboard.
//!
//! Views are rendered from a [`kbli_service::Snapshot`] into any writer, so
//! the same handlers back the binary and the tests.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{execute, init_logging, load_settings, report_unavailable, run, Format};
