//! # kbli-types
//!
//! Shared domain types for the KBLI cluster dashboard.
//!
//! This crate defines the data structures consumed by every other crate:
//! - Rows: one struct per input table (assignments, reference, jobs)
//! - Tables: identifiers for the four source tables
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use kbli_types::AssignmentRow;
//!
//! let row = AssignmentRow::new(" 01111 ", "Pertanian Jagung", "Pangan");
//! assert_eq!(row.normalized_code(), Some("01111"));
//! ```

pub mod config;
pub mod error;
pub mod rows;
pub mod table;

pub use config::{LabelSettings, Settings, TableSettings};
pub use error::KbliError;
pub use rows::{normalize, AssignmentRow, JobClusterRow, ReferenceRow, UnclassifiedJobRow};
pub use table::TableKind;
