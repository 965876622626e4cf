//! Table loading layer for the KBLI dashboard.
//!
//! Provides read-only access to the CSV exports of the source sheets:
//! - Typed row decoding with header validation
//! - Content-hash versions so unchanged input can be recognized
//! - Per-table availability: one broken table never blocks the others

pub mod error;
pub mod record;
pub mod table;
pub mod table_set;
pub mod version;

pub use error::StorageError;
pub use record::TableRecord;
pub use table::{read_table, Table};
pub use table_set::{TableSet, TableState, TableStatus};
pub use version::TableVersion;
