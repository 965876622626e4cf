//! Dashboard service layer.
//!
//! Owns the current table snapshot and serves every dashboard view from it.
//!
//! ## Snapshots
//!
//! Tables are loaded into an immutable [`Snapshot`]. Reloading builds a new
//! snapshot with a higher version; readers holding the old one are not
//! affected. Derived analysis is memoized in an [`IndexCache`] keyed by the
//! assignment table's content hash, so reloading unchanged data reuses it.
//!
//! ## Degradation
//!
//! A view that needs an unavailable table returns
//! [`ServiceError::Unavailable`]; every other view keeps working.

pub mod cache;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod snapshot;

pub use cache::{CacheStats, IndexArtifacts, IndexCache};
pub use dashboard::DashboardService;
pub use error::ServiceError;
pub use export::{write_csv, ExportRecord, ExportView};
pub use snapshot::{DashboardSummary, Snapshot};
