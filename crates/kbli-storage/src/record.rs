//! Binding between row types and the tables they are read from.

use kbli_types::{AssignmentRow, JobClusterRow, ReferenceRow, TableKind, UnclassifiedJobRow};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A row type that can be decoded from one source table.
pub trait TableRecord: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Table this row type is read from.
    const KIND: TableKind;

    /// Columns that must be present, as (sheet header, alias) pairs.
    /// Either spelling satisfies the requirement.
    const REQUIRED: &'static [(&'static str, &'static str)];
}

impl TableRecord for AssignmentRow {
    const KIND: TableKind = TableKind::Assignments;
    const REQUIRED: &'static [(&'static str, &'static str)] =
        &[("KODE_KBLI", "code"), ("CLUSTER", "cluster")];
}

impl TableRecord for ReferenceRow {
    const KIND: TableKind = TableKind::Reference;
    const REQUIRED: &'static [(&'static str, &'static str)] = &[("KODE KBLI", "code")];
}

impl TableRecord for UnclassifiedJobRow {
    const KIND: TableKind = TableKind::Unclassified;
    const REQUIRED: &'static [(&'static str, &'static str)] =
        &[("List Pekerjaan UMKM", "job"), ("KODE KBLI", "code")];
}

impl TableRecord for JobClusterRow {
    const KIND: TableKind = TableKind::Jobs;
    const REQUIRED: &'static [(&'static str, &'static str)] =
        &[("List Pekerjaan UMKM", "job"), ("CLUSTER", "cluster")];
}
