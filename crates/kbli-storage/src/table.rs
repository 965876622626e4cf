//! Typed, versioned tables decoded from CSV.

use std::fs;
use std::path::Path;

use kbli_types::TableKind;
use tracing::{debug, instrument};

use crate::error::StorageError;
use crate::record::TableRecord;
use crate::version::TableVersion;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An immutable table of decoded rows.
#[derive(Debug, Clone)]
pub struct Table<T> {
    kind: TableKind,
    rows: Vec<T>,
    version: TableVersion,
}

impl<T: TableRecord> Table<T> {
    /// Build a table from in-memory rows.
    ///
    /// The version hash is taken over the JSON encoding of the rows, so
    /// equal row sets always share a version.
    pub fn from_rows(rows: Vec<T>) -> Result<Self, StorageError> {
        let encoded = serde_json::to_vec(&rows)?;
        let version = TableVersion::from_bytes(&encoded, rows.len());
        Ok(Self {
            kind: T::KIND,
            rows,
            version,
        })
    }

    /// Read and decode a table from a CSV file.
    #[instrument(skip_all, fields(table = %T::KIND, path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let bytes = fs::read(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = read_table::<T>(&bytes)?;
        debug!(
            rows = table.rows.len(),
            version = table.version.short_hash(),
            "Loaded table"
        );
        Ok(table)
    }
}

impl<T> Table<T> {
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn version(&self) -> &TableVersion {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode CSV bytes (UTF-8, header row) into a table.
///
/// Fails when a required column is missing or a record cannot be decoded.
/// A header-only input yields an empty table.
pub fn read_table<T: TableRecord>(bytes: &[u8]) -> Result<Table<T>, StorageError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(body);

    let headers = reader.headers()?.clone();
    for (column, alias) in T::REQUIRED {
        let present = headers.iter().any(|h| h == *column || h == *alias);
        if !present {
            return Err(StorageError::MissingColumn {
                table: T::KIND,
                column: (*column).to_string(),
            });
        }
    }

    let rows = reader
        .deserialize::<T>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Table {
        kind: T::KIND,
        version: TableVersion::from_bytes(bytes, rows.len()),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbli_types::{AssignmentRow, JobClusterRow, ReferenceRow};
    use std::io::Write;

    #[test]
    fn test_read_sheet_headers() {
        let csv = "KODE_KBLI,JUDUL_KBLI,CLUSTER\n01111,Pertanian Jagung,Pangan\n01112,Pertanian Gandum,Pangan\n";
        let table = read_table::<AssignmentRow>(csv.as_bytes()).unwrap();
        assert_eq!(table.kind(), TableKind::Assignments);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows()[0],
            AssignmentRow::new("01111", "Pertanian Jagung", "Pangan")
        );
    }

    #[test]
    fn test_read_alias_headers_and_bom() {
        let csv = "\u{feff}code,title,description\n10110,Pemotongan Hewan,Kegiatan rumah potong\n";
        let table = read_table::<ReferenceRow>(csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].normalized_code(), Some("10110"));
        assert_eq!(
            table.rows()[0].description.as_deref(),
            Some("Kegiatan rumah potong")
        );
    }

    #[test]
    fn test_blank_cells_are_none() {
        let csv = "KODE_KBLI,JUDUL_KBLI,CLUSTER\n,Tanpa Kode,Pangan\n";
        let table = read_table::<AssignmentRow>(csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].normalized_code(), None);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "KODE_KBLI,JUDUL_KBLI\n01111,Jagung\n";
        let err = read_table::<AssignmentRow>(csv.as_bytes()).unwrap_err();
        match err {
            StorageError::MissingColumn { table, column } => {
                assert_eq!(table, TableKind::Assignments);
                assert_eq!(column, "CLUSTER");
            }
            other => panic!("Expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        let table = read_table::<JobClusterRow>(b"List Pekerjaan UMKM,CLUSTER\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.version().rows, 0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Table::<AssignmentRow>::load(Path::new("/nonexistent/kbli.csv")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "List Pekerjaan UMKM,CLUSTER\nTukang jahit,Fashion\n").unwrap();
        let table = Table::<JobClusterRow>::load(file.path()).unwrap();
        assert_eq!(table.rows(), &[JobClusterRow::new("Tukang jahit", "Fashion")]);
    }

    #[test]
    fn test_from_rows_version_is_content_based() {
        let rows = vec![AssignmentRow::new("A", "T1", "C1")];
        let a = Table::from_rows(rows.clone()).unwrap();
        let b = Table::from_rows(rows).unwrap();
        assert_eq!(a.version().hash, b.version().hash);

        let c = Table::from_rows(vec![AssignmentRow::new("A", "T1", "C2")]).unwrap();
        assert_ne!(a.version().hash, c.version().hash);
    }
}
