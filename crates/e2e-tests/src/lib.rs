//! End-to-end test infrastructure for the KBLI dashboard.
//!
//! Provides a shared TestHarness that writes source CSV files into a temp
//! data directory and opens a dashboard service over them.

use std::fs;
use std::path::PathBuf;

use kbli_service::DashboardService;
use kbli_types::{Settings, TableKind};

/// Assignment table with one multi-cluster code, one blank code and
/// a duplicated row.
pub const ASSIGNMENTS_CSV: &str = "\
KODE_KBLI,JUDUL_KBLI,CLUSTER
01111,Pertanian Jagung,Pangan
01112,Pertanian Gandum,Pangan
10110,Pemotongan Hewan,Pangan
10110,Pemotongan Hewan,Kuliner
10110,Pemotongan Hewan,Peternakan
 10110 ,Pemotongan Hewan,Kuliner
14111,Pakaian Jadi,Fashion
14112,Pakaian Kerja,Fashion
14112,Pakaian Kerja,Kriya
,Tanpa Kode,Fashion
";

pub const REFERENCE_CSV: &str = "\
KODE KBLI,JUDUL KBLI,DESKRIPSI KBLI
01111,Pertanian Jagung,Budidaya jagung untuk pangan
10110,Pemotongan Hewan,Rumah potong hewan ternak
14111,Pakaian Jadi,Konveksi pakaian jadi
62010,Pemrograman Komputer,Pembuatan perangkat lunak
";

pub const UNCLASSIFIED_CSV: &str = "\
List Pekerjaan UMKM,KODE KBLI,JUDUL KBLI,CLUSTER,DESKRIPSI KBLI
Penjual jagung bakar,01111,Pertanian Jagung,Pangan,Budidaya jagung untuk pangan
Penjahit rumahan,14111,Pakaian Jadi,Fashion,Konveksi pakaian jadi
Jasa titip,Tidak Ditemukan,,Tidak Terklasifikasi,
";

pub const JOBS_CSV: &str = "\
List Pekerjaan UMKM,CLUSTER
Penjual jagung bakar,Pangan
Warung makan,Kuliner
Penjahit rumahan,Fashion
Jasa titip,Tidak Terklasifikasi
";

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Directory holding the source CSV files
    pub data_dir: PathBuf,
    pub settings: Settings,
}

impl TestHarness {
    /// Create a harness with an empty data directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        let settings = Settings {
            data_dir: data_dir.to_string_lossy().to_string(),
            ..Default::default()
        };

        Self {
            _temp_dir: temp_dir,
            data_dir,
            settings,
        }
    }

    /// Create a harness with every source table present.
    pub fn with_all_tables() -> Self {
        let harness = Self::new();
        harness.write_table(TableKind::Assignments, ASSIGNMENTS_CSV);
        harness.write_table(TableKind::Reference, REFERENCE_CSV);
        harness.write_table(TableKind::Unclassified, UNCLASSIFIED_CSV);
        harness.write_table(TableKind::Jobs, JOBS_CSV);
        harness
    }

    /// Path of one table's CSV file.
    pub fn table_path(&self, kind: TableKind) -> PathBuf {
        self.data_dir.join(self.settings.tables.file_name(kind))
    }

    /// Write (or overwrite) one table's CSV file.
    pub fn write_table(&self, kind: TableKind, contents: &str) {
        fs::write(self.table_path(kind), contents).expect("Failed to write table");
    }

    pub fn remove_table(&self, kind: TableKind) {
        fs::remove_file(self.table_path(kind)).expect("Failed to remove table");
    }

    /// Open a dashboard service over the data directory.
    pub fn open(&self) -> DashboardService {
        DashboardService::open(self.settings.clone()).expect("Failed to open dashboard")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
