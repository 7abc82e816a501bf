use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use sqlite_store::models::{BackupReport, BackupSnapshot, TableDump};
use sqlite_store::schema::{BACKUP_FILE_EXTENSION, BACKUP_FILE_PREFIX, select_all_sql};
use tracing::info;

use super::{ControlResult, SqliteControlPlane};

impl SqliteControlPlane {
    /// Dumps every row of every table to a JSON file.
    ///
    /// The whole database is read into memory and the connection released
    /// before the file is written. Without a destination the file goes to the
    /// backup directory under a timestamped name.
    ///
    /// # Errors
    /// Returns `ControlError` if any table cannot be read or the file cannot
    /// be written.
    pub fn backup_database(
        &self,
        db_path: &Path,
        destination: Option<&Path>,
    ) -> ControlResult<BackupReport> {
        let now = Local::now();
        let destination =
            destination.map_or_else(|| self.default_backup_path(&now), Path::to_path_buf);

        let snapshot = self.snapshot(db_path, &now)?;
        write_snapshot(&snapshot, &destination)?;

        let report = BackupReport {
            backup_path: destination.display().to_string(),
            source_database: snapshot.source_database.clone(),
            tables_backed_up: snapshot.table_count(),
            total_rows: snapshot.total_rows(),
        };
        info!(
            path = %db_path.display(),
            backup_path = %report.backup_path,
            tables = report.tables_backed_up,
            rows = report.total_rows,
            "backup written"
        );
        Ok(report)
    }

    /// Reads the full contents of a database into a snapshot.
    ///
    /// # Errors
    /// Returns `ControlError` if the file cannot be opened or a table cannot
    /// be read.
    pub fn snapshot(&self, db_path: &Path, now: &DateTime<Local>) -> ControlResult<BackupSnapshot> {
        let conn = self.store.open_read_only(db_path)?;
        let mut tables = BTreeMap::new();
        for table_name in conn.list_tables()? {
            let rows = conn.query(&select_all_sql(&table_name), &[])?.into_rows();
            tables.insert(table_name, TableDump::new(rows));
        }
        Ok(BackupSnapshot {
            backup_timestamp: now.to_rfc3339(),
            source_database: db_path.display().to_string(),
            tables,
        })
    }

    #[must_use]
    pub fn default_backup_path(&self, now: &DateTime<Local>) -> PathBuf {
        self.backup_dir.join(backup_file_name(now))
    }
}

fn backup_file_name(now: &DateTime<Local>) -> String {
    format!(
        "{BACKUP_FILE_PREFIX}{}.{BACKUP_FILE_EXTENSION}",
        now.format("%Y%m%d_%H%M%S")
    )
}

fn write_snapshot(snapshot: &BackupSnapshot, destination: &Path) -> ControlResult<()> {
    let file = File::create(destination)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn default_name_is_derived_from_timestamp() {
        let now = Local
            .with_ymd_and_hms(2026, 3, 4, 5, 6, 7)
            .single()
            .expect("timestamp should be unambiguous");
        let control = SqliteControlPlane::default().with_backup_dir("backups");

        assert_eq!(
            control.default_backup_path(&now),
            PathBuf::from("backups").join("backup_20260304_050607.json")
        );
    }
}
