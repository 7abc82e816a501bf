use std::{
    error::Error,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use rusqlite::{
    Connection,
    params_from_iter,
    types::{Type, Value, ValueRef},
};
use sqlite_store::models::{ColumnDefinition, ModificationOutcome, QueryResult, Record, SqlValue};
use sqlite_store::schema::{LIST_TABLES_SQL, table_info_sql};
use tracing::debug;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum StoreError {
    Open {
        path: PathBuf,
        source: Box<rusqlite::Error>,
    },
    Sqlite(Box<rusqlite::Error>),
    InvalidInput(String),
}

impl StoreError {
    /// Returns true when the engine itself rejected or failed a statement.
    #[must_use]
    pub const fn is_engine(&self) -> bool {
        matches!(self, Self::Sqlite(_) | Self::InvalidInput(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open database at {}: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Opens connections to database files on demand.
///
/// Holds only connection settings; no connection outlives the call that
/// opened it.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore {
    busy_timeout: Duration,
}

impl Default for SqliteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SqliteStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }

    /// Opens a read-write connection, creating the file if it is missing.
    ///
    /// # Errors
    /// Returns `StoreError::Open` if the file cannot be opened or configured.
    pub fn open(&self, path: &Path) -> StoreResult<ConnectionHandle> {
        let conn = Connection::open(path).map_err(|err| open_error(path, err))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|err| open_error(path, err))?;
        debug!(path = %path.display(), "opened sqlite connection");
        Ok(ConnectionHandle {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Opens a connection on which the engine refuses any write.
    ///
    /// # Errors
    /// Returns `StoreError::Open` if the file cannot be opened or configured.
    pub fn open_read_only(&self, path: &Path) -> StoreResult<ConnectionHandle> {
        let handle = self.open(path)?;
        handle
            .conn
            .execute_batch("PRAGMA query_only = ON;")
            .map_err(|err| open_error(path, err))?;
        Ok(handle)
    }
}

fn open_error(path: &Path, err: rusqlite::Error) -> StoreError {
    StoreError::Open {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}

/// A single connection bound to one database file.
///
/// Dropping the handle closes the connection.
pub struct ConnectionHandle {
    conn: Connection,
    path: PathBuf,
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "released sqlite connection");
    }
}

impl ConnectionHandle {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs a statement and collects every row keyed by column name.
    ///
    /// A blank statement yields no rows.
    ///
    /// # Errors
    /// Returns `StoreError::Sqlite` if the engine rejects the statement or a
    /// text value is not valid UTF-8.
    pub fn query(&self, sql: &str, params: &[SqlValue]) -> StoreResult<QueryResult> {
        if sql.trim().is_empty() {
            return Ok(QueryResult::new(Vec::new()));
        }
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = stmt.query(params_from_iter(params.iter().map(to_engine_value)))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Record::new();
            for (idx, name) in columns.iter().enumerate() {
                record.insert(name.clone(), from_engine_value(idx, row.get_ref(idx)?)?);
            }
            records.push(record);
        }
        Ok(QueryResult::new(records))
    }

    /// Runs a single-value `COUNT(*)` style statement.
    ///
    /// # Errors
    /// Returns `StoreError::Sqlite` if the engine rejects the statement.
    pub fn count(&self, sql: &str) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Runs one write statement inside a transaction and commits it.
    ///
    /// A failed statement rolls the transaction back when it is dropped.
    ///
    /// # Errors
    /// Returns `StoreError::Sqlite` if the statement or the commit fails.
    pub fn execute_write(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> StoreResult<ModificationOutcome> {
        let tx = self.conn.transaction()?;
        let affected_rows = tx.execute(sql, params_from_iter(params.iter().map(to_engine_value)))?;
        let row_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(ModificationOutcome {
            affected_rows,
            last_insert_id: (row_id != 0).then_some(row_id),
        })
    }

    /// Lists table names from `sqlite_master` in creation order.
    ///
    /// # Errors
    /// Returns `StoreError::Sqlite` if the catalog cannot be read.
    pub fn list_tables(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(LIST_TABLES_SQL)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Reads column metadata for a table. Unknown tables yield no columns.
    ///
    /// # Errors
    /// Returns `StoreError::Sqlite` if the pragma fails.
    pub fn table_info(&self, table_name: &str) -> StoreResult<Vec<ColumnDefinition>> {
        let mut stmt = self.conn.prepare(&table_info_sql(table_name))?;
        let columns = stmt
            .query_map([], |row| {
                let default_value = from_engine_value(4, row.get_ref(4)?)?;
                Ok(ColumnDefinition {
                    name: row.get(1)?,
                    declared_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? != 0,
                    default_value: Some(default_value).filter(|value| !value.is_null()),
                    is_primary_key: row.get::<_, i64>(5)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }
}

fn to_engine_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => Value::Integer(*value),
        SqlValue::Real(value) => Value::Real(*value),
        SqlValue::Text(value) => Value::Text(value.clone()),
        SqlValue::Blob(value) => Value::Blob(value.clone()),
    }
}

/// Text that is not valid UTF-8 is reported as a conversion failure rather
/// than altered.
fn from_engine_value(idx: usize, value: ValueRef<'_>) -> rusqlite::Result<SqlValue> {
    Ok(match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(value) => SqlValue::Integer(value),
        ValueRef::Real(value) => SqlValue::Real(value),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
            })?;
            SqlValue::Text(text.to_string())
        }
        ValueRef::Blob(value) => SqlValue::Blob(value.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("store.db");
        (dir, path)
    }

    #[test]
    fn write_then_read_round_trips_all_value_kinds() {
        let (_dir, path) = temp_store();
        let store = SqliteStore::new();
        let mut conn = store.open(&path).expect("open should succeed");
        conn.execute_write("CREATE TABLE v (i INTEGER, r REAL, t TEXT, b BLOB, n TEXT)", &[])
            .expect("create should succeed");
        let outcome = conn
            .execute_write(
                "INSERT INTO v VALUES (?, ?, ?, ?, ?)",
                &[
                    SqlValue::Integer(7),
                    SqlValue::Real(2.5),
                    SqlValue::Text("x".to_string()),
                    SqlValue::Blob(vec![1, 2]),
                    SqlValue::Null,
                ],
            )
            .expect("insert should succeed");
        assert_eq!(outcome.affected_rows, 1);
        assert_eq!(outcome.last_insert_id, Some(1));

        let result = conn.query("SELECT * FROM v", &[]).expect("select should succeed");
        let row = &result.rows()[0];
        assert_eq!(row["i"], SqlValue::Integer(7));
        assert_eq!(row["r"], SqlValue::Real(2.5));
        assert_eq!(row["t"], SqlValue::Text("x".to_string()));
        assert_eq!(row["b"], SqlValue::Blob(vec![1, 2]));
        assert_eq!(row["n"], SqlValue::Null);
    }

    #[test]
    fn read_only_connection_rejects_writes() {
        let (_dir, path) = temp_store();
        let store = SqliteStore::new();
        let conn = store.open_read_only(&path).expect("open should succeed");
        let err = conn
            .query("CREATE TABLE t (id INTEGER)", &[])
            .expect_err("write should be refused");
        assert!(err.is_engine());
    }

    #[test]
    fn missing_directory_is_an_open_error() {
        let (dir, _) = temp_store();
        let path = dir.path().join("missing").join("nested.db");
        let err = SqliteStore::new()
            .open(&path)
            .expect_err("open should fail");
        assert!(matches!(err, StoreError::Open { .. }));
        assert!(!err.is_engine());
    }

    #[test]
    fn failed_write_leaves_no_partial_commit() {
        let (_dir, path) = temp_store();
        let store = SqliteStore::new();
        let mut conn = store.open(&path).expect("open should succeed");
        conn.execute_write("CREATE TABLE u (id INTEGER PRIMARY KEY)", &[])
            .expect("create should succeed");
        conn.execute_write("INSERT INTO u (id) VALUES (1)", &[])
            .expect("insert should succeed");
        conn.execute_write("INSERT INTO u (id) VALUES (2), (1)", &[])
            .expect_err("duplicate key should fail");

        assert_eq!(conn.count("SELECT COUNT(*) FROM u").expect("count"), 1);
    }

    #[test]
    fn invalid_utf8_text_is_an_engine_error() {
        let (_dir, path) = temp_store();
        let store = SqliteStore::new();
        let mut conn = store.open(&path).expect("open should succeed");
        conn.execute_write("CREATE TABLE t (s TEXT)", &[])
            .expect("create should succeed");
        conn.execute_write("INSERT INTO t VALUES (CAST(x'C3FF41' AS TEXT))", &[])
            .expect("insert should succeed");

        let err = conn
            .query("SELECT s FROM t", &[])
            .expect_err("undecodable text should fail");
        assert!(err.is_engine());

        let hex = conn
            .query("SELECT hex(s) AS h FROM t", &[])
            .expect("hex should succeed");
        assert_eq!(hex.rows()[0]["h"], SqlValue::Text("C3FF41".to_string()));
    }

    #[test]
    fn blank_statement_yields_no_rows() {
        let (_dir, path) = temp_store();
        let conn = SqliteStore::new()
            .open_read_only(&path)
            .expect("open should succeed");

        let result = conn.query("  \n ", &[]).expect("blank query should succeed");
        assert_eq!(result.row_count(), 0);
        assert!(result.rows().is_empty());
    }

    #[test]
    fn busy_timeout_lets_a_second_writer_wait_for_the_lock() {
        let (_dir, path) = temp_store();
        let store = SqliteStore::new().with_busy_timeout(Duration::from_secs(5));
        let mut setup = store.open(&path).expect("open should succeed");
        setup
            .execute_write("CREATE TABLE w (id INTEGER)", &[])
            .expect("create should succeed");
        drop(setup);

        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let holder_path = path.clone();
        let holder = std::thread::spawn(move || {
            let conn = store.open(&holder_path).expect("open should succeed");
            conn.conn
                .execute_batch("BEGIN IMMEDIATE; INSERT INTO w VALUES (1);")
                .expect("lock should be taken");
            locked_tx.send(()).expect("signal should be sent");
            std::thread::sleep(Duration::from_millis(200));
            conn.conn.execute_batch("COMMIT;").expect("commit should succeed");
        });
        locked_rx.recv().expect("holder should take the lock");

        let mut waiter = store.open(&path).expect("open should succeed");
        let outcome = waiter
            .execute_write("INSERT INTO w VALUES (2)", &[])
            .expect("second writer should wait and succeed");
        assert_eq!(outcome.affected_rows, 1);
        holder.join().expect("holder thread should finish");

        assert_eq!(waiter.count("SELECT COUNT(*) FROM w").expect("count"), 2);
    }

    #[test]
    fn zero_busy_timeout_fails_fast_on_a_held_lock() {
        let (_dir, path) = temp_store();
        let store = SqliteStore::new().with_busy_timeout(Duration::ZERO);
        let holder = store.open(&path).expect("open should succeed");
        holder
            .conn
            .execute_batch("CREATE TABLE w (id INTEGER); BEGIN IMMEDIATE;")
            .expect("lock should be taken");

        let mut waiter = store.open(&path).expect("open should succeed");
        let err = waiter
            .execute_write("INSERT INTO w VALUES (1)", &[])
            .expect_err("locked database should fail");
        assert!(err.is_engine());
        assert!(err.to_string().contains("locked"));
    }
}
