// Dweve DataQE - Data Quality Engine
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SQLite connector.

use dataqe_core::{Connector, ConnectorError, Row, Value};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BACKEND: &str = "sqlite";

/// Runs queries against a SQLite database file.
///
/// The file must already exist; it is opened on the first query.
pub struct SqliteConnector {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteConnector {
    /// Create a connector for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// The database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true while a connection is open.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn connection(&mut self) -> Result<&Connection, ConnectorError> {
        if self.conn.is_none() {
            self.connect()?;
        }
        self.conn
            .as_ref()
            .ok_or_else(|| ConnectorError::connection(BACKEND, "connection not open"))
    }
}

impl Connector for SqliteConnector {
    fn backend(&self) -> &str {
        BACKEND
    }

    fn connect(&mut self) -> Result<(), ConnectorError> {
        if self.conn.is_some() {
            return Ok(());
        }
        info!("Opening SQLite database {}", self.path.display());
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags).map_err(|e| {
            ConnectorError::connection(BACKEND, format!("{}: {}", self.path.display(), e))
        })?;
        self.conn = Some(conn);
        Ok(())
    }

    fn execute_query(&mut self, query: &str) -> Result<Vec<Row>, ConnectorError> {
        debug!("Executing query: {}", query);
        let conn = self.connection()?;
        let rows = run_query(conn, query)
            .map_err(|e| ConnectorError::query(BACKEND, e.to_string()))?;
        info!("Query executed successfully, returned {} rows", rows.len());
        Ok(rows)
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, e)| ConnectorError::connection(BACKEND, e.to_string()))?;
            info!("Closed SQLite database {}", self.path.display());
        }
        Ok(())
    }
}

fn run_query(conn: &Connection, query: &str) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare(query)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Row::new();
        for (index, name) in columns.iter().enumerate() {
            record.push(name.as_str(), to_value(row.get_ref(index)?));
        }
        out.push(record);
    }
    Ok(out)
}

fn to_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn database(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("test.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE items (id INTEGER, name TEXT, price REAL, note TEXT, raw BLOB);
             INSERT INTO items VALUES (1, 'apple', 1.5, NULL, x'6869');
             INSERT INTO items VALUES (2, 'pear', 2.25, 'ripe', NULL);",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_rows_map_column_types() {
        let dir = TempDir::new().unwrap();
        let mut conn = SqliteConnector::new(database(&dir));

        let rows = conn
            .execute_query("SELECT id, name, price, note, raw FROM items ORDER BY id")
            .unwrap();
        assert!(conn.is_connected());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some(&Value::Int(1)));
        assert_eq!(rows[0].get("name"), Some(&Value::from("apple")));
        assert_eq!(rows[0].get("price"), Some(&Value::Float(1.5)));
        assert_eq!(rows[0].get("note"), Some(&Value::Null));
        assert_eq!(rows[0].get("raw"), Some(&Value::from("hi")));
        assert_eq!(rows[1].get("raw"), Some(&Value::Null));
    }

    #[test]
    fn test_scalar_query() {
        let dir = TempDir::new().unwrap();
        let mut conn = SqliteConnector::new(database(&dir));
        let rows = conn.execute_query("SELECT COUNT(*) AS n FROM items").unwrap();
        assert_eq!(dataqe_core::first_value(&rows), Some(Value::Int(2)));
    }

    #[test]
    fn test_bad_query_is_query_error() {
        let dir = TempDir::new().unwrap();
        let mut conn = SqliteConnector::new(database(&dir));
        let err = conn.execute_query("SELECT * FROM missing").unwrap_err();
        assert!(matches!(err, ConnectorError::Query { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_missing_file_is_connection_error() {
        let dir = TempDir::new().unwrap();
        let mut conn = SqliteConnector::new(dir.path().join("absent.db"));
        let err = conn.execute_query("SELECT 1").unwrap_err();
        assert!(matches!(err, ConnectorError::Connection { .. }));
        assert!(!dir.path().join("absent.db").exists());
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut conn = SqliteConnector::new(database(&dir));
        conn.connect().unwrap();
        conn.close().unwrap();
        assert!(!conn.is_connected());
        conn.close().unwrap();
    }
}
