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


//! MySQL connector.

use crate::config::MysqlSettings;
use crate::decode;
use dataqe_core::{Connector, ConnectorError, Row, Value};
use mysql::consts::ColumnType;
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Value as MysqlValue};
use tracing::{debug, info};

const BACKEND: &str = "mysql";

/// Runs queries against a MySQL server.
///
/// The connection is opened on the first query.
pub struct MysqlConnector {
    settings: MysqlSettings,
    conn: Option<Conn>,
}

impl MysqlConnector {
    /// Create a connector. No connection is made until the first query.
    pub fn new(settings: MysqlSettings) -> Self {
        Self {
            settings,
            conn: None,
        }
    }

    /// Resolved settings.
    pub fn settings(&self) -> &MysqlSettings {
        &self.settings
    }

    fn address(&self) -> String {
        format!(
            "{}:{}/{}",
            self.settings.host,
            self.settings.port,
            self.settings.database.as_deref().unwrap_or_default()
        )
    }

    fn connection(&mut self) -> Result<&mut Conn, ConnectorError> {
        if self.conn.is_none() {
            self.connect()?;
        }
        self.conn
            .as_mut()
            .ok_or_else(|| ConnectorError::connection(BACKEND, "connection not open"))
    }
}

impl Connector for MysqlConnector {
    fn backend(&self) -> &str {
        BACKEND
    }

    fn connect(&mut self) -> Result<(), ConnectorError> {
        if self.conn.is_some() {
            return Ok(());
        }
        info!("Establishing MySQL connection to {}", self.address());
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(self.settings.host.clone()))
            .tcp_port(self.settings.port)
            .user(Some(self.settings.user.clone()))
            .pass(Some(self.settings.password.clone()))
            .db_name(self.settings.database.clone());
        let conn = Conn::new(opts).map_err(|e| {
            ConnectorError::connection(BACKEND, format!("{}: {}", self.address(), e))
        })?;
        self.conn = Some(conn);
        info!("MySQL connection established successfully");
        Ok(())
    }

    fn execute_query(&mut self, query: &str) -> Result<Vec<Row>, ConnectorError> {
        debug!("Executing query: {}", query);
        let conn = self.connection()?;
        let rows: Vec<mysql::Row> = conn
            .query(query)
            .map_err(|e| ConnectorError::query(BACKEND, e.to_string()))?;
        let rows: Vec<Row> = rows.iter().map(to_row).collect();
        info!("Query executed successfully, returned {} rows", rows.len());
        Ok(rows)
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        if self.conn.take().is_some() {
            info!("Closing MySQL connection");
        }
        Ok(())
    }
}

fn to_row(row: &mysql::Row) -> Row {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let value = row
                .as_ref(index)
                .map_or(Value::Null, |cell| to_value(cell, column.column_type()));
            (column.name_str().into_owned(), value)
        })
        .collect()
}

/// Map a cell to a [`Value`]. The text protocol returns every non-null cell
/// as bytes, so numeric columns are decoded by their declared type.
fn to_value(cell: &MysqlValue, column_type: ColumnType) -> Value {
    match cell {
        MysqlValue::NULL => Value::Null,
        MysqlValue::Int(n) => Value::Int(*n),
        MysqlValue::UInt(n) => i64::try_from(*n).map_or(Value::Float(*n as f64), Value::Int),
        MysqlValue::Float(n) => Value::Float(f64::from(*n)),
        MysqlValue::Double(n) => Value::Float(*n),
        MysqlValue::Bytes(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            decode_text(&text, column_type).unwrap_or_else(|| Value::String(text.into_owned()))
        }
        MysqlValue::Date(year, month, day, 0, 0, 0, 0) => {
            Value::String(format!("{:04}-{:02}-{:02}", year, month, day))
        }
        MysqlValue::Date(year, month, day, hour, minute, second, micros) => {
            Value::String(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
                year, month, day, hour, minute, second, micros
            ))
        }
        MysqlValue::Time(negative, days, hours, minutes, seconds, _) => Value::String(format!(
            "{}{:02}:{:02}:{:02}",
            if *negative { "-" } else { "" },
            days * 24 + u32::from(*hours),
            minutes,
            seconds
        )),
    }
}

fn decode_text(text: &str, column_type: ColumnType) -> Option<Value> {
    use ColumnType::*;

    match column_type {
        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_LONG | MYSQL_TYPE_INT24
        | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => decode::integer(text),
        MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => text.trim().parse().ok().map(Value::Float),
        MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => decode::decimal(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(text: &str) -> MysqlValue {
        MysqlValue::Bytes(text.as_bytes().to_vec())
    }

    #[test]
    fn test_text_cells_decode_by_column_type() {
        assert_eq!(
            to_value(&bytes("42"), ColumnType::MYSQL_TYPE_LONGLONG),
            Value::Int(42)
        );
        assert_eq!(
            to_value(&bytes("1.5"), ColumnType::MYSQL_TYPE_DOUBLE),
            Value::Float(1.5)
        );
        assert_eq!(
            to_value(&bytes("1050.00"), ColumnType::MYSQL_TYPE_NEWDECIMAL),
            Value::Int(1050)
        );
        assert_eq!(
            to_value(&bytes("10.25"), ColumnType::MYSQL_TYPE_NEWDECIMAL),
            Value::Float(10.25)
        );
        assert_eq!(
            to_value(&bytes("bcbsa_export1"), ColumnType::MYSQL_TYPE_VAR_STRING),
            Value::from("bcbsa_export1")
        );
        assert_eq!(
            to_value(&bytes("007"), ColumnType::MYSQL_TYPE_STRING),
            Value::from("007")
        );
        assert_eq!(to_value(&MysqlValue::NULL, ColumnType::MYSQL_TYPE_LONG), Value::Null);
    }

    #[test]
    fn test_unsigned_bigint_past_i64() {
        assert_eq!(
            to_value(&bytes("18446744073709551615"), ColumnType::MYSQL_TYPE_LONGLONG),
            Value::Float(18_446_744_073_709_551_615.0)
        );
        assert_eq!(
            to_value(&MysqlValue::UInt(7), ColumnType::MYSQL_TYPE_LONGLONG),
            Value::Int(7)
        );
    }

    #[test]
    fn test_binary_temporal_cells_render_as_text() {
        assert_eq!(
            to_value(&MysqlValue::Date(2025, 3, 14, 0, 0, 0, 0), ColumnType::MYSQL_TYPE_DATE),
            Value::from("2025-03-14")
        );
        assert_eq!(
            to_value(&MysqlValue::Time(false, 1, 2, 3, 4, 0), ColumnType::MYSQL_TYPE_TIME),
            Value::from("26:03:04")
        );
    }

    #[test]
    fn test_unreachable_server_is_connection_error() {
        let mut conn = MysqlConnector::new(MysqlSettings {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "qe".to_string(),
            password: "pw".to_string(),
            database: Some("ventana".to_string()),
        });
        let err = conn.execute_query("SELECT 1").unwrap_err();
        assert!(matches!(err, ConnectorError::Connection { .. }));
        assert!(err.to_string().contains("127.0.0.1:1/ventana"));
        conn.close().unwrap();
    }
}
