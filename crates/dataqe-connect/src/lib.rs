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

//! SQLite, MySQL and BigQuery connectors for DataQE.
//!
//! A run configuration names one [`DatabaseConfig`] per side;
//! [`connector_from_config`] turns it into a boxed
//! [`Connector`](dataqe_core::Connector).
//!
//! ```no_run
//! use dataqe_connect::{connector_from_config, DatabaseConfig, SqliteConfig};
//!
//! let config = DatabaseConfig::Sqlite {
//!     sqlite: SqliteConfig { path: "warehouse.db".into() },
//! };
//! let mut connector = connector_from_config(&config, "mylocal").unwrap();
//! let rows = connector.execute_query("SELECT COUNT(*) FROM orders").unwrap();
//! ```

mod auth;
mod bigquery;
mod config;
mod decode;
mod mysqldb;
mod sqlite;

pub use auth::{token_source, TokenSource, ACCESS_TOKEN_ENV, BIGQUERY_SCOPE, TOKEN_REFRESH};
pub use bigquery::{
    decode_rows, encryption_key, is_phi_project, kms_key_name, query_request, BigQueryConnector,
    QUERY_TIMEOUT,
};
pub use config::{
    BigQuerySettings, DatabaseConfig, GcpConfig, K8DbDetails, MysqlConfig, MysqlSettings,
    SqliteConfig, DEFAULT_BIGQUERY_ENDPOINT, DEFAULT_INFRA_CORE, DEFAULT_KMS_KEY_RING,
    DEFAULT_LOCATION, DEFAULT_MYSQL_PORT,
};
pub use mysqldb::MysqlConnector;
pub use sqlite::SqliteConnector;

use dataqe_core::{Connector, ConnectorError};

/// Build the connector for `config`.
///
/// `profile` selects entries from the BigQuery location and infra-core maps;
/// it is ignored for SQLite.
pub fn connector_from_config(
    config: &DatabaseConfig,
    profile: &str,
) -> Result<Box<dyn Connector>, ConnectorError> {
    match config {
        DatabaseConfig::Sqlite { sqlite } => {
            if sqlite.path.as_os_str().is_empty() {
                return Err(ConnectorError::configuration("sqlite", "path is required"));
            }
            Ok(Box::new(SqliteConnector::new(sqlite.path.clone())))
        }
        DatabaseConfig::Mysql { mysql } => {
            let settings = mysql.resolve().map_err(|field| {
                ConnectorError::configuration("mysql", format!("{} is required", field))
            })?;
            Ok(Box::new(MysqlConnector::new(settings)))
        }
        DatabaseConfig::Gcpbq { gcp } => {
            if gcp.project_id.is_empty() {
                return Err(ConnectorError::configuration(
                    "bigquery",
                    "project_id is required",
                ));
            }
            Ok(Box::new(BigQueryConnector::new(gcp.resolve(profile))))
        }
    }
}
