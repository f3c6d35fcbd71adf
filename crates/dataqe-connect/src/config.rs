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

//! Connection settings as they appear in a run configuration.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Location used when neither the profile map nor `location` names one.
pub const DEFAULT_LOCATION: &str = "us-central1";

/// Infra-core name used when neither the profile map nor `infra_core` names one.
pub const DEFAULT_INFRA_CORE: &str = "infra-core-us-central1";

/// Key ring holding the customer-managed encryption key.
pub const DEFAULT_KMS_KEY_RING: &str = "infra-default-cmek";

/// MySQL port used when none is configured.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// BigQuery REST root.
pub const DEFAULT_BIGQUERY_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// One side of a run, selected by `database_type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "database_type", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// A local SQLite database file.
    Sqlite {
        /// File settings.
        sqlite: SqliteConfig,
    },
    /// A MySQL database.
    Mysql {
        /// Server settings.
        mysql: MysqlConfig,
    },
    /// A BigQuery project.
    Gcpbq {
        /// Project settings.
        #[serde(default)]
        gcp: GcpConfig,
    },
}

impl DatabaseConfig {
    /// The `database_type` tag.
    pub fn database_type(&self) -> &'static str {
        match self {
            DatabaseConfig::Sqlite { .. } => "sqlite",
            DatabaseConfig::Mysql { .. } => "mysql",
            DatabaseConfig::Gcpbq { .. } => "gcpbq",
        }
    }

    /// Resolve relative file paths against `base`, normally the directory of
    /// the configuration file.
    pub fn resolve_paths(&mut self, base: &Path) {
        match self {
            DatabaseConfig::Sqlite { sqlite } => {
                sqlite.path = resolve(base, &sqlite.path);
            }
            DatabaseConfig::Mysql { .. } => {}
            DatabaseConfig::Gcpbq { gcp } => {
                if let Some(path) = gcp.credentials_path.as_mut() {
                    *path = resolve(base, path);
                }
            }
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// SQLite settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SqliteConfig {
    /// Database file.
    pub path: PathBuf,
}

/// MySQL settings.
///
/// Connection fields come either inline or from a `k8_db_details` block, as
/// rendered into the config by a Kubernetes deployment. The block wins when
/// present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MysqlConfig {
    /// Server host name or address.
    pub host: Option<String>,
    /// Server port, [`DEFAULT_MYSQL_PORT`] when absent.
    pub port: Option<u16>,
    /// Login user.
    pub user: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// Default schema.
    pub database: Option<String>,
    /// Deployment-provided credentials.
    pub k8_db_details: Option<K8DbDetails>,
}

/// Credentials block written by a Kubernetes deployment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct K8DbDetails {
    /// Server host name or address.
    pub db_host: Option<String>,
    /// Server port.
    pub db_port: Option<u16>,
    /// Login user.
    pub db_user: Option<String>,
    /// Login password.
    pub db_password: Option<String>,
    /// Default schema.
    #[serde(alias = "db_name")]
    pub database: Option<String>,
}

/// MySQL settings after merging `k8_db_details` and defaults.
#[derive(Clone, PartialEq)]
pub struct MysqlSettings {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Default schema.
    pub database: Option<String>,
}

impl std::fmt::Debug for MysqlSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl MysqlConfig {
    /// Merge the deployment block over the inline fields. Fails naming the
    /// first missing required field.
    pub fn resolve(&self) -> Result<MysqlSettings, &'static str> {
        let k8 = self.k8_db_details.clone().unwrap_or_default();
        let host = k8.db_host.or_else(|| self.host.clone()).filter(|h| !h.is_empty());
        let user = k8.db_user.or_else(|| self.user.clone()).filter(|u| !u.is_empty());
        let password = k8.db_password.or_else(|| self.password.clone());

        Ok(MysqlSettings {
            host: host.ok_or("host")?,
            port: k8.db_port.or(self.port).unwrap_or(DEFAULT_MYSQL_PORT),
            user: user.ok_or("user")?,
            password: password.ok_or("password")?,
            database: k8
                .database
                .or_else(|| self.database.clone())
                .filter(|d| !d.is_empty()),
        })
    }
}

/// BigQuery settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GcpConfig {
    /// Project that runs the query jobs.
    pub project_id: String,
    /// Dataset used for unqualified table names.
    pub dataset_id: Option<String>,
    /// Job location when the profile has no entry in `location_map`.
    pub location: Option<String>,
    /// Profile name to location.
    pub location_map: HashMap<String, String>,
    /// Infra-core name when the profile has no entry in `infra_core_map`.
    pub infra_core: Option<String>,
    /// Profile name to infra-core.
    pub infra_core_map: HashMap<String, String>,
    /// Encrypt query results with a customer-managed key on PHI projects.
    pub use_encryption: bool,
    /// Key ring holding the encryption key.
    pub kms_key_ring: Option<String>,
    /// OAuth bearer token. Falls back to `GOOGLE_OAUTH_ACCESS_TOKEN`.
    pub access_token: Option<String>,
    /// Service-account JSON key. Application-default credentials are used
    /// when neither a token nor this file is available.
    pub credentials_path: Option<PathBuf>,
    /// Overrides [`DEFAULT_BIGQUERY_ENDPOINT`].
    pub endpoint: Option<String>,
}

/// BigQuery settings after applying the active profile and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct BigQuerySettings {
    /// Project that runs the query jobs.
    pub project_id: String,
    /// Dataset used for unqualified table names.
    pub dataset_id: Option<String>,
    /// Job location.
    pub location: String,
    /// Infra-core name, part of the encryption key path.
    pub infra_core: String,
    /// Encrypt query results on PHI projects.
    pub use_encryption: bool,
    /// Key ring holding the encryption key.
    pub kms_key_ring: String,
    /// Explicit bearer token, if configured.
    pub access_token: Option<String>,
    /// Service-account JSON key.
    pub credentials_path: Option<PathBuf>,
    /// BigQuery REST root.
    pub endpoint: String,
}

impl GcpConfig {
    /// Apply `profile` (the `SPRING_PROFILES_ACTIVE` value) and defaults.
    ///
    /// A profile entry in `location_map`/`infra_core_map` wins over the
    /// plain `location`/`infra_core` fields.
    pub fn resolve(&self, profile: &str) -> BigQuerySettings {
        let location = self
            .location_map
            .get(profile)
            .or(self.location.as_ref())
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
        let infra_core = self
            .infra_core_map
            .get(profile)
            .or(self.infra_core.as_ref())
            .cloned()
            .unwrap_or_else(|| DEFAULT_INFRA_CORE.to_string());

        BigQuerySettings {
            project_id: self.project_id.clone(),
            dataset_id: self.dataset_id.clone(),
            location,
            infra_core,
            use_encryption: self.use_encryption,
            kms_key_ring: self
                .kms_key_ring
                .clone()
                .unwrap_or_else(|| DEFAULT_KMS_KEY_RING.to_string()),
            access_token: self.access_token.clone().filter(|t| !t.is_empty()),
            credentials_path: self.credentials_path.clone(),
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_BIGQUERY_ENDPOINT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sqlite() {
        let config: DatabaseConfig =
            serde_yaml::from_str("database_type: sqlite\nsqlite:\n  path: data/source.db\n").unwrap();
        assert_eq!(config.database_type(), "sqlite");
        assert_eq!(
            config,
            DatabaseConfig::Sqlite {
                sqlite: SqliteConfig {
                    path: PathBuf::from("data/source.db")
                }
            }
        );
    }

    #[test]
    fn test_deserialize_gcp_defaults() {
        let config: DatabaseConfig =
            serde_yaml::from_str("database_type: gcpbq\ngcp:\n  project_id: proj-h-1\n").unwrap();
        let DatabaseConfig::Gcpbq { gcp } = config else {
            panic!("expected gcpbq");
        };
        assert_eq!(gcp.project_id, "proj-h-1");
        assert!(!gcp.use_encryption);
        assert!(gcp.location_map.is_empty());
    }

    #[test]
    fn test_unknown_database_type() {
        let err = serde_yaml::from_str::<DatabaseConfig>("database_type: oracle\n").unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn test_deserialize_mysql_inline() {
        let config: DatabaseConfig = serde_yaml::from_str(
            "database_type: mysql\nmysql:\n  host: db.local\n  user: qe\n  password: secret\n  database: ventana\n",
        )
        .unwrap();
        assert_eq!(config.database_type(), "mysql");
        let DatabaseConfig::Mysql { mysql } = config else {
            panic!("expected mysql");
        };
        let settings = mysql.resolve().unwrap();
        assert_eq!(settings.host, "db.local");
        assert_eq!(settings.port, DEFAULT_MYSQL_PORT);
        assert_eq!(settings.user, "qe");
        assert_eq!(settings.password, "secret");
        assert_eq!(settings.database.as_deref(), Some("ventana"));
        assert!(!format!("{:?}", settings).contains("secret"));
    }

    #[test]
    fn test_mysql_k8_details_win() {
        let config: DatabaseConfig = serde_yaml::from_str(
            "database_type: mysql\nmysql:\n  host: ignored\n  database: ventana\n  k8_db_details:\n    db_host: mysql.svc\n    db_port: 3307\n    db_user: svc\n    db_password: pw\n",
        )
        .unwrap();
        let DatabaseConfig::Mysql { mysql } = config else {
            panic!("expected mysql");
        };
        let settings = mysql.resolve().unwrap();
        assert_eq!(settings.host, "mysql.svc");
        assert_eq!(settings.port, 3307);
        assert_eq!(settings.user, "svc");
        assert_eq!(settings.database.as_deref(), Some("ventana"));
    }

    #[test]
    fn test_mysql_requires_host_user_password() {
        assert_eq!(MysqlConfig::default().resolve().err(), Some("host"));
        let partial = MysqlConfig {
            host: Some("db".to_string()),
            user: Some("qe".to_string()),
            ..Default::default()
        };
        assert_eq!(partial.resolve().err(), Some("password"));
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = DatabaseConfig::Sqlite {
            sqlite: SqliteConfig {
                path: PathBuf::from("source.db"),
            },
        };
        config.resolve_paths(Path::new("/etc/dataqe"));
        let DatabaseConfig::Sqlite { sqlite } = &config else {
            panic!("expected sqlite");
        };
        assert_eq!(sqlite.path, PathBuf::from("/etc/dataqe/source.db"));

        config.resolve_paths(Path::new("/other"));
        let DatabaseConfig::Sqlite { sqlite } = &config else {
            panic!("expected sqlite");
        };
        assert_eq!(sqlite.path, PathBuf::from("/etc/dataqe/source.db"));
    }

    #[test]
    fn test_resolve_profile_maps() {
        let mut gcp = GcpConfig {
            project_id: "proj".to_string(),
            location: Some("EU".to_string()),
            ..Default::default()
        };
        gcp.location_map.insert("prod".to_string(), "US-EAST4".to_string());
        gcp.infra_core_map
            .insert("prod".to_string(), "infra-core-us-east4".to_string());

        let prod = gcp.resolve("prod");
        assert_eq!(prod.location, "US-EAST4");
        assert_eq!(prod.infra_core, "infra-core-us-east4");

        let local = gcp.resolve("mylocal");
        assert_eq!(local.location, "EU");
        assert_eq!(local.infra_core, DEFAULT_INFRA_CORE);
        assert_eq!(local.kms_key_ring, DEFAULT_KMS_KEY_RING);
        assert_eq!(local.endpoint, DEFAULT_BIGQUERY_ENDPOINT);
    }
}
