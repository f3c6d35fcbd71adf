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

//! BigQuery connector over the REST API.
//!
//! Queries go through `jobs.query`. When the job has not finished within the
//! first request, `jobs.getQueryResults` is polled until it completes or
//! [`QUERY_TIMEOUT`] elapses; further result pages are then fetched by page
//! token.

use crate::auth::{token_source, TokenSource};
use crate::config::BigQuerySettings;
use crate::decode;
use dataqe_core::{Connector, ConnectorError, Row, Value};
use serde_json::{json, Value as Json};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const BACKEND: &str = "bigquery";

/// How long to wait for a query to complete.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(120);

/// Server-side wait per request, in milliseconds.
const POLL_WAIT_MS: u64 = 10_000;

/// Returns true for project ids that hold PHI data (`-h-` or `-p-`).
pub fn is_phi_project(project_id: &str) -> bool {
    project_id.contains("-h-") || project_id.contains("-p-")
}

/// Name of the customer-managed key for `project_id`.
///
/// ```
/// use dataqe_connect::kms_key_name;
///
/// assert_eq!(
///     kms_key_name("acme-h-prod", "US-CENTRAL1", "Infra-Core-US-Central1", "infra-default-cmek"),
///     "projects/acme-h-prod/locations/us-central1/keyRings/infra-core-us-central1/cryptoKeys/infra-default-cmek"
/// );
/// ```
pub fn kms_key_name(project_id: &str, location: &str, infra_core: &str, key_ring: &str) -> String {
    format!(
        "projects/{}/locations/{}/keyRings/{}/cryptoKeys/{}",
        project_id,
        location.to_lowercase(),
        infra_core.to_lowercase(),
        key_ring
    )
}

/// The encryption key to apply, if any. Warns about PHI projects that run
/// without encryption.
pub fn encryption_key(settings: &BigQuerySettings) -> Option<String> {
    let phi = is_phi_project(&settings.project_id);
    if !phi {
        return None;
    }
    if !settings.use_encryption {
        warn!(
            "PHI project detected ({}) but encryption is disabled",
            settings.project_id
        );
        return None;
    }
    let key = kms_key_name(
        &settings.project_id,
        &settings.location,
        &settings.infra_core,
        &settings.kms_key_ring,
    );
    info!("KMS encryption configured for PHI data: {}", key);
    Some(key)
}

/// Body of a `jobs.query` request.
pub fn query_request(query: &str, settings: &BigQuerySettings, kms_key: Option<&str>) -> Json {
    let mut body = json!({
        "query": query,
        "useLegacySql": false,
        "location": settings.location,
        "timeoutMs": POLL_WAIT_MS,
    });
    if let Some(dataset_id) = &settings.dataset_id {
        body["defaultDataset"] = json!({
            "projectId": settings.project_id,
            "datasetId": dataset_id,
        });
    }
    if let Some(key) = kms_key {
        body["destinationEncryptionConfiguration"] = json!({ "kmsKeyName": key });
    }
    body
}

/// Decode the `rows` of a query response using its `schema`.
pub fn decode_rows(response: &Json) -> Result<Vec<Row>, ConnectorError> {
    let fields = response["schema"]["fields"]
        .as_array()
        .ok_or_else(|| ConnectorError::query(BACKEND, "response has no schema"))?;
    let columns: Vec<(&str, &str)> = fields
        .iter()
        .map(|f| {
            (
                f["name"].as_str().unwrap_or_default(),
                f["type"].as_str().unwrap_or_default(),
            )
        })
        .collect();

    let Some(rows) = response["rows"].as_array() else {
        return Ok(Vec::new());
    };

    rows.iter()
        .map(|row| -> Result<Row, ConnectorError> {
            let cells = row["f"]
                .as_array()
                .ok_or_else(|| ConnectorError::query(BACKEND, "row has no cells"))?;
            let mut record = Row::new();
            for ((name, kind), cell) in columns.iter().zip(cells) {
                record.push(*name, decode_cell(kind, &cell["v"])?);
            }
            Ok(record)
        })
        .collect()
}

fn decode_cell(kind: &str, cell: &Json) -> Result<Value, ConnectorError> {
    let text = match cell {
        Json::Null => return Ok(Value::Null),
        Json::String(s) => s.as_str(),
        other => return Ok(Value::String(other.to_string())),
    };
    let invalid = || ConnectorError::query(BACKEND, format!("invalid {kind} value '{text}'"));

    match kind {
        "INTEGER" | "INT64" => text.parse().map(Value::Int).map_err(|_| invalid()),
        "FLOAT" | "FLOAT64" => text.parse().map(Value::Float).map_err(|_| invalid()),
        "NUMERIC" | "BIGNUMERIC" => decode::decimal(text).ok_or_else(invalid),
        "BOOLEAN" | "BOOL" => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        _ => Ok(Value::String(text.to_string())),
    }
}

/// Runs queries against one BigQuery project.
pub struct BigQueryConnector {
    settings: BigQuerySettings,
    agent: Option<ureq::Agent>,
    source: Option<TokenSource>,
    token: Option<String>,
    fetched: Option<Instant>,
    kms_key: Option<String>,
}

impl BigQueryConnector {
    /// Create a connector. No request is made until the first query.
    pub fn new(settings: BigQuerySettings) -> Self {
        Self {
            settings,
            agent: None,
            source: None,
            token: None,
            fetched: None,
            kms_key: None,
        }
    }

    /// Resolved settings.
    pub fn settings(&self) -> &BigQuerySettings {
        &self.settings
    }

    fn queries_url(&self) -> String {
        format!(
            "{}/projects/{}/queries",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.project_id
        )
    }

    fn session(&mut self) -> Result<(ureq::Agent, String), ConnectorError> {
        if self.agent.is_none() {
            self.connect()?;
        }
        self.refresh_token()?;
        match (&self.agent, &self.token) {
            (Some(agent), Some(token)) => Ok((agent.clone(), token.clone())),
            _ => Err(ConnectorError::connection(BACKEND, "connection not open")),
        }
    }

    fn refresh_token(&mut self) -> Result<(), ConnectorError> {
        let (Some(source), Some(fetched)) = (&self.source, self.fetched) else {
            return Ok(());
        };
        if source.needs_refresh(fetched.elapsed()) {
            debug!("Refreshing BigQuery access token");
            self.token = Some(source.fetch()?);
            self.fetched = Some(Instant::now());
        }
        Ok(())
    }

    fn get_results(
        &self,
        agent: &ureq::Agent,
        token: &str,
        job_id: &str,
        location: &str,
        page_token: Option<&str>,
    ) -> Result<Json, ConnectorError> {
        let url = format!("{}/{}", self.queries_url(), job_id);
        let mut request = agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", token))
            .query("location", location)
            .query("timeoutMs", &POLL_WAIT_MS.to_string());
        if let Some(page_token) = page_token {
            request = request.query("pageToken", page_token);
        }
        read_json(request.call())
    }
}

impl Connector for BigQueryConnector {
    fn backend(&self) -> &str {
        BACKEND
    }

    fn connect(&mut self) -> Result<(), ConnectorError> {
        if self.agent.is_some() {
            return Ok(());
        }
        if self.settings.project_id.is_empty() {
            return Err(ConnectorError::configuration(BACKEND, "project_id is required"));
        }

        let source = token_source(&self.settings);
        info!("Using {}", source);
        let token = source.fetch()?;

        self.kms_key = encryption_key(&self.settings);
        self.agent = Some(
            ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(60))
                .build(),
        );
        self.token = Some(token);
        self.fetched = Some(Instant::now());
        self.source = Some(source);
        info!(
            "BigQuery connection established for {} in {}{}",
            self.settings.project_id,
            self.settings.location,
            if self.kms_key.is_some() { " (with encryption)" } else { "" }
        );
        Ok(())
    }

    fn execute_query(&mut self, query: &str) -> Result<Vec<Row>, ConnectorError> {
        let (agent, token) = self.session()?;
        debug!("Executing query: {}", query);

        let body = query_request(query, &self.settings, self.kms_key.as_deref());
        let mut response = read_json(
            agent
                .post(&self.queries_url())
                .set("Authorization", &format!("Bearer {}", token))
                .send_json(&body),
        )?;

        let job_id = response["jobReference"]["jobId"]
            .as_str()
            .map(str::to_string);
        let location = response["jobReference"]["location"]
            .as_str()
            .unwrap_or(&self.settings.location)
            .to_string();
        if let Some(job_id) = &job_id {
            info!("Query submitted, job ID: {}", job_id);
        }

        let started = Instant::now();
        while !response["jobComplete"].as_bool().unwrap_or(false) {
            let Some(job_id) = &job_id else {
                return Err(ConnectorError::query(BACKEND, "incomplete job has no job id"));
            };
            if started.elapsed() >= QUERY_TIMEOUT {
                return Err(ConnectorError::timeout(BACKEND, QUERY_TIMEOUT.as_secs()));
            }
            response = self.get_results(&agent, &token, job_id, &location, None)?;
        }

        let mut rows = decode_rows(&response)?;
        while let Some(page_token) = response["pageToken"].as_str().map(str::to_string) {
            let Some(job_id) = &job_id else {
                break;
            };
            response = self.get_results(&agent, &token, job_id, &location, Some(&page_token))?;
            rows.extend(decode_rows(&response)?);
        }

        info!("Query executed successfully, returned {} rows", rows.len());
        Ok(rows)
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        if self.agent.take().is_some() {
            self.token = None;
            self.source = None;
            self.fetched = None;
            info!("BigQuery connection closed");
        }
        Ok(())
    }
}

fn read_json(result: Result<ureq::Response, ureq::Error>) -> Result<Json, ConnectorError> {
    match result {
        Ok(response) => response
            .into_json()
            .map_err(|e| ConnectorError::query(BACKEND, format!("invalid response: {}", e))),
        Err(ureq::Error::Status(code, response)) => {
            let body: Json = response.into_json().unwrap_or(Json::Null);
            let message = body["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", code));
            if code == 401 || code == 403 {
                Err(ConnectorError::authentication(BACKEND, message))
            } else {
                Err(ConnectorError::query(BACKEND, message))
            }
        }
        Err(e) => Err(ConnectorError::connection(BACKEND, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GcpConfig;

    fn settings(project_id: &str, use_encryption: bool) -> BigQuerySettings {
        GcpConfig {
            project_id: project_id.to_string(),
            use_encryption,
            ..Default::default()
        }
        .resolve("mylocal")
    }

    #[test]
    fn test_phi_detection() {
        assert!(is_phi_project("acme-h-prod"));
        assert!(is_phi_project("acme-p-dev"));
        assert!(!is_phi_project("acme-prod"));
        assert!(!is_phi_project("acme-hp"));
    }

    #[test]
    fn test_encryption_key_only_for_encrypted_phi() {
        assert_eq!(
            encryption_key(&settings("acme-h-prod", true)).as_deref(),
            Some("projects/acme-h-prod/locations/us-central1/keyRings/infra-core-us-central1/cryptoKeys/infra-default-cmek")
        );
        assert_eq!(encryption_key(&settings("acme-h-prod", false)), None);
        assert_eq!(encryption_key(&settings("acme-prod", true)), None);
    }

    #[test]
    fn test_query_request_body() {
        let mut s = settings("acme-h-prod", true);
        s.dataset_id = Some("claims".to_string());
        let body = query_request("SELECT 1", &s, Some("key"));

        assert_eq!(body["query"], "SELECT 1");
        assert_eq!(body["useLegacySql"], false);
        assert_eq!(body["location"], "us-central1");
        assert_eq!(body["defaultDataset"]["datasetId"], "claims");
        assert_eq!(body["destinationEncryptionConfiguration"]["kmsKeyName"], "key");

        let plain = query_request("SELECT 1", &settings("acme", false), None);
        assert!(plain.get("destinationEncryptionConfiguration").is_none());
        assert!(plain.get("defaultDataset").is_none());
    }

    #[test]
    fn test_decode_rows_by_schema() {
        let response = json!({
            "jobComplete": true,
            "schema": {"fields": [
                {"name": "n", "type": "INTEGER"},
                {"name": "avg", "type": "FLOAT"},
                {"name": "ok", "type": "BOOLEAN"},
                {"name": "label", "type": "STRING"},
                {"name": "amount", "type": "NUMERIC"},
                {"name": "missing", "type": "INT64"},
                {"name": "total", "type": "BIGNUMERIC"}
            ]},
            "rows": [
                {"f": [
                    {"v": "42"}, {"v": "1.5"}, {"v": "true"}, {"v": "bcbsa"},
                    {"v": "10.25"}, {"v": null}, {"v": "9007199254740993"}
                ]}
            ]
        });
        let rows = decode_rows(&response).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get("n"), Some(&Value::Int(42)));
        assert_eq!(row.get("avg"), Some(&Value::Float(1.5)));
        assert_eq!(row.get("ok"), Some(&Value::Bool(true)));
        assert_eq!(row.get("label"), Some(&Value::from("bcbsa")));
        assert_eq!(row.get("amount"), Some(&Value::Float(10.25)));
        assert_eq!(row.get("missing"), Some(&Value::Null));
        assert_eq!(row.get("total"), Some(&Value::Int(9_007_199_254_740_993)));
    }

    #[test]
    fn test_numeric_beyond_float_precision_is_not_equal() {
        let response = json!({
            "schema": {"fields": [{"name": "n", "type": "NUMERIC"}]},
            "rows": [{"f": [{"v": "123456789012345678"}]}, {"f": [{"v": "123456789012345679"}]}]
        });
        let rows = decode_rows(&response).unwrap();
        assert_ne!(rows[0].get("n"), rows[1].get("n"));
    }

    #[test]
    fn test_decode_rows_without_rows() {
        let response = json!({"schema": {"fields": [{"name": "n", "type": "INTEGER"}]}});
        assert!(decode_rows(&response).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rows_bad_integer() {
        let response = json!({
            "schema": {"fields": [{"name": "n", "type": "INTEGER"}]},
            "rows": [{"f": [{"v": "forty"}]}]
        });
        assert!(matches!(
            decode_rows(&response),
            Err(ConnectorError::Query { .. })
        ));
    }

    #[test]
    fn test_connect_requires_project() {
        let mut conn = BigQueryConnector::new(settings("", false));
        assert!(matches!(
            conn.connect(),
            Err(ConnectorError::Configuration { .. })
        ));
    }

    #[test]
    fn test_configured_token_connects_without_request() {
        let mut s = settings("acme", false);
        s.access_token = Some("token".to_string());
        let mut conn = BigQueryConnector::new(s);
        conn.connect().unwrap();
        conn.close().unwrap();
        conn.close().unwrap();
    }
}
