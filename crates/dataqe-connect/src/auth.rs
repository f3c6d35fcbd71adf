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


//! OAuth token resolution for BigQuery.
//!
//! An explicit token wins, then [`ACCESS_TOKEN_ENV`], then a service-account
//! key file, then application-default credentials.

use crate::config::BigQuerySettings;
use dataqe_core::ConnectorError;
use gcp_auth::{CustomServiceAccount, Token, TokenProvider};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const BACKEND: &str = "bigquery";

/// Environment variable consulted when no `access_token` is configured.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// OAuth scope requested for query jobs.
pub const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

/// Age after which a fetched token is replaced. Google tokens live an hour.
pub const TOKEN_REFRESH: Duration = Duration::from_secs(45 * 60);

/// Where the bearer token for BigQuery requests comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// A token supplied by configuration or environment.
    Static(String),
    /// A service-account JSON key file.
    ServiceAccount(PathBuf),
    /// Application-default credentials: `GOOGLE_APPLICATION_CREDENTIALS`,
    /// the gcloud user config, or the metadata server.
    ApplicationDefault,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Static(_) => write!(f, "configured access token"),
            TokenSource::ServiceAccount(path) => {
                write!(f, "service account credentials from {}", path.display())
            }
            TokenSource::ApplicationDefault => write!(f, "default application credentials"),
        }
    }
}

/// Pick the token source for `settings`, reading [`ACCESS_TOKEN_ENV`].
pub fn token_source(settings: &BigQuerySettings) -> TokenSource {
    select_source(settings, std::env::var(ACCESS_TOKEN_ENV).ok())
}

fn select_source(settings: &BigQuerySettings, env_token: Option<String>) -> TokenSource {
    if let Some(token) = settings.access_token.clone().filter(|t| !t.is_empty()) {
        return TokenSource::Static(token);
    }
    if let Some(token) = env_token.filter(|t| !t.is_empty()) {
        return TokenSource::Static(token);
    }
    match &settings.credentials_path {
        Some(path) if path.exists() => TokenSource::ServiceAccount(path.clone()),
        Some(path) => {
            warn!(
                "Credentials file {} not found, using default application credentials",
                path.display()
            );
            TokenSource::ApplicationDefault
        }
        None => TokenSource::ApplicationDefault,
    }
}

impl TokenSource {
    /// Returns true when a token of this age should be fetched again.
    /// Static tokens are never refreshed.
    pub fn needs_refresh(&self, age: Duration) -> bool {
        !matches!(self, TokenSource::Static(_)) && age >= TOKEN_REFRESH
    }

    /// Produce a bearer token, contacting Google's token endpoint for the
    /// service-account and application-default sources.
    pub fn fetch(&self) -> Result<String, ConnectorError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount(path) => {
                let account = CustomServiceAccount::from_file(path).map_err(|e| {
                    ConnectorError::authentication(BACKEND, format!("{}: {}", path.display(), e))
                })?;
                block_on(async move { account.token(&[BIGQUERY_SCOPE]).await })
            }
            TokenSource::ApplicationDefault => block_on(async {
                let provider = gcp_auth::provider().await?;
                provider.token(&[BIGQUERY_SCOPE]).await
            }),
        }
    }
}

fn block_on<F>(future: F) -> Result<String, ConnectorError>
where
    F: Future<Output = Result<Arc<Token>, gcp_auth::Error>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ConnectorError::authentication(BACKEND, e.to_string()))?;
    let token = runtime
        .block_on(future)
        .map_err(|e| ConnectorError::authentication(BACKEND, e.to_string()))?;
    Ok(token.as_str().to_string())
}
