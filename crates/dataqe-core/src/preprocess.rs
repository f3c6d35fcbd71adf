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

//! Release-label placeholder substitution.
//!
//! A template query keyed by `config_query_key` returns one row per data
//! source with its current and previous release labels. Test queries refer
//! to those labels through placeholders such as `BCBSA_CURR_WEEK`, which
//! [`Preprocessor::process_query`] rewrites before the query runs.

use crate::connector::{Connector, Row};
use crate::error::PreprocessError;
use crate::value::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Placeholder suffix replaced by the current release.
pub const CURRENT_WEEK_SUFFIX: &str = "_CURR_WEEK";

/// Placeholder suffix replaced by the previous release.
pub const PREVIOUS_WEEK_SUFFIX: &str = "_PREV_WEEK";

const CURRENT_COLUMNS: [&str; 2] = ["current_release", "curr_release_label"];
const PREVIOUS_COLUMNS: [&str; 2] = ["previous_release", "prev_release_label"];

/// Current and previous release labels of one data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleasePair {
    /// Label of the current release.
    pub current_release: Option<String>,
    /// Label of the previous release.
    pub previous_release: Option<String>,
}

impl ReleasePair {
    /// Create a pair with both labels set.
    pub fn new(current: impl Into<String>, previous: impl Into<String>) -> Self {
        Self {
            current_release: Some(current.into()),
            previous_release: Some(previous.into()),
        }
    }

    /// Both labels, if both are present.
    pub fn complete(&self) -> Option<(&str, &str)> {
        Some((
            self.current_release.as_deref()?,
            self.previous_release.as_deref()?,
        ))
    }
}

/// Source name to release labels.
pub type DatasetMapping = HashMap<String, ReleasePair>;

/// Rewrites placeholder queries using template queries keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    templates: HashMap<String, String>,
}

impl Preprocessor {
    /// Create a preprocessor over the given template queries.
    pub fn new(templates: HashMap<String, String>) -> Self {
        Self { templates }
    }

    /// A preprocessor with no templates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The template stored under `key`.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true when there are no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Run the template under `key` and collect the release labels of every
    /// source it returns.
    ///
    /// An unknown key yields an empty mapping. Rows without a `source`
    /// column are skipped; a later row for the same source replaces an
    /// earlier one.
    pub fn get_dataset_mappings(
        &self,
        key: &str,
        connector: &mut dyn Connector,
    ) -> Result<DatasetMapping, PreprocessError> {
        let Some(template) = self.template(key) else {
            warn!("No template query found for config_query_key '{}'", key);
            return Ok(DatasetMapping::new());
        };

        info!("Fetching dataset mappings with config_query_key '{}'", key);
        let rows = connector
            .execute_query(template)
            .map_err(|source| PreprocessError::Query {
                key: key.to_string(),
                source,
            })?;

        let mut mappings = DatasetMapping::new();
        for (index, row) in rows.iter().enumerate() {
            let Some(source) = row.get("source") else {
                continue;
            };
            let name = render(source).ok_or_else(|| PreprocessError::MalformedRow {
                key: key.to_string(),
                index,
                reason: "source is null".to_string(),
            })?;
            let pair = ReleasePair {
                current_release: first_label(row, &CURRENT_COLUMNS),
                previous_release: first_label(row, &PREVIOUS_COLUMNS),
            };
            debug!("Dataset mapping for '{}': {:?}", name, pair);
            mappings.insert(name, pair);
        }

        Ok(mappings)
    }

    /// Replace `<SOURCE>_CURR_WEEK` and `<SOURCE>_PREV_WEEK` in `query`,
    /// where `<SOURCE>` is `source_name` in upper case.
    ///
    /// The query is returned unchanged when the source has no complete
    /// entry in `mappings`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataqe_core::{DatasetMapping, Preprocessor, ReleasePair};
    ///
    /// let mut mappings = DatasetMapping::new();
    /// mappings.insert("bcbsa".to_string(), ReleasePair::new("bcbsa_export1", "bcbsa_export3"));
    ///
    /// let query = Preprocessor::empty().replace_placeholders_in_query(
    ///     "SELECT * FROM BCBSA_CURR_WEEK",
    ///     "bcbsa",
    ///     &mappings,
    /// );
    /// assert_eq!(query, "SELECT * FROM bcbsa_export1");
    /// ```
    pub fn replace_placeholders_in_query(
        &self,
        query: &str,
        source_name: &str,
        mappings: &DatasetMapping,
    ) -> String {
        let Some(pair) = mappings.get(source_name) else {
            debug!("No dataset mapping for source '{}'", source_name);
            return query.to_string();
        };
        let Some((current, previous)) = pair.complete() else {
            warn!("Incomplete dataset mapping for source '{}': {:?}", source_name, pair);
            return query.to_string();
        };

        let prefix = source_name.to_uppercase();
        let replaced = query
            .replace(&format!("{prefix}{CURRENT_WEEK_SUFFIX}"), current)
            .replace(&format!("{prefix}{PREVIOUS_WEEK_SUFFIX}"), previous);

        if replaced != query {
            debug!("Preprocessed query for '{}': {}", source_name, replaced);
        }
        replaced
    }

    /// Rewrite `query` for `source_name` using the template under `key`.
    ///
    /// Without a key the query is returned untouched and nothing runs on the
    /// connector.
    pub fn process_query(
        &self,
        query: &str,
        key: Option<&str>,
        source_name: Option<&str>,
        connector: &mut dyn Connector,
    ) -> Result<String, PreprocessError> {
        let Some(key) = key else {
            return Ok(query.to_string());
        };

        let mappings = self.get_dataset_mappings(key, connector)?;
        match source_name {
            Some(source_name) if !mappings.is_empty() => {
                Ok(self.replace_placeholders_in_query(query, source_name, &mappings))
            }
            _ => Ok(query.to_string()),
        }
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn first_label(row: &Row, columns: &[&str]) -> Option<String> {
    columns
        .iter()
        .filter_map(|column| row.get(column))
        .filter_map(render)
        .find(|label| !label.is_empty())
}
