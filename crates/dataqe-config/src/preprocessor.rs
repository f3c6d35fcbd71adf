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

//! Template queries for placeholder preprocessing.

use crate::error::{ConfigError, ConfigResult};
use crate::file::read_file;
use dataqe_core::Preprocessor;
use serde_yaml::Value as Yaml;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Load the `key: query` map at `path`.
///
/// A missing file yields an empty map and a warning. An unreadable or
/// malformed file is an error.
pub fn load_preprocessor_queries(path: &Path) -> ConfigResult<HashMap<String, String>> {
    if !path.exists() {
        warn!("Preprocessor queries file not found: {}", path.display());
        return Ok(HashMap::new());
    }

    let text = read_file(path)?;
    let queries = parse_preprocessor_queries(&text).map_err(|e| match e {
        ConfigError::Yaml { message, .. } => ConfigError::yaml(path, message),
        other => other,
    })?;
    info!(
        "Loaded {} preprocessor queries from {}",
        queries.len(),
        path.display()
    );
    Ok(queries)
}

/// Parse a `key: query` document. An empty document is an empty map.
pub fn parse_preprocessor_queries(text: &str) -> ConfigResult<HashMap<String, String>> {
    let document: Yaml =
        serde_yaml::from_str(text).map_err(|e| ConfigError::yaml("<inline>", e))?;

    let mapping = match document {
        Yaml::Null => return Ok(HashMap::new()),
        Yaml::Mapping(mapping) => mapping,
        _ => {
            return Err(ConfigError::yaml(
                "<inline>",
                "preprocessor queries must be a mapping of key to query",
            ))
        }
    };

    mapping
        .into_iter()
        .map(|(key, value)| match (key, value) {
            (Yaml::String(key), Yaml::String(query)) => Ok((key, query)),
            (key, _) => Err(ConfigError::yaml(
                "<inline>",
                format!("preprocessor query {:?} must be a string", key),
            )),
        })
        .collect()
}

/// Build a [`Preprocessor`] from the template file at `path`.
pub fn load_preprocessor(path: &Path) -> ConfigResult<Preprocessor> {
    load_preprocessor_queries(path).map(Preprocessor::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_queries() {
        let queries = parse_preprocessor_queries(
            "weekly: SELECT * FROM releases\nfolded: >\n  SELECT source\n  FROM labels\n",
        )
        .unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries["weekly"], "SELECT * FROM releases");
        assert_eq!(queries["folded"], "SELECT source FROM labels\n");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_preprocessor_queries("").unwrap().is_empty());
    }

    #[test]
    fn test_non_string_query_is_error() {
        assert!(parse_preprocessor_queries("weekly: [1, 2]\n").is_err());
        assert!(parse_preprocessor_queries("- a\n- b\n").is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let pre = load_preprocessor(&dir.path().join("absent.yml")).unwrap();
        assert!(pre.is_empty());
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("q.yml");
        std::fs::write(&path, "weekly: [unclosed\n").unwrap();
        let err = load_preprocessor_queries(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { path: ref p, .. } if p == &path));
    }
}
