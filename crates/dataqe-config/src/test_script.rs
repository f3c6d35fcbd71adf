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

//! Test scripts: a YAML sequence of `- <name>: {...}` entries.

use crate::error::{ConfigError, ConfigResult};
use crate::file::read_file;
use dataqe_core::{Comparisons, QueryBlock, TestCase, ThresholdFields, ThresholdRule};
use serde::Deserialize;
use serde_yaml::Value as Yaml;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct RawTest {
    source: Option<RawBlock>,
    target: Option<RawBlock>,
    #[serde(default)]
    comparisons: RawComparisons,
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    query: String,
    expected: Option<Yaml>,
    config_query_key: Option<String>,
    source_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawComparisons {
    threshold: Option<RawThreshold>,
    comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawThreshold {
    condition: Option<String>,
    value: Option<String>,
    limit: Option<f64>,
}

impl From<RawBlock> for QueryBlock {
    fn from(raw: RawBlock) -> Self {
        QueryBlock {
            query: raw.query,
            // Only text can hold an `<op><number>` condition.
            expected: raw.expected.and_then(|v| v.as_str().map(str::to_string)),
            config_query_key: raw.config_query_key.filter(|k| !k.is_empty()),
            source_name: raw.source_name.filter(|s| !s.is_empty()),
        }
    }
}

/// Load and validate the test script at `path`.
pub fn load_test_cases(path: &Path) -> ConfigResult<Vec<TestCase>> {
    let text = read_file(path)?;
    let tests = parse_test_cases(&text).map_err(|e| match e {
        ConfigError::Yaml { message, .. } => ConfigError::yaml(path, message),
        other => other,
    })?;
    info!("Loaded {} tests from {}", tests.len(), path.display());
    Ok(tests)
}

/// Parse a test script.
///
/// Threshold blocks are resolved into [`ThresholdRule`]s here, so a script
/// with conflicting or unknown threshold settings is rejected before any
/// query runs.
///
/// ```
/// use dataqe_config::parse_test_cases;
/// use dataqe_core::ThresholdRule;
///
/// let tests = parse_test_cases(r#"
/// - orders_count:
///     source: { query: "SELECT COUNT(*) FROM orders" }
///     target: { query: "SELECT COUNT(*) FROM orders" }
///     comparisons:
///       threshold: { value: percentage, limit: 5 }
/// "#).unwrap();
///
/// assert_eq!(tests[0].name, "orders_count");
/// assert_eq!(tests[0].comparisons.threshold, ThresholdRule::Percentage { limit: 5.0 });
/// ```
pub fn parse_test_cases(text: &str) -> ConfigResult<Vec<TestCase>> {
    let document: Yaml =
        serde_yaml::from_str(text).map_err(|e| ConfigError::yaml("<inline>", e))?;

    let entries = match document {
        Yaml::Null => {
            warn!("Test script is empty");
            return Ok(Vec::new());
        }
        Yaml::Sequence(entries) => entries,
        _ => {
            return Err(ConfigError::yaml(
                "<inline>",
                "test script must be a sequence of `- <name>: {...}` entries",
            ))
        }
    };

    let mut seen = HashSet::new();
    let mut tests = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let test = parse_entry(index, entry)?;
        if !seen.insert(test.name.clone()) {
            return Err(ConfigError::DuplicateTest(test.name));
        }
        tests.push(test);
    }
    Ok(tests)
}

fn parse_entry(index: usize, entry: Yaml) -> ConfigResult<TestCase> {
    let Yaml::Mapping(mapping) = entry else {
        return Err(ConfigError::invalid_test(index, "entry must be a mapping"));
    };
    if mapping.len() != 1 {
        return Err(ConfigError::invalid_test(
            index,
            format!("entry must have exactly one key, found {}", mapping.len()),
        ));
    }
    let Some((key, body)) = mapping.into_iter().next() else {
        return Err(ConfigError::invalid_test(index, "entry is empty"));
    };
    let name = match key {
        Yaml::String(name) => name,
        other => {
            return Err(ConfigError::invalid_test(
                index,
                format!("test name must be a string, found {:?}", other),
            ))
        }
    };

    let raw: RawTest = serde_yaml::from_value(body)
        .map_err(|e| ConfigError::invalid_test(index, format!("{}: {}", name, e)))?;

    let threshold = match raw.comparisons.threshold {
        Some(t) => {
            let fields = ThresholdFields {
                condition: t.condition,
                value: t.value,
                limit: t.limit,
            };
            ThresholdRule::from_fields(&fields).map_err(|source| ConfigError::Threshold {
                test: name.clone(),
                source,
            })?
        }
        None => ThresholdRule::None,
    };

    Ok(TestCase {
        name,
        source: raw.source.map(QueryBlock::from),
        target: raw.target.map(QueryBlock::from),
        comparisons: Comparisons {
            threshold,
            comment: raw.comparisons.comment,
        },
        severity: raw.severity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataqe_core::Operator;

    #[test]
    fn test_parse_all_modes() {
        let text = r#"
- pct:
    severity: critical
    source: { query: "SELECT 1" }
    target: { query: "SELECT 1" }
    comparisons:
      threshold: { value: percentage, limit: 5 }
      comment: within five percent
- abs:
    source: { query: "SELECT 1" }
    target: { query: "SELECT 1" }
    comparisons:
      threshold: { value: absolute, limit: 0.5 }
- cond:
    source: { query: "SELECT 1" }
    target: { query: "SELECT 1" }
    comparisons:
      threshold: { condition: ">=" }
- only:
    source: { query: "SELECT 1", expected: "<=2" }
"#;
        let tests = parse_test_cases(text).unwrap();
        assert_eq!(tests.len(), 4);
        assert_eq!(
            tests[0].comparisons.threshold,
            ThresholdRule::Percentage { limit: 5.0 }
        );
        assert_eq!(tests[0].comparisons.comment.as_deref(), Some("within five percent"));
        assert!(tests[0].is_critical());
        assert_eq!(
            tests[1].comparisons.threshold,
            ThresholdRule::Absolute { limit: 0.5 }
        );
        assert_eq!(
            tests[2].comparisons.threshold,
            ThresholdRule::Condition(Operator::GreaterOrEqual)
        );
        assert_eq!(tests[3].comparisons.threshold, ThresholdRule::None);
        assert!(tests[3].target.is_none());
        assert!(tests[3].source.as_ref().unwrap().expected_condition().is_some());
    }

    #[test]
    fn test_placeholder_fields() {
        let text = r#"
- weekly:
    source: { query: "SELECT 1" }
    target:
      query: SELECT * FROM BCBSA_CURR_WEEK
      config_query_key: weekly_releases
      source_name: bcbsa
"#;
        let tests = parse_test_cases(text).unwrap();
        let target = tests[0].target.as_ref().unwrap();
        assert_eq!(target.config_query_key.as_deref(), Some("weekly_releases"));
        assert_eq!(target.source_name.as_deref(), Some("bcbsa"));
    }

    #[test]
    fn test_non_string_expected_is_no_condition() {
        let tests = parse_test_cases("- t:\n    source: { query: \"SELECT 1\", expected: 5 }\n").unwrap();
        assert_eq!(tests[0].source.as_ref().unwrap().expected, None);
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_test_cases("").unwrap().is_empty());
    }

    #[test]
    fn test_threshold_error_carries_test_name() {
        let text = "- bad:\n    source: { query: \"SELECT 1\" }\n    comparisons:\n      threshold: { condition: \"~\" }\n";
        let err = parse_test_cases(text).unwrap_err();
        assert!(matches!(err, ConfigError::Threshold { ref test, .. } if test == "bad"));
    }

    #[test]
    fn test_entry_with_two_keys() {
        let text = "- a:\n    source: { query: \"SELECT 1\" }\n  b:\n    source: { query: \"SELECT 2\" }\n";
        let err = parse_test_cases(text).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTest { index: 0, .. }));
    }
}
