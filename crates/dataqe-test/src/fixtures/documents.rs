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

//! YAML documents accepted by the configuration loaders.

/// Test script exercising every threshold mode and a source-only check.
pub const TEST_SCRIPT: &str = r#"
- orders_count:
    severity: critical
    source:
      query: SELECT COUNT(*) FROM orders
    target:
      query: SELECT COUNT(*) FROM orders
    comparisons:
      threshold:
        value: percentage
        limit: 5
      comment: row counts within 5%

- revenue_total:
    source:
      query: SELECT SUM(amount) FROM payments
    target:
      query: SELECT SUM(amount) FROM payments
    comparisons:
      threshold:
        value: absolute
        limit: 0.5

- no_extra_rows:
    severity: high
    source:
      query: SELECT COUNT(*) FROM members
    target:
      query: SELECT COUNT(*) FROM members
    comparisons:
      threshold:
        condition: ">"

- duplicate_keys:
    source:
      query: SELECT COUNT(*) - COUNT(DISTINCT id) FROM members
      expected: "<=2"
"#;

/// Test script whose target query uses release placeholders.
pub const PLACEHOLDER_SCRIPT: &str = r#"
- weekly_claims:
    source:
      query: SELECT COUNT(*) FROM claims
    target:
      query: SELECT COUNT(*) FROM BCBSA_CURR_WEEK
      config_query_key: weekly_releases
      source_name: bcbsa
"#;

/// Template queries keyed by `config_query_key`.
pub const PREPROCESSOR_QUERIES: &str = r#"
weekly_releases: >
  SELECT source, current_release, previous_release FROM releases
labelled_releases: >
  SELECT source, curr_release_label, prev_release_label FROM release_labels
"#;

/// Run configuration for two SQLite files, referenced by relative path.
pub const SQLITE_CONFIG: &str = r#"
config_block_local:
  source:
    database_type: sqlite
    sqlite:
      path: source.db
  target:
    database_type: sqlite
    sqlite:
      path: target.db
  other:
    validation_script: tests.yml
    preprocessor_queries: preprocessor_queries.yml
"#;

/// Run configuration whose values come from environment variables.
pub const ENV_CONFIG: &str = r#"
config_block_env:
  source:
    database_type: gcpbq
    gcp:
      project_id: ${DATAQE_TEST_PROJECT}
      dataset_id: ${DATAQE_TEST_DATASET:analytics}
      use_encryption: true
  other:
    validation_script: ${DATAQE_TEST_SCRIPT:tests.yml}
"#;
