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

//! Documents the configuration loaders must reject.

/// Invalid test scripts as (description, yaml) pairs.
pub fn invalid_test_scripts() -> Vec<(&'static str, &'static str)> {
    vec![
        ("not_a_sequence", "orders_count:\n  source:\n    query: SELECT 1\n"),
        (
            "two_keys_in_entry",
            "- a:\n    source:\n      query: SELECT 1\n  b:\n    source:\n      query: SELECT 2\n",
        ),
        ("scalar_entry", "- just_a_name\n"),
        (
            "condition_and_value",
            "- t:\n    source:\n      query: SELECT 1\n    target:\n      query: SELECT 1\n    comparisons:\n      threshold:\n        condition: \">\"\n        value: percentage\n        limit: 5\n",
        ),
        (
            "unknown_value",
            "- t:\n    source:\n      query: SELECT 1\n    comparisons:\n      threshold:\n        value: relative\n        limit: 5\n",
        ),
        (
            "unknown_condition",
            "- t:\n    source:\n      query: SELECT 1\n    comparisons:\n      threshold:\n        condition: \"=<\"\n",
        ),
        (
            "duplicate_names",
            "- t:\n    source:\n      query: SELECT 1\n- t:\n    source:\n      query: SELECT 2\n",
        ),
        ("missing_query", "- t:\n    source:\n      expected: \">0\"\n"),
    ]
}

/// Run configurations without a usable `config_block_*` entry.
pub fn invalid_configs() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "no_config_block",
            "settings:\n  other:\n    validation_script: tests.yml\n",
        ),
        (
            "no_validation_script",
            "config_block_x:\n  other:\n    preprocessor_queries: q.yml\n",
        ),
        (
            "unknown_database_type",
            "config_block_x:\n  source:\n    database_type: oracle\n  other:\n    validation_script: tests.yml\n",
        ),
    ]
}
