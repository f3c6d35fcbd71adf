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

//! Test case definitions.

use crate::condition::Condition;
use crate::threshold::ThresholdRule;
use std::fmt;

/// Severity tag counted separately in run summaries.
pub const CRITICAL_SEVERITY: &str = "critical";

/// Which system a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The reference system.
    Source,
    /// The system under validation.
    Target,
}

impl Side {
    /// Lowercase name of the side.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query to run on one side of a test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBlock {
    /// The SQL text, possibly containing `<SOURCE>_CURR_WEEK` style placeholders.
    pub query: String,
    /// Expected condition for source-only tests (e.g. `"<=2"`).
    pub expected: Option<String>,
    /// Key of the template query producing dataset mappings.
    pub config_query_key: Option<String>,
    /// Source name whose placeholders should be replaced.
    pub source_name: Option<String>,
}

impl QueryBlock {
    /// Create a block for the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the expected condition.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Enable placeholder replacement using the template stored under `key`
    /// and the mapping entry for `source_name`.
    pub fn with_placeholders(
        mut self,
        config_query_key: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        self.config_query_key = Some(config_query_key.into());
        self.source_name = Some(source_name.into());
        self
    }

    /// The expected condition, if `expected` is a valid `<op><number>` string.
    pub fn expected_condition(&self) -> Option<Condition> {
        self.expected.as_deref().and_then(Condition::parse)
    }
}

/// How source and target values are compared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparisons {
    /// Tolerance applied when the values differ.
    pub threshold: ThresholdRule,
    /// Free-text description of the comparison.
    pub comment: Option<String>,
}

/// One declared validation test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// Unique name within a run.
    pub name: String,
    /// Query against the reference system.
    pub source: Option<QueryBlock>,
    /// Query against the system under validation.
    pub target: Option<QueryBlock>,
    /// Comparison rules.
    pub comparisons: Comparisons,
    /// Severity tag such as `"critical"`.
    pub severity: Option<String>,
}

impl TestCase {
    /// Create a test case with no queries.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
            target: None,
            comparisons: Comparisons::default(),
            severity: None,
        }
    }

    /// Set the source block.
    pub fn with_source(mut self, block: QueryBlock) -> Self {
        self.source = Some(block);
        self
    }

    /// Set the target block.
    pub fn with_target(mut self, block: QueryBlock) -> Self {
        self.target = Some(block);
        self
    }

    /// Set the threshold rule.
    pub fn with_threshold(mut self, threshold: ThresholdRule) -> Self {
        self.comparisons.threshold = threshold;
        self
    }

    /// Set the comparison comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comparisons.comment = Some(comment.into());
        self
    }

    /// Set the severity tag.
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// The query block for a side.
    pub fn block(&self, side: Side) -> Option<&QueryBlock> {
        match side {
            Side::Source => self.source.as_ref(),
            Side::Target => self.target.as_ref(),
        }
    }

    /// Returns true if the severity tag is `critical` (case-insensitive).
    pub fn is_critical(&self) -> bool {
        is_critical(self.severity.as_deref())
    }
}

/// Returns true if a severity tag is `critical` (case-insensitive).
pub fn is_critical(severity: Option<&str>) -> bool {
    severity.is_some_and(|s| s.eq_ignore_ascii_case(CRITICAL_SEVERITY))
}
