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

//! Fluent builder for test cases.

use dataqe_core::{Operator, QueryBlock, Side, TestCase, ThresholdRule, CRITICAL_SEVERITY};

/// Builder for [`TestCase`] fixtures.
///
/// # Examples
///
/// ```
/// use dataqe_test::fixtures::builders::TestCaseBuilder;
/// use dataqe_core::ThresholdRule;
///
/// let test = TestCaseBuilder::new("orders")
///     .source("SELECT 1")
///     .target("SELECT 1")
///     .absolute(2.0)
///     .build();
///
/// assert_eq!(test.comparisons.threshold, ThresholdRule::Absolute { limit: 2.0 });
/// ```
#[derive(Debug, Clone)]
pub struct TestCaseBuilder {
    test: TestCase,
}

impl TestCaseBuilder {
    /// Start a test case with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            test: TestCase::new(name),
        }
    }

    /// Set the source query.
    pub fn source(mut self, query: impl Into<String>) -> Self {
        self.test.source = Some(QueryBlock::new(query));
        self
    }

    /// Set the target query.
    pub fn target(mut self, query: impl Into<String>) -> Self {
        self.test.target = Some(QueryBlock::new(query));
        self
    }

    /// Set the source block's expected condition.
    ///
    /// Creates an empty source block if none was set.
    pub fn expect(mut self, expected: impl Into<String>) -> Self {
        let block = self.test.source.get_or_insert_with(QueryBlock::default);
        block.expected = Some(expected.into());
        self
    }

    /// Enable placeholder replacement on one side.
    ///
    /// Creates an empty block on that side if none was set.
    pub fn placeholders(
        mut self,
        side: Side,
        config_query_key: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        let slot = match side {
            Side::Source => &mut self.test.source,
            Side::Target => &mut self.test.target,
        };
        let block = slot.get_or_insert_with(QueryBlock::default);
        block.config_query_key = Some(config_query_key.into());
        block.source_name = Some(source_name.into());
        self
    }

    /// Use an explicit threshold rule.
    pub fn threshold(mut self, rule: ThresholdRule) -> Self {
        self.test.comparisons.threshold = rule;
        self
    }

    /// Tolerate a relative difference of `limit` percent.
    pub fn percentage(self, limit: f64) -> Self {
        self.threshold(ThresholdRule::Percentage { limit })
    }

    /// Tolerate an absolute difference of `limit`.
    pub fn absolute(self, limit: f64) -> Self {
        self.threshold(ThresholdRule::Absolute { limit })
    }

    /// Fail when `source <op> target` holds.
    pub fn condition(self, op: Operator) -> Self {
        self.threshold(ThresholdRule::Condition(op))
    }

    /// Set the comparison comment.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.test.comparisons.comment = Some(comment.into());
        self
    }

    /// Set the severity tag.
    pub fn severity(mut self, severity: impl Into<String>) -> Self {
        self.test.severity = Some(severity.into());
        self
    }

    /// Tag the test `critical`.
    pub fn critical(self) -> Self {
        self.severity(CRITICAL_SEVERITY)
    }

    /// Finish the test case.
    pub fn build(self) -> TestCase {
        self.test
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_before_source_keeps_expected() {
        let test = TestCaseBuilder::new("t").expect(">0").build();
        let block = test.source.unwrap();
        assert_eq!(block.query, "");
        assert_eq!(block.expected.as_deref(), Some(">0"));
    }

    #[test]
    fn test_placeholders_on_target() {
        let test = TestCaseBuilder::new("t")
            .target("SELECT * FROM X_CURR_WEEK")
            .placeholders(Side::Target, "weeks", "x")
            .build();
        let block = test.target.unwrap();
        assert_eq!(block.query, "SELECT * FROM X_CURR_WEEK");
        assert_eq!(block.config_query_key.as_deref(), Some("weeks"));
        assert_eq!(block.source_name.as_deref(), Some("x"));
        assert!(test.source.is_none());
    }

    #[test]
    fn test_critical() {
        assert!(TestCaseBuilder::new("t").critical().build().is_critical());
    }
}
