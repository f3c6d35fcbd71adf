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

//! The comparison rule engine.
//!
//! [`compare_values`] turns a source value, an optional target value and a
//! test's comparison rules into a [`Status`]. It never returns
//! [`Status::Invalid`]; a comparison that cannot be computed (text against a
//! number, division by a zero target) is logged and judged a failure.

use crate::result::Status;
use crate::test_case::TestCase;
use crate::threshold::ThresholdRule;
use crate::value::Value;
use tracing::{debug, warn};

/// Judge a test.
///
/// Without a target value the source is checked against the source block's
/// `expected` condition, falling back to [`Value::is_truthy`] when there is
/// no parsable condition. With a target value, equal values pass; otherwise
/// the test's [`ThresholdRule`] decides.
///
/// # Examples
///
/// ```
/// use dataqe_core::{compare_values, Status, TestCase, ThresholdRule, Value};
///
/// let test = TestCase::new("orders")
///     .with_threshold(ThresholdRule::Percentage { limit: 5.0 });
///
/// assert_eq!(compare_values(&Value::Int(104), Some(&Value::Int(100)), &test), Status::Pass);
/// assert_eq!(compare_values(&Value::Int(110), Some(&Value::Int(100)), &test), Status::Fail);
/// ```
pub fn compare_values(source: &Value, target: Option<&Value>, test: &TestCase) -> Status {
    match target {
        None => check_source_only(source, test),
        Some(target) => check_against_target(source, target, &test.comparisons.threshold),
    }
}

fn check_source_only(source: &Value, test: &TestCase) -> Status {
    let condition = test.source.as_ref().and_then(|block| block.expected_condition());

    match condition {
        Some(condition) => {
            let status = Status::from_bool(condition.evaluate(source));
            debug!("Source value {} {}: {}", source, condition, status);
            status
        }
        None => Status::from_bool(source.is_truthy()),
    }
}

fn check_against_target(source: &Value, target: &Value, rule: &ThresholdRule) -> Status {
    if source == target {
        return Status::Pass;
    }

    match *rule {
        // The condition describes a disallowed relationship.
        ThresholdRule::Condition(op) => {
            let status = Status::from_bool(!op.apply(source, target));
            debug!("Source {} {} Target {}: {}", source, op, target, status);
            status
        }
        ThresholdRule::Percentage { limit } => {
            let Some((s, t)) = numeric_pair(source, target) else {
                warn!(
                    "Cannot calculate percentage threshold for {} vs {}",
                    source, target
                );
                return Status::Fail;
            };
            if t == 0.0 {
                debug!("Target is 0 and values differ, percentage is undefined: FAIL");
                return Status::Fail;
            }
            let diff = ((s - t) / t).abs() * 100.0;
            let status = Status::from_bool(diff <= limit);
            debug!("Percentage diff {}% vs limit {}%: {}", diff, limit, status);
            status
        }
        ThresholdRule::Absolute { limit } => {
            let Some((s, t)) = numeric_pair(source, target) else {
                warn!(
                    "Cannot calculate absolute threshold for {} vs {}",
                    source, target
                );
                return Status::Fail;
            };
            let diff = (s - t).abs();
            let status = Status::from_bool(diff <= limit);
            debug!("Absolute diff {} vs limit {}: {}", diff, limit, status);
            status
        }
        ThresholdRule::None => Status::Fail,
    }
}

fn numeric_pair(source: &Value, target: &Value) -> Option<(f64, f64)> {
    Some((source.as_f64()?, target.as_f64()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Operator;
    use crate::test_case::QueryBlock;

    fn source_only(expected: Option<&str>) -> TestCase {
        let mut block = QueryBlock::new("SELECT COUNT(*) FROM t");
        block.expected = expected.map(str::to_string);
        TestCase::new("source_only").with_source(block)
    }

    fn with_rule(rule: ThresholdRule) -> TestCase {
        TestCase::new("paired")
            .with_source(QueryBlock::new("SELECT 1"))
            .with_target(QueryBlock::new("SELECT 1"))
            .with_threshold(rule)
    }

    #[test]
    fn test_source_only_condition() {
        let test = source_only(Some("<=2"));
        assert_eq!(compare_values(&Value::Int(2), None, &test), Status::Pass);
        assert_eq!(compare_values(&Value::Int(3), None, &test), Status::Fail);
        assert_eq!(compare_values(&Value::Float(1.5), None, &test), Status::Pass);
    }

    #[test]
    fn test_source_only_condition_on_text_fails() {
        let test = source_only(Some(">0"));
        assert_eq!(compare_values(&Value::from("5"), None, &test), Status::Fail);
        assert_eq!(compare_values(&Value::Null, None, &test), Status::Fail);
    }

    #[test]
    fn test_source_only_truthiness_fallback() {
        for test in [source_only(None), source_only(Some("non-empty"))] {
            assert_eq!(compare_values(&Value::Int(1), None, &test), Status::Pass);
            assert_eq!(compare_values(&Value::from("x"), None, &test), Status::Pass);
            assert_eq!(compare_values(&Value::Int(0), None, &test), Status::Fail);
            assert_eq!(compare_values(&Value::from(""), None, &test), Status::Fail);
            assert_eq!(compare_values(&Value::Null, None, &test), Status::Fail);
        }
    }

    #[test]
    fn test_equal_values_pass_regardless_of_rule() {
        for rule in [
            ThresholdRule::None,
            ThresholdRule::Condition(Operator::Equal),
            ThresholdRule::Percentage { limit: 0.0 },
            ThresholdRule::Absolute { limit: -1.0 },
        ] {
            let test = with_rule(rule);
            assert_eq!(
                compare_values(&Value::Int(10), Some(&Value::Float(10.0)), &test),
                Status::Pass
            );
            assert_eq!(
                compare_values(&Value::from("a"), Some(&Value::from("a")), &test),
                Status::Pass
            );
            assert_eq!(compare_values(&Value::Null, Some(&Value::Null), &test), Status::Pass);
        }
    }

    #[test]
    fn test_mismatch_without_rule_fails() {
        let test = with_rule(ThresholdRule::None);
        assert_eq!(compare_values(&Value::Int(1), Some(&Value::Int(2)), &test), Status::Fail);
    }

    #[test]
    fn test_condition_is_inverted() {
        let test = with_rule(ThresholdRule::Condition(Operator::Greater));
        assert_eq!(compare_values(&Value::Int(5), Some(&Value::Int(3)), &test), Status::Fail);
        assert_eq!(compare_values(&Value::Int(2), Some(&Value::Int(3)), &test), Status::Pass);
    }

    #[test]
    fn test_condition_on_incomparable_values_passes() {
        // The disallowed relationship cannot hold between text and a number.
        let test = with_rule(ThresholdRule::Condition(Operator::Greater));
        assert_eq!(
            compare_values(&Value::from("5"), Some(&Value::Int(3)), &test),
            Status::Pass
        );
    }

    #[test]
    fn test_percentage() {
        let test = with_rule(ThresholdRule::Percentage { limit: 5.0 });
        assert_eq!(compare_values(&Value::Int(100), Some(&Value::Int(100)), &test), Status::Pass);
        assert_eq!(compare_values(&Value::Int(110), Some(&Value::Int(100)), &test), Status::Fail);
        assert_eq!(compare_values(&Value::Int(104), Some(&Value::Int(100)), &test), Status::Pass);
        assert_eq!(compare_values(&Value::Int(95), Some(&Value::Int(100)), &test), Status::Pass);
        assert_eq!(compare_values(&Value::Int(-104), Some(&Value::Int(-100)), &test), Status::Pass);
    }

    #[test]
    fn test_percentage_zero_target() {
        let test = with_rule(ThresholdRule::Percentage { limit: 100.0 });
        assert_eq!(compare_values(&Value::Int(1), Some(&Value::Int(0)), &test), Status::Fail);
        assert_eq!(compare_values(&Value::Int(0), Some(&Value::Float(0.0)), &test), Status::Pass);
    }

    #[test]
    fn test_percentage_non_numeric() {
        let test = with_rule(ThresholdRule::Percentage { limit: 5.0 });
        assert_eq!(compare_values(&Value::from("100"), Some(&Value::Int(100)), &test), Status::Fail);
        assert_eq!(compare_values(&Value::Null, Some(&Value::Int(100)), &test), Status::Fail);
    }

    #[test]
    fn test_absolute() {
        let test = with_rule(ThresholdRule::Absolute { limit: 5.0 });
        assert_eq!(compare_values(&Value::Int(10), Some(&Value::Int(7)), &test), Status::Pass);
        assert_eq!(compare_values(&Value::Int(10), Some(&Value::Int(3)), &test), Status::Fail);
        assert_eq!(compare_values(&Value::Int(10), Some(&Value::Int(5)), &test), Status::Pass);
        assert_eq!(compare_values(&Value::Float(0.5), Some(&Value::Float(5.75)), &test), Status::Fail);
    }

    #[test]
    fn test_absolute_non_numeric() {
        let test = with_rule(ThresholdRule::Absolute { limit: 5.0 });
        assert_eq!(compare_values(&Value::from("a"), Some(&Value::from("b")), &test), Status::Fail);
    }

    #[test]
    fn test_expected_is_ignored_when_target_present() {
        let test = source_only(Some(">0")).with_target(QueryBlock::new("SELECT 2"));
        assert_eq!(compare_values(&Value::Int(1), Some(&Value::Int(2)), &test), Status::Fail);
    }
}
