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

//! Threshold rules for source/target mismatches.

use crate::condition::Operator;
use crate::error::{CoreError, CoreResult};
use std::fmt;

/// Threshold fields exactly as written in a test script.
///
/// Which rule applies depends on which fields are populated; use
/// [`ThresholdRule::from_fields`] to resolve them once at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdFields {
    /// Operator token describing a disallowed source/target relationship.
    pub condition: Option<String>,
    /// Tolerance kind: `"percentage"` or `"absolute"`.
    pub value: Option<String>,
    /// Tolerance limit for the percentage and absolute kinds.
    pub limit: Option<f64>,
}

/// How a mismatch between source and target is judged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ThresholdRule {
    /// No tolerance: any mismatch fails.
    #[default]
    None,
    /// Fail when `source <op> target` holds.
    Condition(Operator),
    /// Pass when `|source - target| / |target| * 100 <= limit`.
    Percentage {
        /// Maximum relative difference, in percent.
        limit: f64,
    },
    /// Pass when `|source - target| <= limit`.
    Absolute {
        /// Maximum absolute difference.
        limit: f64,
    },
}

impl ThresholdRule {
    /// Resolve raw threshold fields into a single rule.
    ///
    /// - `condition` alone selects [`ThresholdRule::Condition`].
    /// - `value: percentage|absolute` with a `limit` selects the tolerance
    ///   rule; without a limit no rule applies.
    /// - Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidThreshold`] when both `condition` and
    /// `value` are set, when `value` names an unknown kind, or when `limit`
    /// is not finite, and [`CoreError::UnknownOperator`] for a bad
    /// condition token.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataqe_core::{ThresholdRule, ThresholdFields};
    ///
    /// let fields = ThresholdFields {
    ///     value: Some("percentage".to_string()),
    ///     limit: Some(5.0),
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     ThresholdRule::from_fields(&fields).unwrap(),
    ///     ThresholdRule::Percentage { limit: 5.0 }
    /// );
    /// ```
    pub fn from_fields(fields: &ThresholdFields) -> CoreResult<Self> {
        let condition = non_empty(fields.condition.as_deref());
        let value = non_empty(fields.value.as_deref());

        if let Some(limit) = fields.limit {
            if !limit.is_finite() {
                return Err(CoreError::invalid_threshold(format!(
                    "limit must be a finite number, got {}",
                    limit
                )));
            }
        }

        match (condition, value) {
            (Some(condition), Some(value)) => Err(CoreError::invalid_threshold(format!(
                "condition '{}' and value '{}' cannot be combined; use either a condition or a percentage/absolute limit",
                condition, value
            ))),
            (Some(condition), None) => Ok(ThresholdRule::Condition(condition.parse()?)),
            (None, Some(value)) => {
                let Some(limit) = fields.limit else {
                    return Ok(ThresholdRule::None);
                };
                match value {
                    "percentage" => Ok(ThresholdRule::Percentage { limit }),
                    "absolute" => Ok(ThresholdRule::Absolute { limit }),
                    other => Err(CoreError::invalid_threshold(format!(
                        "unknown threshold value '{}' (expected 'percentage' or 'absolute')",
                        other
                    ))),
                }
            }
            (None, None) => Ok(ThresholdRule::None),
        }
    }

    /// Returns true when no tolerance or condition applies.
    pub fn is_none(&self) -> bool {
        matches!(self, ThresholdRule::None)
    }
}

impl TryFrom<&ThresholdFields> for ThresholdRule {
    type Error = CoreError;

    fn try_from(fields: &ThresholdFields) -> CoreResult<Self> {
        ThresholdRule::from_fields(fields)
    }
}

impl fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdRule::None => write!(f, "exact match"),
            ThresholdRule::Condition(op) => write!(f, "fail when source {} target", op),
            ThresholdRule::Percentage { limit } => write!(f, "within {}%", limit),
            ThresholdRule::Absolute { limit } => write!(f, "within {}", limit),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(condition: Option<&str>, value: Option<&str>, limit: Option<f64>) -> ThresholdFields {
        ThresholdFields {
            condition: condition.map(str::to_string),
            value: value.map(str::to_string),
            limit,
        }
    }

    #[test]
    fn test_empty_fields_is_none() {
        assert_eq!(
            ThresholdRule::from_fields(&ThresholdFields::default()),
            Ok(ThresholdRule::None)
        );
    }

    #[test]
    fn test_condition_mode() {
        assert_eq!(
            ThresholdRule::from_fields(&fields(Some(">"), None, None)),
            Ok(ThresholdRule::Condition(Operator::Greater))
        );
        // A stray limit does not change the mode.
        assert_eq!(
            ThresholdRule::from_fields(&fields(Some("<="), None, Some(3.0))),
            Ok(ThresholdRule::Condition(Operator::LessOrEqual))
        );
    }

    #[test]
    fn test_tolerance_modes() {
        assert_eq!(
            ThresholdRule::from_fields(&fields(None, Some("percentage"), Some(5.0))),
            Ok(ThresholdRule::Percentage { limit: 5.0 })
        );
        assert_eq!(
            ThresholdRule::from_fields(&fields(None, Some("absolute"), Some(0.0))),
            Ok(ThresholdRule::Absolute { limit: 0.0 })
        );
    }

    #[test]
    fn test_tolerance_without_limit_is_none() {
        assert_eq!(
            ThresholdRule::from_fields(&fields(None, Some("absolute"), None)),
            Ok(ThresholdRule::None)
        );
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        assert_eq!(
            ThresholdRule::from_fields(&fields(Some(""), Some("absolute"), Some(1.0))),
            Ok(ThresholdRule::Absolute { limit: 1.0 })
        );
        assert_eq!(
            ThresholdRule::from_fields(&fields(Some(">"), Some(""), None)),
            Ok(ThresholdRule::Condition(Operator::Greater))
        );
    }

    #[test]
    fn test_condition_and_value_conflict() {
        let err = ThresholdRule::from_fields(&fields(Some(">"), Some("percentage"), Some(5.0)))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidThreshold(_)));
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn test_unknown_value_kind() {
        let err = ThresholdRule::from_fields(&fields(None, Some("relative"), Some(5.0))).unwrap_err();
        assert!(err.to_string().contains("'relative'"));
    }

    #[test]
    fn test_unknown_operator() {
        assert!(matches!(
            ThresholdRule::from_fields(&fields(Some("=>"), None, None)),
            Err(CoreError::UnknownOperator(_))
        ));
    }

    #[test]
    fn test_non_finite_limit() {
        assert!(ThresholdRule::from_fields(&fields(None, Some("absolute"), Some(f64::NAN))).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ThresholdRule::Percentage { limit: 5.0 }.to_string(), "within 5%");
        assert_eq!(
            ThresholdRule::Condition(Operator::Greater).to_string(),
            "fail when source > target"
        );
    }
}
