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

//! Comparison operators and `<op><number>` conditions.

use crate::error::CoreError;
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}

impl Operator {
    /// All operators, two-character tokens first so prefix matching is greedy.
    pub const ALL: [Operator; 6] = [
        Operator::LessOrEqual,
        Operator::GreaterOrEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::Greater,
    ];

    /// The operator token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }

    /// Evaluate `left <op> right`.
    ///
    /// `==` and `!=` use value equality and are defined for every pair.
    /// Ordering operators on values that cannot be ordered (null, text
    /// against a number) are false, and the mismatch is logged.
    pub fn apply(self, left: &Value, right: &Value) -> bool {
        match self {
            Operator::Equal => left == right,
            Operator::NotEqual => left != right,
            _ => match left.compare(right) {
                Some(ordering) => self.accepts(ordering),
                None => {
                    warn!(
                        "Cannot compare {} ({}) with {} ({}) using operator {}",
                        left,
                        left.type_name(),
                        right,
                        right.type_name(),
                        self
                    );
                    false
                }
            },
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::LessOrEqual => ordering != Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::Less => ordering == Ordering::Less,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == token)
            .ok_or_else(|| CoreError::UnknownOperator(token.to_string()))
    }
}

/// A parsed `<op><number>` expectation such as `<=2` or `!= -1.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    /// The comparison operator.
    pub operator: Operator,
    /// The number the value is compared against.
    pub threshold: f64,
}

impl Condition {
    /// Create a condition.
    pub fn new(operator: Operator, threshold: f64) -> Self {
        Self {
            operator,
            threshold,
        }
    }

    /// Parse an expectation string.
    ///
    /// Accepts an operator, optional whitespace and a decimal number
    /// (`-?\d+(\.\d+)?`), with surrounding whitespace ignored. Anything else,
    /// including exponents and a leading `+`, is not a condition and yields
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataqe_core::{Condition, Operator};
    ///
    /// let cond = Condition::parse(" <= 2 ").unwrap();
    /// assert_eq!(cond.operator, Operator::LessOrEqual);
    /// assert_eq!(cond.threshold, 2.0);
    ///
    /// assert!(Condition::parse("ok").is_none());
    /// assert!(Condition::parse(">1e3").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Condition> {
        let text = text.trim();
        let operator = Operator::ALL
            .into_iter()
            .find(|op| text.starts_with(op.as_str()))?;
        let number = text[operator.as_str().len()..].trim_start();

        if !is_decimal_literal(number) {
            return None;
        }

        let threshold = number.parse::<f64>().ok().filter(|n| n.is_finite())?;
        Some(Condition::new(operator, threshold))
    }

    /// Evaluate `value <op> threshold`.
    pub fn evaluate(&self, value: &Value) -> bool {
        let holds = self.operator.apply(value, &Value::Float(self.threshold));
        debug!(
            "Condition {} {} {}: {}",
            value,
            self.operator,
            self.threshold,
            if holds { "holds" } else { "does not hold" }
        );
        holds
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.threshold)
    }
}

/// `-?\d+(\.\d+)?` with ASCII digits only.
fn is_decimal_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    all_digits(int_part) && frac_part.map_or(true, all_digits)
}
