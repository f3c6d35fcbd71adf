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

//! Per-test outcomes.

use crate::test_case::is_critical;
use crate::value::Value;
use chrono::{DateTime, Local};
use std::fmt;

/// Outcome of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The comparison held.
    Pass,
    /// The comparison did not hold.
    Fail,
    /// The test could not be evaluated (it declares no source query).
    Invalid,
}

impl Status {
    /// Uppercase label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Invalid => "INVALID",
        }
    }

    /// `Pass` when `passed`, `Fail` otherwise.
    pub fn from_bool(passed: bool) -> Self {
        if passed {
            Status::Pass
        } else {
            Status::Fail
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything recorded about one evaluated test.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Name of the test.
    pub test_name: String,
    /// Severity tag copied from the test case.
    pub severity: Option<String>,
    /// Value produced by the source query, if one ran.
    pub source_value: Option<Value>,
    /// Value produced by the target query, if one ran.
    pub target_value: Option<Value>,
    /// Verdict.
    pub status: Status,
    /// When evaluation of the test began.
    pub start_time: DateTime<Local>,
    /// When evaluation of the test finished.
    pub end_time: DateTime<Local>,
    /// Wall time for the whole test, in milliseconds.
    pub execution_time_ms: f64,
    /// Time spent in the source query, in milliseconds.
    pub source_query_time_ms: f64,
    /// Time spent in the target query, in milliseconds.
    pub target_query_time_ms: f64,
    /// Time spent comparing, in milliseconds.
    pub comparison_time_ms: f64,
    /// File name of the test script the test came from.
    pub script_name: String,
}

impl ResultRecord {
    /// Returns true for a failed test tagged `critical`.
    pub fn is_critical_failure(&self) -> bool {
        self.status == Status::Fail && is_critical(self.severity.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Pass.to_string(), "PASS");
        assert_eq!(Status::Fail.as_str(), "FAIL");
        assert_eq!(Status::Invalid.as_str(), "INVALID");
        assert_eq!(Status::from_bool(true), Status::Pass);
        assert_eq!(Status::from_bool(false), Status::Fail);
    }
}
