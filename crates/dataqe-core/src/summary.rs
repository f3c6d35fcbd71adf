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

//! Run-level aggregation of result records.

use crate::result::{ResultRecord, Status};

/// Counts and total time across a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionSummary {
    /// Number of evaluated tests.
    pub total_tests: usize,
    /// Tests with status PASS.
    pub passed: usize,
    /// Tests with status FAIL.
    pub failed: usize,
    /// Tests with status INVALID.
    pub invalid: usize,
    /// Failed tests tagged `critical`.
    pub critical_failed: usize,
    /// Sum of per-test execution times, in milliseconds.
    pub total_execution_time_ms: f64,
}

impl ExecutionSummary {
    /// Aggregate a run's records.
    pub fn from_results(results: &[ResultRecord]) -> Self {
        let count = |status: Status| results.iter().filter(|r| r.status == status).count();

        Self {
            total_tests: results.len(),
            passed: count(Status::Pass),
            failed: count(Status::Fail),
            invalid: count(Status::Invalid),
            critical_failed: results.iter().filter(|r| r.is_critical_failure()).count(),
            total_execution_time_ms: results.iter().map(|r| r.execution_time_ms).sum(),
        }
    }

    /// Share of passed tests, 0 for an empty run.
    pub fn pass_percentage(&self) -> f64 {
        percentage(self.passed, self.total_tests)
    }

    /// Share of failed tests, 0 for an empty run.
    pub fn fail_percentage(&self) -> f64 {
        percentage(self.failed, self.total_tests)
    }

    /// Returns true when at least one test failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Render a duration as `1m 23s 456ms`, `23s 456ms` or `456ms`.
///
/// Leading zero units are dropped; fractional milliseconds are truncated.
///
/// ```
/// use dataqe_core::format_duration;
///
/// assert_eq!(format_duration(83_456.7), "1m 23s 456ms");
/// assert_eq!(format_duration(999.9), "999ms");
/// ```
pub fn format_duration(milliseconds: f64) -> String {
    let millis = milliseconds.max(0.0) as u64;
    let total_seconds = millis / 1000;
    let remaining_ms = millis % 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    if minutes > 0 {
        format!("{minutes}m {seconds}s {remaining_ms}ms")
    } else if seconds > 0 {
        format!("{seconds}s {remaining_ms}ms")
    } else {
        format!("{remaining_ms}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn record(status: Status, severity: Option<&str>, ms: f64) -> ResultRecord {
        let now = Local::now();
        ResultRecord {
            test_name: "t".to_string(),
            severity: severity.map(str::to_string),
            source_value: None,
            target_value: None,
            status,
            start_time: now,
            end_time: now,
            execution_time_ms: ms,
            source_query_time_ms: 0.0,
            target_query_time_ms: 0.0,
            comparison_time_ms: 0.0,
            script_name: "script.yml".to_string(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            record(Status::Pass, None, 10.0),
            record(Status::Fail, Some("critical"), 20.0),
            record(Status::Fail, Some("CRITICAL"), 5.0),
            record(Status::Fail, Some("low"), 5.0),
            record(Status::Invalid, Some("critical"), 0.5),
        ];
        let summary = ExecutionSummary::from_results(&results);

        assert_eq!(summary.total_tests, 5);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.critical_failed, 2);
        assert!((summary.total_execution_time_ms - 40.5).abs() < 1e-9);
        assert!((summary.pass_percentage() - 20.0).abs() < 1e-9);
        assert!((summary.fail_percentage() - 60.0).abs() < 1e-9);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_empty_summary() {
        let summary = ExecutionSummary::from_results(&[]);
        assert_eq!(summary.total_tests, 0);
        assert_eq!(summary.pass_percentage(), 0.0);
        assert_eq!(summary.fail_percentage(), 0.0);
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0ms");
        assert_eq!(format_duration(456.0), "456ms");
        assert_eq!(format_duration(1_000.0), "1s 0ms");
        assert_eq!(format_duration(23_456.0), "23s 456ms");
        assert_eq!(format_duration(60_000.0), "1m 0s 0ms");
        assert_eq!(format_duration(3_723_004.0), "62m 3s 4ms");
        assert_eq!(format_duration(-5.0), "0ms");
    }
}
