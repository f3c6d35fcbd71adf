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

//! Console reporter.
//!
//! Prints one line per test followed by a summary block.

use colored::Colorize;
use dataqe_core::{format_duration, ExecutionSummary, ResultRecord, Status};
use std::fmt::Display;

const RULE_WIDTH: usize = 60;

/// Formats the per-test line without colour.
pub fn format_test_line(record: &ResultRecord) -> String {
    status_line(record, record.status)
}

fn status_line(record: &ResultRecord, status: impl Display) -> String {
    format!(
        "Test: {} - Status: {} (Execution time: {})",
        record.test_name,
        status,
        format_duration(record.execution_time_ms)
    )
}

/// Formats the summary block without colour.
pub fn format_summary(summary: &ExecutionSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{}\n", rule));
    out.push_str("EXECUTION SUMMARY\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("Total Test Cases: {}\n", summary.total_tests));
    out.push_str(&format!(
        "Passed: {} ({:.1}%)\n",
        summary.passed,
        summary.pass_percentage()
    ));
    out.push_str(&format!(
        "Failed: {} ({:.1}%)\n",
        summary.failed,
        summary.fail_percentage()
    ));
    out.push_str(&format!("Invalid: {}\n", summary.invalid));
    out.push_str(&format!(
        "Total Execution Time: {}\n",
        format_duration(summary.total_execution_time_ms)
    ));
    out.push_str(&rule);
    out
}

fn colored_status(status: Status) -> colored::ColoredString {
    match status {
        Status::Pass => status.as_str().green().bold(),
        Status::Fail => status.as_str().red().bold(),
        Status::Invalid => status.as_str().yellow().bold(),
    }
}

/// Prints every record and then the summary to stdout.
pub fn print_report(results: &[ResultRecord], summary: &ExecutionSummary) {
    for record in results {
        println!("{}", status_line(record, colored_status(record.status)));
    }
    println!();
    println!("{}", format_summary(summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_format_test_line() {
        let line = format_test_line(&record("orders_count", Status::Pass, None, 1_234.0));
        assert_eq!(
            line,
            "Test: orders_count - Status: PASS (Execution time: 1s 234ms)"
        );
    }

    #[test]
    fn test_colored_line_matches_plain_line() {
        colored::control::set_override(false);
        let failed = record("revenue_total", Status::Fail, None, 20.0);
        assert_eq!(
            status_line(&failed, colored_status(failed.status)),
            format_test_line(&failed)
        );
        colored::control::unset_override();
    }

    #[test]
    fn test_format_summary() {
        let results = vec![
            record("a", Status::Pass, None, 10.0),
            record("b", Status::Fail, Some("critical"), 20.0),
            record("c", Status::Invalid, None, 0.0),
        ];
        let text = format_summary(&ExecutionSummary::from_results(&results));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(60));
        assert_eq!(lines[1], "EXECUTION SUMMARY");
        assert_eq!(lines[3], "Total Test Cases: 3");
        assert_eq!(lines[4], "Passed: 1 (33.3%)");
        assert_eq!(lines[5], "Failed: 1 (33.3%)");
        assert_eq!(lines[6], "Invalid: 1");
        assert_eq!(lines[7], "Total Execution Time: 30ms");
        assert_eq!(lines[8], "=".repeat(60));
    }

    #[test]
    fn test_empty_summary_has_zero_percentages() {
        let text = format_summary(&ExecutionSummary::default());
        assert!(text.contains("Passed: 0 (0.0%)"));
        assert!(text.contains("Failed: 0 (0.0%)"));
    }
}
