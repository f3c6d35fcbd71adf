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

//! HTML reports.
//!
//! `ExecutionReport.html` lists every test; `FailedExecutionReport.html`
//! lists only failures, or an all-passed banner when there are none.

use crate::error::{ReportError, ReportResult};
use chrono::{DateTime, Local};
use dataqe_core::{format_duration, ExecutionSummary, ResultRecord, Status, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the full report.
pub const EXECUTION_REPORT_HTML: &str = "ExecutionReport.html";

/// File name of the failures-only report.
pub const FAILED_REPORT_HTML: &str = "FailedExecutionReport.html";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Escapes text for use inside HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn value_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(v) => escape_html(&v.to_string()),
    }
}

fn status_class(status: Status) -> &'static str {
    match status {
        Status::Pass => "pass",
        Status::Fail => "fail",
        Status::Invalid => "invalid",
    }
}

fn push_head(html: &mut String, title: &str, body_class: Option<&str>) {
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(include_str!("styles.css"));
    html.push_str("</style>\n</head>\n");
    match body_class {
        Some(class) => html.push_str(&format!("<body class=\"{}\">\n", class)),
        None => html.push_str("<body>\n"),
    }
}

fn push_card(html: &mut String, label: &str, value: &str) {
    html.push_str("<div class=\"summary-card\">\n");
    html.push_str(&format!("<h3>{}</h3>\n", label));
    html.push_str(&format!("<div class=\"value\">{}</div>\n", value));
    html.push_str("</div>\n");
}

fn push_cards(html: &mut String, summary: &ExecutionSummary, with_percentages: bool) {
    let (passed, failed) = if with_percentages {
        (
            format!("{} ({:.1}%)", summary.passed, summary.pass_percentage()),
            format!("{} ({:.1}%)", summary.failed, summary.fail_percentage()),
        )
    } else {
        (summary.passed.to_string(), summary.failed.to_string())
    };

    html.push_str("<div class=\"summary\">\n");
    push_card(html, "Total Tests", &summary.total_tests.to_string());
    push_card(html, "Passed", &passed);
    push_card(html, "Failed", &failed);
    push_card(html, "Invalid", &summary.invalid.to_string());
    html.push_str("</div>\n");
}

fn push_table<'a>(html: &mut String, records: impl Iterator<Item = &'a ResultRecord>) {
    html.push_str("<table>\n<thead>\n<tr>");
    for header in [
        "Test Name",
        "Severity",
        "Source Value",
        "Target Value",
        "Status",
        "Execution Time",
    ] {
        html.push_str(&format!("<th>{}</th>", header));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in records {
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            status_class(record.status),
            escape_html(&record.test_name),
            escape_html(record.severity.as_deref().unwrap_or("N/A")),
            value_cell(record.source_value.as_ref()),
            value_cell(record.target_value.as_ref()),
            record.status,
            format_duration(record.execution_time_ms)
        ));
    }
    html.push_str("</tbody>\n</table>\n");
}

/// Renders the full execution report.
pub fn render_execution_report(
    results: &[ResultRecord],
    summary: &ExecutionSummary,
    generated: DateTime<Local>,
) -> String {
    let timestamp = generated.format(TIMESTAMP_FORMAT).to_string();
    let mut html = String::new();

    push_head(&mut html, &format!("Test Report - {}", timestamp), None);
    html.push_str("<div class=\"header\">\n<h1>Test Execution Report</h1>\n");
    html.push_str(&format!("<p>Generated: {}</p>\n</div>\n", timestamp));
    push_cards(&mut html, summary, true);
    push_table(&mut html, results.iter());
    html.push_str("</body>\n</html>\n");
    html
}

/// Renders the failures-only report.
pub fn render_failed_report(
    results: &[ResultRecord],
    summary: &ExecutionSummary,
    generated: DateTime<Local>,
) -> String {
    let timestamp = generated.format(TIMESTAMP_FORMAT).to_string();
    let title = format!("Failed Execution Report - {}", timestamp);
    let failed: Vec<&ResultRecord> = results
        .iter()
        .filter(|r| r.status == Status::Fail)
        .collect();
    let mut html = String::new();

    if failed.is_empty() {
        push_head(&mut html, &title, Some("all-passed"));
        html.push_str("<div class=\"header\">\n<h1>All Tests Passed!</h1>\n");
        html.push_str("<p>No failed tests detected in this execution</p>\n");
        html.push_str(&format!("<p>Generated: {}</p>\n</div>\n", timestamp));
        push_cards(&mut html, summary, false);
    } else {
        push_head(&mut html, &title, Some("failed"));
        html.push_str("<div class=\"header\">\n<h1>Failed Test Execution Report</h1>\n");
        html.push_str(&format!("<p>Generated: {}</p>\n", timestamp));
        html.push_str(&format!(
            "<p>Total Failed Tests: <strong>{}</strong></p>\n</div>\n",
            failed.len()
        ));
        push_cards(&mut html, summary, false);
        push_table(&mut html, failed.into_iter());
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn write_html(path: PathBuf, html: &str) -> ReportResult<PathBuf> {
    fs::write(&path, html).map_err(|e| ReportError::io_error(&path, e))?;
    Ok(path)
}

/// Writes `ExecutionReport.html` into `output_dir`.
pub fn write_execution_report(
    output_dir: &Path,
    results: &[ResultRecord],
    summary: &ExecutionSummary,
) -> ReportResult<PathBuf> {
    let html = render_execution_report(results, summary, Local::now());
    write_html(output_dir.join(EXECUTION_REPORT_HTML), &html)
}

/// Writes `FailedExecutionReport.html` into `output_dir`.
pub fn write_failed_report(
    output_dir: &Path,
    results: &[ResultRecord],
    summary: &ExecutionSummary,
) -> ReportResult<PathBuf> {
    let html = render_failed_report(results, summary, Local::now());
    write_html(output_dir.join(FAILED_REPORT_HTML), &html)
}
