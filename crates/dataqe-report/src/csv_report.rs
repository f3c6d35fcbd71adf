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

//! CSV reports: the per-test `ExecutionReport.csv` and the one-row
//! `AutomationData.csv` consumed by dashboards.

use crate::error::{ReportError, ReportResult};
use chrono::{DateTime, Local};
use dataqe_core::{ExecutionSummary, ResultRecord, Value};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the per-test CSV report.
pub const EXECUTION_REPORT_CSV: &str = "ExecutionReport.csv";

/// File name of the automation summary.
pub const AUTOMATION_DATA_CSV: &str = "AutomationData.csv";

/// Value written in the `test_type` column of the automation summary.
pub const AUTOMATION_TEST_TYPE: &str = "Data_Testing_Summary";

const EXECUTION_HEADERS: [&str; 9] = [
    "Test Name",
    "Severity",
    "Source Value",
    "Target Value",
    "Status",
    "Execution Time (ms)",
    "Source Query Time (ms)",
    "Target Query Time (ms)",
    "Comparison Time (ms)",
];

const AUTOMATION_HEADERS: [&str; 12] = [
    "test_type",
    "app",
    "branch",
    "exec_date",
    "platform",
    "duration",
    "tc_count",
    "tc_pass",
    "tc_fail",
    "tc_critical_fail",
    "report_location",
    "owner",
];

/// Run metadata written to the automation summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationInfo {
    /// Application under test.
    pub app: String,
    /// Source branch of the run.
    pub branch: String,
    /// Platform or environment name.
    pub platform: String,
    /// Person or team that owns the run.
    pub owner: String,
    /// Where the HTML report was written.
    pub report_location: String,
}

impl Default for AutomationInfo {
    fn default() -> Self {
        Self {
            app: "default_app".to_string(),
            branch: "default_branch".to_string(),
            platform: "default_platform".to_string(),
            owner: "default_owner".to_string(),
            report_location: String::new(),
        }
    }
}

fn value_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => v.to_string(),
    }
}

fn millis(ms: f64) -> String {
    format!("{:.2}", ms)
}

/// Writes the per-test rows followed by a summary section.
///
/// Summary rows have fewer fields than the header, so the writer is
/// flexible.
pub fn write_execution_csv<W: Write>(
    writer: W,
    results: &[ResultRecord],
    summary: &ExecutionSummary,
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(EXECUTION_HEADERS)?;
    for record in results {
        wtr.write_record([
            record.test_name.clone(),
            record.severity.clone().unwrap_or_else(|| "N/A".to_string()),
            value_field(record.source_value.as_ref()),
            value_field(record.target_value.as_ref()),
            record.status.to_string(),
            millis(record.execution_time_ms),
            millis(record.source_query_time_ms),
            millis(record.target_query_time_ms),
            millis(record.comparison_time_ms),
        ])?;
    }

    wtr.write_record(std::iter::empty::<&str>())?;
    wtr.write_record(["EXECUTION SUMMARY"])?;
    wtr.write_record(["Total Tests".to_string(), summary.total_tests.to_string()])?;
    wtr.write_record([
        "Passed".to_string(),
        summary.passed.to_string(),
        format!("{:.1}%", summary.pass_percentage()),
    ])?;
    wtr.write_record([
        "Failed".to_string(),
        summary.failed.to_string(),
        format!("{:.1}%", summary.fail_percentage()),
    ])?;
    wtr.write_record(["Invalid".to_string(), summary.invalid.to_string()])?;
    wtr.write_record([
        "Total Execution Time (ms)".to_string(),
        millis(summary.total_execution_time_ms),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// Writes the header and the single automation row.
pub fn write_automation_csv<W: Write>(
    writer: W,
    summary: &ExecutionSummary,
    info: &AutomationInfo,
    exec_date: DateTime<Local>,
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    let duration_seconds = (summary.total_execution_time_ms / 1000.0).max(0.0) as u64;

    wtr.write_record(AUTOMATION_HEADERS)?;
    wtr.write_record([
        AUTOMATION_TEST_TYPE.to_string(),
        info.app.clone(),
        info.branch.clone(),
        exec_date.format("%Y-%m-%d").to_string(),
        info.platform.clone(),
        duration_seconds.to_string(),
        summary.total_tests.to_string(),
        summary.passed.to_string(),
        summary.failed.to_string(),
        summary.critical_failed.to_string(),
        info.report_location.clone(),
        info.owner.clone(),
    ])?;

    wtr.flush()?;
    Ok(())
}

fn create(path: &Path) -> ReportResult<File> {
    File::create(path).map_err(|e| ReportError::io_error(path, e))
}

/// Writes `ExecutionReport.csv` into `output_dir`.
pub fn write_execution_report_csv(
    output_dir: &Path,
    results: &[ResultRecord],
    summary: &ExecutionSummary,
) -> ReportResult<PathBuf> {
    let path = output_dir.join(EXECUTION_REPORT_CSV);
    let file = create(&path)?;
    write_execution_csv(file, results, summary).map_err(|e| ReportError::csv_error(&path, e))?;
    Ok(path)
}

/// Writes `AutomationData.csv` into `output_dir`.
pub fn write_automation_data(
    output_dir: &Path,
    summary: &ExecutionSummary,
    info: &AutomationInfo,
) -> ReportResult<PathBuf> {
    let path = output_dir.join(AUTOMATION_DATA_CSV);
    let file = create(&path)?;
    write_automation_csv(file, summary, info, Local::now())
        .map_err(|e| ReportError::csv_error(&path, e))?;
    Ok(path)
}
