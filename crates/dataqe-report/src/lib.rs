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

//! Reports for DataQE runs.
//!
//! Every run produces:
//!
//! - a console listing with a summary block ([`print_report`])
//! - `ExecutionReport.html` with every test
//! - `ExecutionReport.csv` with per-test timings and a summary section
//! - `FailedExecutionReport.html` with failures only
//! - `AutomationData.csv`, a single summary row for dashboards
//!
//! # Example
//!
//! ```no_run
//! use dataqe_core::ExecutionSummary;
//! use dataqe_report::{prepare_output_dir, write_reports, AutomationInfo};
//! use std::path::Path;
//!
//! let out = Path::new("./output");
//! prepare_output_dir(out).unwrap();
//! let results = Vec::new();
//! let summary = ExecutionSummary::from_results(&results);
//! let paths = write_reports(out, &results, &summary, &AutomationInfo::default()).unwrap();
//! println!("{}", paths.html.display());
//! ```

#![warn(missing_docs)]

pub mod console;
mod csv_report;
mod error;
pub mod html;
mod output;

pub use console::{format_summary, format_test_line, print_report};
pub use csv_report::{
    write_automation_csv, write_automation_data, write_execution_csv,
    write_execution_report_csv, AutomationInfo, AUTOMATION_DATA_CSV, AUTOMATION_TEST_TYPE,
    EXECUTION_REPORT_CSV,
};
pub use error::{ReportError, ReportResult};
pub use html::{
    escape_html, render_execution_report, render_failed_report, write_execution_report,
    write_failed_report, EXECUTION_REPORT_HTML, FAILED_REPORT_HTML,
};
pub use output::{prepare_output_dir, write_reports, ReportPaths};
