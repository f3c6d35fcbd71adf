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

//! Output directory handling and the combined report run.

use crate::csv_report::{write_automation_data, write_execution_report_csv, AutomationInfo};
use crate::error::{ReportError, ReportResult};
use crate::html::{write_execution_report, write_failed_report};
use dataqe_core::{ExecutionSummary, ResultRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Creates `dir` if needed and removes the files directly inside it.
///
/// Subdirectories are left alone. A file that cannot be removed is logged
/// and skipped.
pub fn prepare_output_dir(dir: &Path) -> ReportResult<()> {
    fs::create_dir_all(dir).map_err(|e| ReportError::io_error(dir, e))?;
    info!("Output directory ready: {}", dir.display());

    let entries = fs::read_dir(dir).map_err(|e| ReportError::io_error(dir, e))?;
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("Error cleaning output directory: {}", e);
                continue;
            }
        };
        if path.is_file() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Could not remove {}: {}", path.display(), e);
            }
        }
    }
    info!("Cleaned output directory: {}", dir.display());
    Ok(())
}

/// Paths of every report written by [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// `ExecutionReport.html`
    pub html: PathBuf,
    /// `ExecutionReport.csv`
    pub csv: PathBuf,
    /// `FailedExecutionReport.html`
    pub failed_html: PathBuf,
    /// `AutomationData.csv`
    pub automation: PathBuf,
}

/// Writes all four file reports into `output_dir`.
///
/// The automation row's `report_location` is set to the HTML report path.
pub fn write_reports(
    output_dir: &Path,
    results: &[ResultRecord],
    summary: &ExecutionSummary,
    info: &AutomationInfo,
) -> ReportResult<ReportPaths> {
    let html = write_execution_report(output_dir, results, summary)?;
    info!("ExecutionReport.html generated: {}", html.display());

    let csv = write_execution_report_csv(output_dir, results, summary)?;
    info!("ExecutionReport.csv generated: {}", csv.display());

    let failed_html = write_failed_report(output_dir, results, summary)?;
    info!("FailedExecutionReport.html generated: {}", failed_html.display());

    let info = AutomationInfo {
        report_location: html.display().to_string(),
        ..info.clone()
    };
    let automation = write_automation_data(output_dir, summary, &info)?;
    info!("AutomationData.csv generated: {}", automation.display());

    Ok(ReportPaths {
        html,
        csv,
        failed_html,
        automation,
    })
}
