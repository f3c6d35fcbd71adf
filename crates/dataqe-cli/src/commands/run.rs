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

//! Run command - execute a test script and write every report

use crate::error::CliError;
use dataqe_config::{load_config, load_preprocessor, load_test_cases, RunEnvironment};
use dataqe_connect::connector_from_config;
use dataqe_core::{ExecutionSummary, ValidationExecutor};
use dataqe_report::{prepare_output_dir, print_report, write_reports, AutomationInfo};
use std::path::Path;
use tracing::{info, warn, Dispatch};

/// Execute the run described by `config`.
///
/// The output directory is `output_dir` when given, otherwise
/// `DATAQE_OUTPUT_DIR` or `./output`. It is created and emptied of files
/// before anything else happens.
///
/// # Errors
///
/// Returns `Err` if:
/// - The output directory cannot be prepared
/// - The configuration, test script or template file cannot be loaded
/// - A connector cannot be built, connected or queried
/// - A report cannot be written
/// - `fail_on_failure` is set and at least one test failed
///
/// # Examples
///
/// ```no_run
/// use dataqe_cli::commands::run;
/// use std::path::Path;
///
/// # fn main() -> Result<(), String> {
/// run(Path::new("config.yml"), None, false)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: &Path, output_dir: Option<&Path>, fail_on_failure: bool) -> Result<(), String> {
    let dispatch = tracing::dispatcher::get_default(|current| current.clone());
    run_with(
        config,
        output_dir,
        fail_on_failure,
        &RunEnvironment::from_env(),
        dispatch,
    )
    .map_err(|e| e.to_string())
}

/// [`run`] with an explicit environment and log dispatcher.
pub fn run_with(
    config: &Path,
    output_dir: Option<&Path>,
    fail_on_failure: bool,
    env: &RunEnvironment,
    dispatch: Dispatch,
) -> Result<(), CliError> {
    let output_dir = output_dir.unwrap_or(env.output_dir.as_path());
    prepare_output_dir(output_dir)?;

    let run_config = load_config(config)?;
    let tests = load_test_cases(&run_config.validation_script)?;

    let source = run_config
        .source
        .as_ref()
        .map(|c| connector_from_config(c, &env.profile))
        .transpose()?;
    let target = run_config
        .target
        .as_ref()
        .map(|c| connector_from_config(c, &env.profile))
        .transpose()?;

    let mut executor = ValidationExecutor::new(source, target).with_dispatch(dispatch);
    if let Some(path) = &run_config.preprocessor_queries {
        executor = executor.with_preprocessor(load_preprocessor(path)?);
    }

    let script_name = run_config.script_name();
    info!("Starting execution of test script: {}", script_name);
    let outcome = executor.run(&tests, &script_name);
    if let Err(e) = executor.close() {
        warn!("Failed to close connectors: {}", e);
    }
    let results = outcome?;

    let summary = ExecutionSummary::from_results(&results);
    print_report(&results, &summary);

    let automation = AutomationInfo {
        app: env.app_name.clone(),
        branch: env.branch.clone(),
        platform: env.platform.clone(),
        owner: env.owner.clone(),
        report_location: String::new(),
    };
    write_reports(output_dir, &results, &summary, &automation)?;

    if fail_on_failure && summary.has_failures() {
        return Err(CliError::TestsFailed {
            failed: summary.failed,
            total: summary.total_tests,
        });
    }
    Ok(())
}
