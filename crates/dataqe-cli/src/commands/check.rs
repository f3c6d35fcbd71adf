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

//! Check command - load and validate a run without executing queries

use crate::error::CliError;
use colored::Colorize;
use dataqe_config::{load_config, load_preprocessor, load_test_cases};
use dataqe_core::{Preprocessor, Side, TestCase};
use std::path::Path;

/// Load a configuration, its test script and template queries, and print
/// what the run would do.
///
/// Threshold and operator errors in the test script are reported here,
/// as are template keys that the template file does not define.
///
/// # Errors
///
/// Returns `Err` if any file fails to load or validate, or if a test
/// references a template key that is missing.
pub fn check(config: &Path) -> Result<(), String> {
    match check_config(config) {
        Ok(lines) => {
            println!("{} {}", "✓".green().bold(), config.display());
            for line in lines {
                println!("  {}", line);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), config.display());
            Err(e.to_string())
        }
    }
}

/// Validate `config` and return the summary lines printed by [`check`].
pub fn check_config(config: &Path) -> Result<Vec<String>, CliError> {
    let run_config = load_config(config)?;
    let tests = load_test_cases(&run_config.validation_script)?;
    let preprocessor = match &run_config.preprocessor_queries {
        Some(path) => Some(load_preprocessor(path)?),
        None => None,
    };

    let missing = missing_templates(&tests, preprocessor.as_ref());
    if !missing.is_empty() {
        return Err(CliError::invalid_input(format!(
            "unknown template keys: {}",
            missing.join(", ")
        )));
    }

    let describe = |db: Option<&dataqe_connect::DatabaseConfig>| {
        db.map(|d| d.database_type().to_string())
            .unwrap_or_else(|| "none".to_string())
    };
    let paired = tests.iter().filter(|t| t.target.is_some()).count();

    let mut lines = vec![
        format!("Config block: {}", run_config.block_name),
        format!("Source: {}", describe(run_config.source.as_ref())),
        format!("Target: {}", describe(run_config.target.as_ref())),
        format!(
            "Test script: {} ({} tests)",
            run_config.script_name(),
            tests.len()
        ),
        format!(
            "Paired: {}, source-only: {}",
            paired,
            tests.len() - paired
        ),
    ];
    if let Some(p) = &preprocessor {
        lines.push(format!("Template queries: {}", p.len()));
    }
    Ok(lines)
}

fn missing_templates(tests: &[TestCase], preprocessor: Option<&Preprocessor>) -> Vec<String> {
    let mut missing = Vec::new();
    for test in tests {
        for side in [Side::Source, Side::Target] {
            let Some(key) = test
                .block(side)
                .and_then(|b| b.config_query_key.as_deref())
            else {
                continue;
            };
            let known = preprocessor.is_some_and(|p| p.template(key).is_some());
            if !known && !missing.iter().any(|m| m == key) {
                missing.push(key.to_string());
            }
        }
    }
    missing
}
