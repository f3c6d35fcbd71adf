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

//! Run and check commands.

use crate::commands;
use clap::Subcommand;
use std::path::PathBuf;

/// Commands that operate on a run configuration.
#[derive(Subcommand)]
pub enum CoreCommands {
    /// Execute a test script and write reports
    ///
    /// Test failures are reported, not turned into a failing exit code,
    /// unless --fail-on-failure is given.
    Run {
        /// Run configuration file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Report directory (defaults to DATAQE_OUTPUT_DIR or ./output)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Exit with status 1 when any test fails
        #[arg(long)]
        fail_on_failure: bool,
    },

    /// Validate a configuration without running queries
    ///
    /// Loads the configuration, test script and template queries and
    /// checks thresholds and template keys.
    Check {
        /// Run configuration file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
    },
}

impl CoreCommands {
    /// Execute the core command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the command execution fails.
    pub fn execute(self) -> Result<(), String> {
        match self {
            CoreCommands::Run {
                config,
                output_dir,
                fail_on_failure,
            } => commands::run(&config, output_dir.as_deref(), fail_on_failure),
            CoreCommands::Check { config } => commands::check(&config),
        }
    }
}
