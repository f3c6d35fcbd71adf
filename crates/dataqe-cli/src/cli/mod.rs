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

//! CLI command definitions and argument parsing.
//!
//! - [`core`]: run and check
//! - [`utility`]: shell completion

mod core;
mod utility;

use clap::{Parser, Subcommand};

pub use self::core::CoreCommands;
pub use utility::UtilityCommands;

/// DataQE - compare and validate data across warehouses
///
/// Runs YAML-declared tests against a source and an optional target
/// database and writes HTML and CSV reports.
///
/// ```bash
/// dataqe check --config config.yml
/// dataqe run --config config.yml --output-dir ./reports
/// ```
#[derive(Parser)]
#[command(name = "dataqe")]
#[command(author, version, about = "DataQE - data quality comparison and validation", long_about = None)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    // Core commands - flattened to appear at top level
    #[command(flatten)]
    Core(CoreCommands),

    // Utility commands - flattened to appear at top level
    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns the command's error message.
    pub fn execute(self) -> Result<(), String> {
        match self {
            Commands::Core(cmd) => cmd.execute(),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}
