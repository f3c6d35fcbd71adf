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

//! DataQE CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **run**: execute a test script against the configured source and
//!   target and write `ExecutionReport.html`, `ExecutionReport.csv`,
//!   `FailedExecutionReport.html` and `AutomationData.csv`
//! - **check**: load and validate a configuration without running queries
//! - **completion**: generate shell completion scripts
//!
//! # Environment
//!
//! | Variable | Default | Used for |
//! |----------|---------|----------|
//! | `DATAQE_OUTPUT_DIR` | `./output` | report directory |
//! | `DATAQE_APP_NAME`, `DATAQE_BRANCH`, `DATAQE_PLATFORM`, `DATAQE_OWNER` | `default_*` | `AutomationData.csv` |
//! | `SPRING_PROFILES_ACTIVE` | `mylocal` | warehouse location selection |
//! | `DATAQE_MAX_FILE_SIZE` | 16 MB | input file size cap |
//! | `RUST_LOG` | `info` | log filter |
//!
//! # Error Handling
//!
//! Commands return `Result<(), String>`; `main` prints the message to
//! stderr and exits with status 1.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
