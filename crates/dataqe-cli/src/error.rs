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

//! Structured error types for the DataQE CLI.

use dataqe_config::ConfigError;
use dataqe_core::{ConnectorError, CoreError};
use dataqe_report::ReportError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
///
/// Commands convert these to a message at the boundary; `main` prints it
/// to stderr and exits non-zero.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CliError {
    /// The configuration, test script or template file was unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A connector could not be built from its configuration.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// The run aborted.
    #[error(transparent)]
    Execution(#[from] CoreError),

    /// A report could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// `--fail-on-failure` was given and at least one test failed.
    #[error("{failed} of {total} tests failed")]
    TestsFailed {
        /// Number of failed tests
        failed: usize,
        /// Number of evaluated tests
        total: usize,
    },

    /// Invalid command-line input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tests_failed_display() {
        let err = CliError::TestsFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(err.to_string(), "2 of 5 tests failed");
    }

    #[test]
    fn test_wrapped_errors_are_transparent() {
        let inner = ConnectorError::query("sqlite", "no such table: orders");
        let err: CliError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());

        let err: CliError = CoreError::invalid_threshold("bad").into();
        assert_eq!(err.to_string(), "invalid threshold: bad");
    }
}
