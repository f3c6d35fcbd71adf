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

//! Error types for report generation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for report generation.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors raised while writing reports.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    /// Creating, cleaning or writing in the output directory failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// CSV serialization failed.
    #[error("CSV error for '{path}': {message}")]
    Csv {
        /// The report path
        path: PathBuf,
        /// The error message
        message: String,
    },
}

impl ReportError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a CSV error with path context.
    pub fn csv_error(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }
}
