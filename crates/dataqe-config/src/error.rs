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

//! Error types for configuration loading.

use dataqe_core::CoreError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading a run configuration, a test script or a
/// template query file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// The file is larger than the configured limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
        /// The maximum allowed file size in MB (for display)
        max_mb: u64,
    },

    /// A `${NAME}` reference names an unset variable and has no default.
    #[error("Environment variable '{0}' is not set and no default provided")]
    MissingEnvVar(String),

    /// The document is not valid YAML or does not have the expected shape.
    #[error("YAML error in '{path}': {message}")]
    Yaml {
        /// The file path, or `<inline>` for parsed strings
        path: PathBuf,
        /// The parser message
        message: String,
    },

    /// No top-level key starts with `config_block_`.
    #[error("No valid config_block found in '{0}'. Expected key starting with 'config_block_'")]
    NoConfigBlock(PathBuf),

    /// A required setting is absent.
    #[error("Missing required setting '{0}'")]
    MissingField(String),

    /// A test script entry is malformed.
    #[error("Invalid test entry {index}: {message}")]
    InvalidTest {
        /// Zero-based position in the script
        index: usize,
        /// What was wrong
        message: String,
    },

    /// Two tests share a name.
    #[error("Duplicate test name '{0}'")]
    DuplicateTest(String),

    /// A test's threshold block could not be resolved.
    #[error("Invalid threshold in test '{test}': {source}")]
    Threshold {
        /// The test name
        test: String,
        /// The underlying rule error
        #[source]
        source: CoreError,
    },
}

impl ConfigError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Create a YAML error with file path context.
    pub fn yaml(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Yaml {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid test entry error.
    pub fn invalid_test(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidTest {
            index,
            message: message.into(),
        }
    }
}
