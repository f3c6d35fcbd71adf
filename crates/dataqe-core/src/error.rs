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

//! Error types for the comparison and execution core.

use crate::test_case::Side;
use thiserror::Error;

/// Result alias used throughout the core crate.
pub type CoreResult<T> = Result<T, CoreError>;

/// Failure reported by a [`Connector`](crate::Connector) implementation.
///
/// The execution loop does not recover from these; they abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectorError {
    /// Opening the connection failed.
    #[error("failed to connect to {backend}: {message}")]
    Connection {
        /// Backend name (e.g. "sqlite", "bigquery")
        backend: String,
        /// The error message
        message: String,
    },

    /// Credentials were missing or rejected.
    #[error("authentication with {backend} failed: {message}")]
    Authentication {
        /// Backend name
        backend: String,
        /// The error message
        message: String,
    },

    /// The query was rejected or failed during execution.
    #[error("failed to execute {backend} query: {message}")]
    Query {
        /// Backend name
        backend: String,
        /// The error message
        message: String,
    },

    /// The backend did not finish the query within its wait limit.
    #[error("{backend} query did not complete within {timeout_secs} seconds")]
    Timeout {
        /// Backend name
        backend: String,
        /// The wait limit in seconds
        timeout_secs: u64,
    },

    /// The connector configuration cannot be used.
    #[error("invalid {backend} configuration: {message}")]
    Configuration {
        /// Backend name
        backend: String,
        /// The error message
        message: String,
    },
}

impl ConnectorError {
    /// Create a connection error.
    pub fn connection(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Authentication {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a query error.
    pub fn query(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(backend: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            backend: backend.into(),
            timeout_secs,
        }
    }

    /// Create a configuration error.
    pub fn configuration(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            backend: backend.into(),
            message: message.into(),
        }
    }
}

/// Failure while building dataset mappings for placeholder replacement.
///
/// These errors are recoverable: the execution loop logs them and runs the
/// unprocessed query instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreprocessError {
    /// The mapping query could not be executed.
    #[error("preprocessor query '{key}' failed: {source}")]
    Query {
        /// The config query key whose template was executed
        key: String,
        /// The underlying connector failure
        #[source]
        source: ConnectorError,
    },

    /// A result row could not be turned into a dataset mapping.
    #[error("preprocessor query '{key}' returned a malformed row {index}: {reason}")]
    MalformedRow {
        /// The config query key whose template was executed
        key: String,
        /// Zero-based row index
        index: usize,
        /// What was wrong with the row
        reason: String,
    },
}

/// Errors raised by the core while building or running test cases.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A comparison operator token was not one of `<= >= == != < >`.
    #[error("unknown comparison operator '{0}' (expected one of <=, >=, ==, !=, <, >)")]
    UnknownOperator(String),

    /// The threshold block combines fields that select different modes,
    /// or uses an unsupported mode.
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    /// A test declares a query block for a side that has no connector.
    #[error("test '{test}' has a {side} query but no {side} connector is configured")]
    MissingConnector {
        /// The test name
        test: String,
        /// Which side is missing
        side: Side,
    },

    /// A source or target query failed; this aborts the run.
    #[error("{side} query for test '{test}' failed: {source}")]
    Query {
        /// The test name
        test: String,
        /// Which side failed
        side: Side,
        /// The underlying connector failure
        #[source]
        source: ConnectorError,
    },

    /// Connector failure outside of a specific test (e.g. on close).
    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

impl CoreError {
    /// Create an invalid threshold error.
    pub fn invalid_threshold(msg: impl Into<String>) -> Self {
        Self::InvalidThreshold(msg.into())
    }
}
