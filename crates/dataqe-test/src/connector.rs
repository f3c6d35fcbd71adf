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

//! An in-memory connector with canned responses.

use dataqe_core::{Connector, ConnectorError, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct History {
    queries: Vec<String>,
    connects: usize,
    closes: usize,
}

/// Shared view of what a [`ScriptedConnector`] was asked to do.
///
/// Stays readable after the connector has been moved into an executor.
#[derive(Debug, Clone, Default)]
pub struct QueryHistory(Arc<Mutex<History>>);

impl QueryHistory {
    fn lock(&self) -> MutexGuard<'_, History> {
        // A panic in another test thread must not hide this test's history.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every executed query, in order.
    pub fn queries(&self) -> Vec<String> {
        self.lock().queries.clone()
    }

    /// Number of times the connection was opened, or attempted while closed.
    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    /// Number of `close` calls.
    pub fn closes(&self) -> usize {
        self.lock().closes
    }
}

/// Connector returning scripted rows or failures per query text.
///
/// A query with no scripted response fails with a query error.
#[derive(Debug, Clone)]
pub struct ScriptedConnector {
    backend: String,
    responses: HashMap<String, Result<Vec<Row>, ConnectorError>>,
    connect_error: Option<ConnectorError>,
    open: bool,
    history: QueryHistory,
}

impl ScriptedConnector {
    /// Create a connector reporting `backend` as its name.
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            responses: HashMap::new(),
            connect_error: None,
            open: false,
            history: QueryHistory::default(),
        }
    }

    /// Return `rows` whenever `query` runs.
    pub fn respond(mut self, query: impl Into<String>, rows: Vec<Row>) -> Self {
        self.responses.insert(query.into(), Ok(rows));
        self
    }

    /// Return a single-row, single-column result for `query`.
    pub fn respond_scalar(self, query: impl Into<String>, value: impl Into<dataqe_core::Value>) -> Self {
        self.respond(query, vec![Row::new().with("value", value)])
    }

    /// Fail with a query error whenever `query` runs.
    pub fn fail(mut self, query: impl Into<String>, message: impl Into<String>) -> Self {
        let err = ConnectorError::query(self.backend.clone(), message);
        self.responses.insert(query.into(), Err(err));
        self
    }

    /// Fail every `connect` call with `err`.
    pub fn fail_connect(mut self, err: ConnectorError) -> Self {
        self.connect_error = Some(err);
        self
    }

    /// Handle to this connector's history.
    pub fn history(&self) -> QueryHistory {
        self.history.clone()
    }
}

impl Connector for ScriptedConnector {
    fn backend(&self) -> &str {
        &self.backend
    }

    fn connect(&mut self) -> Result<(), ConnectorError> {
        if self.open {
            return Ok(());
        }
        self.history.lock().connects += 1;
        match &self.connect_error {
            Some(err) => Err(err.clone()),
            None => {
                self.open = true;
                Ok(())
            }
        }
    }

    fn execute_query(&mut self, query: &str) -> Result<Vec<Row>, ConnectorError> {
        self.history.lock().queries.push(query.to_string());
        match self.responses.get(query) {
            Some(response) => response.clone(),
            None => Err(ConnectorError::query(
                self.backend.clone(),
                format!("no scripted response for: {query}"),
            )),
        }
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        self.open = false;
        self.history.lock().closes += 1;
        Ok(())
    }
}
