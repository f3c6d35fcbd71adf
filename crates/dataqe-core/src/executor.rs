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

//! The sequential execution loop.

use crate::comparator::compare_values;
use crate::connector::{first_value, Connector};
use crate::error::{CoreError, CoreResult};
use crate::preprocess::Preprocessor;
use crate::result::{ResultRecord, Status};
use crate::test_case::{QueryBlock, Side, TestCase};
use crate::value::Value;
use chrono::Local;
use std::time::Instant;
use tracing::{debug, info, warn, Dispatch};

/// Runs test cases against a source and a target connector.
///
/// Tests run one at a time in declaration order. A connector is opened the
/// first time a test queries its side, so an unused side is never touched.
/// A query failure on either side aborts the run; a preprocessing failure
/// only falls back to the unprocessed query.
pub struct ValidationExecutor {
    source: Option<Box<dyn Connector>>,
    target: Option<Box<dyn Connector>>,
    preprocessor: Option<Preprocessor>,
    dispatch: Option<Dispatch>,
}

impl ValidationExecutor {
    /// Create an executor. Either connector may be absent when no test uses
    /// that side.
    pub fn new(source: Option<Box<dyn Connector>>, target: Option<Box<dyn Connector>>) -> Self {
        Self {
            source,
            target,
            preprocessor: None,
            dispatch: None,
        }
    }

    /// Use `preprocessor` for blocks that declare a `config_query_key`.
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// Emit log events to `dispatch` instead of the thread's default
    /// subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Evaluate every test and return one record per test, in order.
    pub fn run(&mut self, tests: &[TestCase], script_name: &str) -> CoreResult<Vec<ResultRecord>> {
        match self.dispatch.clone() {
            Some(dispatch) => {
                tracing::dispatcher::with_default(&dispatch, || self.run_inner(tests, script_name))
            }
            None => self.run_inner(tests, script_name),
        }
    }

    /// Close both connectors. The first failure is returned after both have
    /// been attempted.
    pub fn close(&mut self) -> CoreResult<()> {
        let source = self.source.as_mut().map(|c| c.close()).transpose();
        let target = self.target.as_mut().map(|c| c.close()).transpose();
        source?;
        target?;
        Ok(())
    }

    fn run_inner(&mut self, tests: &[TestCase], script_name: &str) -> CoreResult<Vec<ResultRecord>> {
        info!("Running {} tests from {}", tests.len(), script_name);

        let mut results = Vec::with_capacity(tests.len());
        for test in tests {
            let record = self.run_test(test, script_name)?;
            info!(
                "{} - {} ({:.2} ms)",
                record.test_name, record.status, record.execution_time_ms
            );
            results.push(record);
        }
        Ok(results)
    }

    fn run_test(&mut self, test: &TestCase, script_name: &str) -> CoreResult<ResultRecord> {
        let start_time = Local::now();
        let started = Instant::now();

        let mut source_query_time_ms = 0.0;
        let mut target_query_time_ms = 0.0;
        let mut comparison_time_ms = 0.0;

        let source_value = match &test.source {
            Some(block) => {
                let (value, elapsed) = self.query_side(test, Side::Source, block)?;
                source_query_time_ms = elapsed;
                Some(value)
            }
            None => None,
        };

        let target_value = match &test.target {
            Some(block) => {
                let (value, elapsed) = self.query_side(test, Side::Target, block)?;
                target_query_time_ms = elapsed;
                // An empty or NULL target judges the source on its own.
                Some(value).filter(|v| !v.is_null())
            }
            None => None,
        };

        let status = match &source_value {
            Some(source) => {
                let compared = Instant::now();
                let status = compare_values(source, target_value.as_ref(), test);
                comparison_time_ms = elapsed_ms(compared);
                status
            }
            None => {
                warn!("Test '{}' has no source query", test.name);
                Status::Invalid
            }
        };

        Ok(ResultRecord {
            test_name: test.name.clone(),
            severity: test.severity.clone(),
            source_value,
            target_value,
            status,
            start_time,
            end_time: Local::now(),
            execution_time_ms: elapsed_ms(started),
            source_query_time_ms,
            target_query_time_ms,
            comparison_time_ms,
            script_name: script_name.to_string(),
        })
    }

    fn query_side(
        &mut self,
        test: &TestCase,
        side: Side,
        block: &QueryBlock,
    ) -> CoreResult<(Value, f64)> {
        let preprocessor = self.preprocessor.as_ref();
        let connector = match side {
            Side::Source => self.source.as_mut(),
            Side::Target => self.target.as_mut(),
        }
        .ok_or_else(|| CoreError::MissingConnector {
            test: test.name.clone(),
            side,
        })?;
        connector.connect()?;

        let query = prepare_query(preprocessor, block, connector.as_mut());
        debug!("{} query for '{}': {}", side, test.name, query);

        let started = Instant::now();
        let rows = connector
            .execute_query(&query)
            .map_err(|source| CoreError::Query {
                test: test.name.clone(),
                side,
                source,
            })?;
        let elapsed = elapsed_ms(started);

        Ok((first_value(&rows).unwrap_or(Value::Null), elapsed))
    }
}

fn prepare_query(
    preprocessor: Option<&Preprocessor>,
    block: &QueryBlock,
    connector: &mut dyn Connector,
) -> String {
    let Some(key) = block.config_query_key.as_deref() else {
        return block.query.clone();
    };
    let Some(preprocessor) = preprocessor else {
        warn!(
            "config_query_key '{}' specified but no preprocessor queries are loaded",
            key
        );
        return block.query.clone();
    };

    match preprocessor.process_query(&block.query, Some(key), block.source_name.as_deref(), connector) {
        Ok(query) => query,
        Err(e) => {
            warn!("Preprocessing failed, using the original query: {}", e);
            block.query.clone()
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
