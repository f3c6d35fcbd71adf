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

//! Comparison rules, query preprocessing and the execution loop for DataQE.
//!
//! A validation run evaluates a list of [`TestCase`]s. Each test runs a
//! scalar query against a source system and optionally a target system,
//! then [`compare_values`] judges the pair using the test's expected
//! condition or [`ThresholdRule`].
//!
//! # Pipeline
//!
//! - [`Preprocessor`] rewrites `<SOURCE>_CURR_WEEK`/`<SOURCE>_PREV_WEEK`
//!   placeholders using release labels fetched by a template query
//! - [`Connector`] implementations run the query and return [`Row`]s
//! - [`ValidationExecutor`] drives the loop and produces [`ResultRecord`]s
//! - [`ExecutionSummary`] aggregates the records for reporting

mod comparator;
mod condition;
mod connector;
mod error;
mod executor;
mod preprocess;
mod result;
mod summary;
mod test_case;
mod threshold;
mod value;

pub use comparator::compare_values;
pub use condition::{Condition, Operator};
pub use connector::{first_value, Connector, Row};
pub use error::{ConnectorError, CoreError, CoreResult, PreprocessError};
pub use executor::ValidationExecutor;
pub use preprocess::{
    DatasetMapping, Preprocessor, ReleasePair, CURRENT_WEEK_SUFFIX, PREVIOUS_WEEK_SUFFIX,
};
pub use result::{ResultRecord, Status};
pub use summary::{format_duration, ExecutionSummary};
pub use test_case::{is_critical, Comparisons, QueryBlock, Side, TestCase, CRITICAL_SEVERITY};
pub use threshold::{ThresholdFields, ThresholdRule};
pub use value::Value;
