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

//! Shared test fixtures and utilities for DataQE.
//!
//! # Quick Start
//!
//! ```rust
//! use dataqe_core::{Row, ValidationExecutor};
//! use dataqe_test::{fixtures, LogCapture, ScriptedConnector};
//!
//! let source = ScriptedConnector::new("source")
//!     .respond("SELECT COUNT(*) FROM orders", vec![Row::new().with("n", 100)]);
//! let target = ScriptedConnector::new("target")
//!     .respond("SELECT COUNT(*) FROM orders", vec![Row::new().with("n", 104)]);
//! let history = source.history();
//!
//! let logs = LogCapture::new();
//! let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)))
//!     .with_dispatch(logs.dispatch());
//!
//! let results = executor.run(&[fixtures::percentage_test()], "orders.yml").unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(history.queries(), vec!["SELECT COUNT(*) FROM orders"]);
//! assert!(logs.contains("orders_count"));
//! ```

mod connector;
mod logging;

/// Canonical test cases and YAML documents.
pub mod fixtures;

pub use connector::{QueryHistory, ScriptedConnector};
pub use logging::LogCapture;
