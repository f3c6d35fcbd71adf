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

//! Run configuration, test script and template query loading for DataQE.
//!
//! A run starts from a YAML configuration file whose first
//! `config_block_*` entry names the source and target connections, the
//! test script and an optional template query file:
//!
//! ```yaml
//! config_block_nightly:
//!   source:
//!     database_type: sqlite
//!     sqlite: { path: source.db }
//!   target:
//!     database_type: gcpbq
//!     gcp: { project_id: "${GCP_PROJECT}", use_encryption: true }
//!   other:
//!     validation_script: tests.yml
//!     preprocessor_queries: preprocessor_queries.yml
//! ```
//!
//! `${NAME}` and `${NAME:default}` references are replaced from the
//! environment before parsing, and relative paths resolve against the
//! configuration file's directory.

mod env;
mod error;
mod file;
mod preprocessor;
mod run_config;
mod test_script;

pub use env::{
    substitute_env_vars, substitute_with, RunEnvironment, DEFAULT_OUTPUT_DIR, DEFAULT_PROFILE,
    OUTPUT_DIR_ENV, PROFILE_ENV,
};
pub use error::{ConfigError, ConfigResult};
pub use file::{
    max_file_size, read_file, read_file_with_limit, DEFAULT_MAX_FILE_SIZE, MAX_FILE_SIZE_ENV,
};
pub use preprocessor::{load_preprocessor, load_preprocessor_queries, parse_preprocessor_queries};
pub use run_config::{load_config, parse_config, RunConfig, CONFIG_BLOCK_PREFIX};
pub use test_script::{load_test_cases, parse_test_cases};
