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

//! The run configuration file.

use crate::env::substitute_env_vars;
use crate::error::{ConfigError, ConfigResult};
use crate::file::read_file;
use dataqe_connect::DatabaseConfig;
use serde::Deserialize;
use serde_yaml::{Mapping, Value as Yaml};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of the top-level key holding the run settings.
pub const CONFIG_BLOCK_PREFIX: &str = "config_block_";

/// A loaded run configuration with every path resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Key of the selected block, e.g. `config_block_nightly`.
    pub block_name: String,
    /// Connection for source queries.
    pub source: Option<DatabaseConfig>,
    /// Connection for target queries.
    pub target: Option<DatabaseConfig>,
    /// Test script.
    pub validation_script: PathBuf,
    /// Template query file, if configured.
    pub preprocessor_queries: Option<PathBuf>,
}

impl RunConfig {
    /// File name of the test script, used to label results.
    pub fn script_name(&self) -> String {
        self.validation_script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.validation_script.display().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    source: Option<DatabaseConfig>,
    target: Option<DatabaseConfig>,
    #[serde(default)]
    other: RawOther,
}

#[derive(Debug, Default, Deserialize)]
struct RawOther {
    validation_script: Option<PathBuf>,
    preprocessor_queries: Option<PathBuf>,
}

/// Load the configuration at `path`.
///
/// Environment references are substituted before parsing. Relative paths
/// inside the file are resolved against the file's directory.
pub fn load_config(path: &Path) -> ConfigResult<RunConfig> {
    let text = read_file(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let config = parse_config(&text, base).map_err(|e| match e {
        ConfigError::Yaml { message, .. } => ConfigError::yaml(path, message),
        ConfigError::NoConfigBlock(_) => ConfigError::NoConfigBlock(path.to_path_buf()),
        other => other,
    })?;
    info!(
        "Loaded {} from {}",
        config.block_name,
        path.display()
    );
    Ok(config)
}

/// Parse configuration text, resolving relative paths against `base`.
pub fn parse_config(text: &str, base: &Path) -> ConfigResult<RunConfig> {
    let text = substitute_env_vars(text)?;
    let document: Yaml =
        serde_yaml::from_str(&text).map_err(|e| ConfigError::yaml("<inline>", e))?;
    let mapping = document
        .as_mapping()
        .ok_or_else(|| ConfigError::NoConfigBlock(PathBuf::from("<inline>")))?;

    let (block_name, block) = find_config_block(mapping)
        .ok_or_else(|| ConfigError::NoConfigBlock(PathBuf::from("<inline>")))?;
    debug!("Using configuration block {}", block_name);

    let raw: RawBlock =
        serde_yaml::from_value(block.clone()).map_err(|e| ConfigError::yaml("<inline>", e))?;

    let validation_script = raw
        .other
        .validation_script
        .ok_or_else(|| ConfigError::MissingField("other.validation_script".to_string()))?;

    let mut source = raw.source;
    let mut target = raw.target;
    for side in [&mut source, &mut target].into_iter().flatten() {
        side.resolve_paths(base);
    }

    Ok(RunConfig {
        block_name,
        source,
        target,
        validation_script: base.join(validation_script),
        preprocessor_queries: raw.other.preprocessor_queries.map(|p| base.join(p)),
    })
}

fn find_config_block(mapping: &Mapping) -> Option<(String, &Yaml)> {
    mapping.iter().find_map(|(key, value)| {
        key.as_str()
            .filter(|k| k.starts_with(CONFIG_BLOCK_PREFIX))
            .map(|k| (k.to_string(), value))
    })
}
