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

//! Environment variables: `${NAME}` substitution and run settings.

use crate::error::{ConfigError, ConfigResult};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory receiving reports.
pub const OUTPUT_DIR_ENV: &str = "DATAQE_OUTPUT_DIR";
/// Default for [`OUTPUT_DIR_ENV`].
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
/// Active deployment profile, selecting BigQuery location and infra-core.
pub const PROFILE_ENV: &str = "SPRING_PROFILES_ACTIVE";
/// Default for [`PROFILE_ENV`].
pub const DEFAULT_PROFILE: &str = "mylocal";

static ENV_REFERENCE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn env_reference() -> ConfigResult<&'static Regex> {
    ENV_REFERENCE
        .get_or_init(|| Regex::new(r"\$\{([^}]+)\}"))
        .as_ref()
        .map_err(|e| ConfigError::yaml("<pattern>", e))
}

/// Replace `${NAME}` and `${NAME:default}` with values from the process
/// environment.
///
/// The default is everything after the first `:` and may be empty.
pub fn substitute_env_vars(text: &str) -> ConfigResult<String> {
    substitute_with(text, |name| std::env::var(name).ok())
}

/// [`substitute_env_vars`] with an explicit variable lookup.
///
/// ```
/// use dataqe_config::substitute_with;
///
/// let lookup = |name: &str| (name == "HOST").then(|| "db.local".to_string());
/// let text = substitute_with("host: ${HOST}\nport: ${PORT:5432}", lookup).unwrap();
/// assert_eq!(text, "host: db.local\nport: 5432");
///
/// assert!(substitute_with("user: ${USER_NAME}", lookup).is_err());
/// ```
pub fn substitute_with<F>(text: &str, lookup: F) -> ConfigResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = env_reference()?;
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let (name, default) = match expr.as_str().split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (expr.as_str(), None),
        };
        let value = lookup(name)
            .or_else(|| default.map(str::to_string))
            .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))?;

        out.push_str(&text[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Settings taken from the environment for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEnvironment {
    /// Report directory, from [`OUTPUT_DIR_ENV`].
    pub output_dir: PathBuf,
    /// `DATAQE_APP_NAME`, recorded in the automation summary.
    pub app_name: String,
    /// `DATAQE_BRANCH`.
    pub branch: String,
    /// `DATAQE_PLATFORM`.
    pub platform: String,
    /// `DATAQE_OWNER`.
    pub owner: String,
    /// Value of `SPRING_PROFILES_ACTIVE`.
    pub profile: String,
}

impl RunEnvironment {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read through `lookup`, applying defaults for unset or empty values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            output_dir: PathBuf::from(get(OUTPUT_DIR_ENV, DEFAULT_OUTPUT_DIR)),
            app_name: get("DATAQE_APP_NAME", "default_app"),
            branch: get("DATAQE_BRANCH", "default_branch"),
            platform: get("DATAQE_PLATFORM", "default_platform"),
            owner: get("DATAQE_OWNER", "default_owner"),
            profile: get(PROFILE_ENV, DEFAULT_PROFILE),
        }
    }
}

impl Default for RunEnvironment {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_substitute_set_and_default() {
        let lookup = vars(&[("PROJECT", "acme-h-prod")]);
        let out = substitute_with(
            "project: ${PROJECT}\ndataset: ${DATASET:claims}\nempty: '${EMPTY:}'",
            lookup,
        )
        .unwrap();
        assert_eq!(out, "project: acme-h-prod\ndataset: claims\nempty: ''");
    }

    #[test]
    fn test_set_value_beats_default() {
        let out = substitute_with("${A:fallback}", vars(&[("A", "set")])).unwrap();
        assert_eq!(out, "set");
    }

    #[test]
    fn test_default_keeps_later_colons() {
        let out = substitute_with("${URL:http://localhost:8080}", vars(&[])).unwrap();
        assert_eq!(out, "http://localhost:8080");
    }

    #[test]
    fn test_missing_without_default() {
        let err = substitute_with("a: ${NOPE}", vars(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("NOPE".to_string()));
    }

    #[test]
    fn test_text_without_references_is_unchanged() {
        let text = "cost: $5 and {braces} and $NAME";
        assert_eq!(substitute_with(text, vars(&[])).unwrap(), text);
    }

    #[test]
    fn test_run_environment_defaults() {
        let env = RunEnvironment::default();
        assert_eq!(env.output_dir, PathBuf::from("./output"));
        assert_eq!(env.app_name, "default_app");
        assert_eq!(env.branch, "default_branch");
        assert_eq!(env.platform, "default_platform");
        assert_eq!(env.owner, "default_owner");
        assert_eq!(env.profile, "mylocal");
    }

    #[test]
    fn test_run_environment_overrides() {
        let env = RunEnvironment::from_lookup(vars(&[
            ("DATAQE_OUTPUT_DIR", "/tmp/reports"),
            ("DATAQE_APP_NAME", "claims"),
            ("SPRING_PROFILES_ACTIVE", "prod"),
            ("DATAQE_OWNER", ""),
        ]));
        assert_eq!(env.output_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(env.app_name, "claims");
        assert_eq!(env.profile, "prod");
        assert_eq!(env.owner, "default_owner");
    }
}
