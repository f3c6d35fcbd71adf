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

//! Size-limited file reading.

use crate::error::{ConfigError, ConfigResult};
use std::fs;
use std::path::Path;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`], in bytes.
pub const MAX_FILE_SIZE_ENV: &str = "DATAQE_MAX_FILE_SIZE";

/// Default maximum size of any configuration input (16 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// The maximum input size, from [`MAX_FILE_SIZE_ENV`] or the default.
pub fn max_file_size() -> u64 {
    std::env::var(MAX_FILE_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read a UTF-8 file, refusing files larger than [`max_file_size`].
pub fn read_file(path: &Path) -> ConfigResult<String> {
    read_file_with_limit(path, max_file_size())
}

/// Read a UTF-8 file, refusing files larger than `max` bytes.
pub fn read_file_with_limit(path: &Path, max: u64) -> ConfigResult<String> {
    let metadata = fs::metadata(path).map_err(|e| ConfigError::io_error(path, e))?;
    if metadata.len() > max {
        return Err(ConfigError::file_too_large(path, metadata.len(), max));
    }
    fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_within_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.yml");
        fs::write(&path, "key: value\n").unwrap();
        assert_eq!(read_file_with_limit(&path, 1024).unwrap(), "key: value\n");
    }

    #[test]
    fn test_read_over_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.yml");
        fs::write(&path, "0123456789").unwrap();
        assert!(matches!(
            read_file_with_limit(&path, 5),
            Err(ConfigError::FileTooLarge { actual: 10, max: 5, .. })
        ));
    }

    #[test]
    fn test_read_missing() {
        let dir = TempDir::new().unwrap();
        let err = read_file_with_limit(&dir.path().join("none.yml"), 5).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
