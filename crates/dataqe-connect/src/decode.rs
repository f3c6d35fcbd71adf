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


//! Text-to-value decoding shared by connectors whose drivers hand back
//! numbers as strings.

use dataqe_core::Value;

/// Decode a DECIMAL or NUMERIC literal.
///
/// Whole numbers that fit in an `i64` (including `"12.000"`) decode exactly
/// to [`Value::Int`]; anything else becomes a [`Value::Float`], which keeps
/// about 15 significant digits.
pub(crate) fn decimal(text: &str) -> Option<Value> {
    let text = text.trim();
    let whole = match text.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
        Some(_) => return text.parse().ok().map(Value::Float),
        None => text,
    };
    match whole.parse::<i64>() {
        Ok(n) => Some(Value::Int(n)),
        Err(_) => text.parse().ok().map(Value::Float),
    }
}

/// Decode an integer column, widening to a decimal for values past `i64`.
pub(crate) fn integer(text: &str) -> Option<Value> {
    match text.trim().parse::<i64>() {
        Ok(n) => Some(Value::Int(n)),
        Err(_) => decimal(text),
    }
}
