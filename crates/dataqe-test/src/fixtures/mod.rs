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

//! Canonical test cases and YAML documents.
//!
//! Test cases come in two forms: ready-made ones such as
//! [`percentage_test`], and the [`builders::TestCaseBuilder`] for anything
//! more specific. [`documents`] holds YAML text for the configuration
//! loaders and [`errors`] holds documents they must reject.

pub mod builders;
pub mod documents;
pub mod errors;

use builders::TestCaseBuilder;
use dataqe_core::{Operator, Side, TestCase};

/// Query shared by the paired fixtures.
pub const ORDERS_QUERY: &str = "SELECT COUNT(*) FROM orders";

/// Source and target row counts within 5% of each other.
pub fn percentage_test() -> TestCase {
    TestCaseBuilder::new("orders_count")
        .source(ORDERS_QUERY)
        .target(ORDERS_QUERY)
        .percentage(5.0)
        .comment("row counts within 5%")
        .build()
}

/// Source and target sums within 5 units of each other.
pub fn absolute_test() -> TestCase {
    TestCaseBuilder::new("revenue_total")
        .source("SELECT SUM(amount) FROM payments")
        .target("SELECT SUM(amount) FROM payments")
        .absolute(5.0)
        .build()
}

/// Fails when the source exceeds the target.
pub fn condition_test() -> TestCase {
    TestCaseBuilder::new("no_extra_rows")
        .source("SELECT COUNT(*) FROM members")
        .target("SELECT COUNT(*) FROM members")
        .condition(Operator::Greater)
        .critical()
        .build()
}

/// Source-only test expecting at most two duplicates.
pub fn source_only_test() -> TestCase {
    TestCaseBuilder::new("duplicate_keys")
        .source("SELECT COUNT(*) - COUNT(DISTINCT id) FROM members")
        .expect("<=2")
        .critical()
        .build()
}

/// Target query with release placeholders resolved through `weekly_releases`.
pub fn placeholder_test() -> TestCase {
    TestCaseBuilder::new("weekly_claims")
        .source("SELECT COUNT(*) FROM claims")
        .target("SELECT COUNT(*) FROM BCBSA_CURR_WEEK")
        .placeholders(Side::Target, "weekly_releases", "bcbsa")
        .build()
}

/// Every named fixture.
pub fn all() -> Vec<(&'static str, fn() -> TestCase)> {
    vec![
        ("percentage", percentage_test),
        ("absolute", absolute_test),
        ("condition", condition_test),
        ("source_only", source_only_test),
        ("placeholder", placeholder_test),
    ]
}
