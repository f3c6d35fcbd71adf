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

//! Execution loop tests against scripted connectors.

use dataqe_core::{
    ConnectorError, CoreError, ExecutionSummary, Preprocessor, Row, Side, Status,
    ValidationExecutor, Value,
};
use dataqe_test::fixtures::{self, builders::TestCaseBuilder, ORDERS_QUERY};
use dataqe_test::{LogCapture, ScriptedConnector};
use std::collections::HashMap;

fn releases() -> Vec<Row> {
    vec![Row::new()
        .with("source", "bcbsa")
        .with("current_release", "bcbsa_export1")
        .with("previous_release", "bcbsa_export3")]
}

fn templates() -> Preprocessor {
    let mut map = HashMap::new();
    map.insert(
        "weekly_releases".to_string(),
        "SELECT source, current_release, previous_release FROM releases".to_string(),
    );
    Preprocessor::new(map)
}

#[test]
fn test_paired_run_records_values_and_status() {
    let source = ScriptedConnector::new("source").respond_scalar(ORDERS_QUERY, 100);
    let target = ScriptedConnector::new("target").respond_scalar(ORDERS_QUERY, 110);
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));

    let results = executor
        .run(&[fixtures::percentage_test()], "orders.yml")
        .unwrap();

    assert_eq!(results.len(), 1);
    let record = &results[0];
    assert_eq!(record.test_name, "orders_count");
    assert_eq!(record.source_value, Some(Value::Int(100)));
    assert_eq!(record.target_value, Some(Value::Int(110)));
    assert_eq!(record.status, Status::Fail);
    assert_eq!(record.script_name, "orders.yml");
    assert!(record.end_time >= record.start_time);
    assert!(record.execution_time_ms >= record.source_query_time_ms);
}

#[test]
fn test_results_follow_declaration_order() {
    let source = ScriptedConnector::new("source")
        .respond_scalar(ORDERS_QUERY, 100)
        .respond_scalar("SELECT COUNT(*) - COUNT(DISTINCT id) FROM members", 1);
    let target = ScriptedConnector::new("target").respond_scalar(ORDERS_QUERY, 104);
    let history = source.history();
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));

    let tests = vec![fixtures::source_only_test(), fixtures::percentage_test()];
    let results = executor.run(&tests, "mixed.yml").unwrap();

    let names: Vec<_> = results.iter().map(|r| r.test_name.as_str()).collect();
    assert_eq!(names, vec!["duplicate_keys", "orders_count"]);
    assert!(results.iter().all(|r| r.status == Status::Pass));
    assert_eq!(results[0].target_value, None);
    assert_eq!(
        history.queries(),
        vec![
            "SELECT COUNT(*) - COUNT(DISTINCT id) FROM members".to_string(),
            ORDERS_QUERY.to_string()
        ]
    );
}

#[test]
fn test_empty_results_on_both_sides_fail() {
    let source = ScriptedConnector::new("source").respond(ORDERS_QUERY, vec![]);
    let target = ScriptedConnector::new("target").respond(ORDERS_QUERY, vec![]);
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));

    let results = executor.run(&[fixtures::percentage_test()], "empty.yml").unwrap();
    assert_eq!(results[0].source_value, Some(Value::Null));
    assert_eq!(results[0].target_value, None);
    assert_eq!(results[0].status, Status::Fail);
}

#[test]
fn test_empty_target_judges_source_alone() {
    let source = ScriptedConnector::new("source").respond_scalar(ORDERS_QUERY, 5);
    let target = ScriptedConnector::new("target").respond(ORDERS_QUERY, vec![]);
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));

    let results = executor.run(&[fixtures::percentage_test()], "empty.yml").unwrap();
    assert_eq!(results[0].source_value, Some(Value::Int(5)));
    assert_eq!(results[0].target_value, None);
    assert_eq!(results[0].status, Status::Pass);
}

#[test]
fn test_null_target_judges_source_alone() {
    let source = ScriptedConnector::new("source").respond_scalar(ORDERS_QUERY, 0);
    let target = ScriptedConnector::new("target").respond_scalar(ORDERS_QUERY, Value::Null);
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));

    let results = executor.run(&[fixtures::percentage_test()], "null.yml").unwrap();
    assert_eq!(results[0].target_value, None);
    assert_eq!(results[0].status, Status::Fail);
}

#[test]
fn test_missing_source_block_is_invalid() {
    let target = ScriptedConnector::new("target").respond_scalar("SELECT 1", 1);
    let test = TestCaseBuilder::new("target_only").target("SELECT 1").build();
    let logs = LogCapture::new();

    let mut executor =
        ValidationExecutor::new(None, Some(Box::new(target))).with_dispatch(logs.dispatch());
    let results = executor.run(&[test], "t.yml").unwrap();

    assert_eq!(results[0].status, Status::Invalid);
    assert_eq!(results[0].source_value, None);
    assert_eq!(results[0].target_value, Some(Value::Int(1)));
    assert!(logs.contains("has no source query"));
}

#[test]
fn test_query_failure_aborts_run() {
    let source = ScriptedConnector::new("source").fail(ORDERS_QUERY, "table missing");
    let target = ScriptedConnector::new("target").respond_scalar(ORDERS_QUERY, 1);
    let target_history = target.history();
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));

    let err = executor
        .run(&[fixtures::percentage_test(), fixtures::percentage_test()], "t.yml")
        .unwrap_err();

    match err {
        CoreError::Query { test, side, source } => {
            assert_eq!(test, "orders_count");
            assert_eq!(side, Side::Source);
            assert!(matches!(source, ConnectorError::Query { .. }));
        }
        other => panic!("expected query error, got {other:?}"),
    }
    assert!(target_history.queries().is_empty());
}

#[test]
fn test_missing_connector_is_fatal() {
    let source = ScriptedConnector::new("source").respond_scalar(ORDERS_QUERY, 1);
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), None);

    let err = executor.run(&[fixtures::percentage_test()], "t.yml").unwrap_err();
    assert_eq!(
        err,
        CoreError::MissingConnector {
            test: "orders_count".to_string(),
            side: Side::Target,
        }
    );
}

#[test]
fn test_connect_failure_is_fatal() {
    let source = ScriptedConnector::new("source")
        .fail_connect(ConnectorError::connection("source", "refused"));
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), None);

    let err = executor.run(&[fixtures::source_only_test()], "t.yml").unwrap_err();
    assert!(matches!(err, CoreError::Connector(ConnectorError::Connection { .. })));
}

#[test]
fn test_unused_side_is_never_connected() {
    let source = ScriptedConnector::new("source")
        .respond_scalar("SELECT COUNT(*) - COUNT(DISTINCT id) FROM members", 1);
    let target = ScriptedConnector::new("target")
        .fail_connect(ConnectorError::connection("target", "no such file"));
    let (s, t) = (source.history(), target.history());
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));

    let tests = vec![fixtures::source_only_test(), fixtures::source_only_test()];
    let results = executor.run(&tests, "t.yml").unwrap();

    assert!(results.iter().all(|r| r.status == Status::Pass));
    assert_eq!(s.connects(), 1);
    assert_eq!(t.connects(), 0);
}

#[test]
fn test_placeholders_are_resolved_on_the_target_connector() {
    let source = ScriptedConnector::new("source").respond_scalar("SELECT COUNT(*) FROM claims", 42);
    let target = ScriptedConnector::new("target")
        .respond(
            "SELECT source, current_release, previous_release FROM releases",
            releases(),
        )
        .respond_scalar("SELECT COUNT(*) FROM bcbsa_export1", 42);
    let source_history = source.history();
    let target_history = target.history();

    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)))
        .with_preprocessor(templates());
    let results = executor.run(&[fixtures::placeholder_test()], "weekly.yml").unwrap();

    assert_eq!(results[0].status, Status::Pass);
    assert_eq!(source_history.queries(), vec!["SELECT COUNT(*) FROM claims"]);
    assert_eq!(
        target_history.queries(),
        vec![
            "SELECT source, current_release, previous_release FROM releases",
            "SELECT COUNT(*) FROM bcbsa_export1"
        ]
    );
}

#[test]
fn test_preprocessing_failure_falls_back_to_original_query() {
    let source = ScriptedConnector::new("source").respond_scalar("SELECT COUNT(*) FROM claims", 1);
    let target = ScriptedConnector::new("target")
        .fail(
            "SELECT source, current_release, previous_release FROM releases",
            "permission denied",
        )
        .respond_scalar("SELECT COUNT(*) FROM BCBSA_CURR_WEEK", 1);
    let logs = LogCapture::new();

    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)))
        .with_preprocessor(templates())
        .with_dispatch(logs.dispatch());
    let results = executor.run(&[fixtures::placeholder_test()], "weekly.yml").unwrap();

    assert_eq!(results[0].status, Status::Pass);
    assert!(logs.contains("Preprocessing failed"));
    assert!(logs.contains("permission denied"));
}

#[test]
fn test_key_without_preprocessor_warns() {
    let source = ScriptedConnector::new("source").respond_scalar("SELECT COUNT(*) FROM claims", 1);
    let target = ScriptedConnector::new("target").respond_scalar("SELECT COUNT(*) FROM BCBSA_CURR_WEEK", 1);
    let logs = LogCapture::new();

    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)))
        .with_dispatch(logs.dispatch());
    executor.run(&[fixtures::placeholder_test()], "weekly.yml").unwrap();

    let warnings = logs.lines_containing("WARN");
    assert!(warnings.iter().any(|l| l.contains("weekly_releases")));
}

#[test]
fn test_close_closes_both_connectors() {
    let source = ScriptedConnector::new("source");
    let target = ScriptedConnector::new("target");
    let (s, t) = (source.history(), target.history());

    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));
    executor.close().unwrap();

    assert_eq!(s.closes(), 1);
    assert_eq!(t.closes(), 1);
}

#[test]
fn test_summary_over_fixture_run() {
    let source = ScriptedConnector::new("source")
        .respond_scalar(ORDERS_QUERY, 100)
        .respond_scalar("SELECT SUM(amount) FROM payments", 10.0)
        .respond_scalar("SELECT COUNT(*) FROM members", 5)
        .respond_scalar("SELECT COUNT(*) - COUNT(DISTINCT id) FROM members", 3);
    let target = ScriptedConnector::new("target")
        .respond_scalar(ORDERS_QUERY, 100)
        .respond_scalar("SELECT SUM(amount) FROM payments", 3.0)
        .respond_scalar("SELECT COUNT(*) FROM members", 3);
    let mut executor = ValidationExecutor::new(Some(Box::new(source)), Some(Box::new(target)));

    let tests = vec![
        fixtures::percentage_test(),
        fixtures::absolute_test(),
        fixtures::condition_test(),
        fixtures::source_only_test(),
    ];
    let results = executor.run(&tests, "all.yml").unwrap();
    let summary = ExecutionSummary::from_results(&results);

    assert_eq!(summary.total_tests, 4);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.critical_failed, 2);
}
