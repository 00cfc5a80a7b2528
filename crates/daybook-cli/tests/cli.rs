//! End-to-end tests for the `daybook` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

fn daybook() -> Command {
    let mut cmd = Command::cargo_bin("daybook").unwrap();
    cmd.env_remove("DAYBOOK_TZ").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(args: &[&str]) -> Value {
    let output = daybook().args(args).assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_year_frozen_clock() {
    assert_eq!(stdout_json(&["--now", "2024-06-01T10:00:00Z", "year"]), json!(2024));
}

#[test]
fn test_year_frozen_clock_in_timezone() {
    let value = stdout_json(&[
        "--tz",
        "America/New_York",
        "--now",
        "2025-01-01T03:00:00Z",
        "year",
    ]);
    assert_eq!(value, json!(2024));
}

#[test]
fn test_add_days_and_negative_amount() {
    assert_eq!(
        stdout_json(&["add", "2024-01-01T00:00:00Z", "5"]),
        json!("2024-01-06T00:00:00Z")
    );
    assert_eq!(
        stdout_json(&["add", "2024-01-10T00:00:00Z", "-3", "--unit", "days"]),
        json!("2024-01-07T00:00:00Z")
    );
}

#[test]
fn test_add_invalid_date() {
    daybook()
        .args(["add", "invalid", "1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid date provided"));
}

#[test]
fn test_add_nan_amount() {
    daybook()
        .args(["add", "2024-01-01", "NaN"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount provided"));
}

#[test]
fn test_add_unknown_unit() {
    daybook()
        .args(["add", "2024-01-01", "1", "--unit", "fortnights"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid type provided"));
}

#[test]
fn test_within_exclusive_and_inverted() {
    assert_eq!(
        stdout_json(&["within", "2024-01-05", "2024-01-01", "2024-01-10"]),
        json!(true)
    );
    assert_eq!(
        stdout_json(&["within", "2024-01-01", "2024-01-01", "2024-01-10"]),
        json!(false)
    );
    daybook()
        .args(["within", "2024-01-05", "2024-01-10", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid range: from date must be before to date",
        ));
}

#[test]
fn test_add_days_around_dst_in_new_york() {
    let add = |ts: &str, amount: &str| {
        stdout_json(&["--tz", "America/New_York", "add", ts, amount])
    };
    assert_eq!(add("2024-11-03T06:30:00Z", "0"), json!("2024-11-03T06:30:00Z"));
    assert_eq!(add("2024-11-04T06:30:00Z", "-1"), json!("2024-11-03T06:30:00Z"));
    assert_eq!(add("2024-03-09T07:30:00Z", "1"), json!("2024-03-10T07:30:00Z"));
}

#[test]
fn test_before_and_same_day() {
    assert_eq!(stdout_json(&["before", "2024-01-01", "2024-01-02"]), json!(true));
    assert_eq!(stdout_json(&["before", "2024-01-01", "2024-01-01"]), json!(false));
    assert_eq!(
        stdout_json(&["same-day", "2024-12-25T00:00:01Z", "2024-12-25T23:59:59Z"]),
        json!(true)
    );
}

#[test]
fn test_holidays_listing() {
    let value = stdout_json(&["holidays", "2024"]);
    assert_eq!(
        value,
        json!([
            { "name": "New Year's Day", "date": "2024-01-01", "timestamp": "2024-01-01T00:00:00Z" },
            { "name": "Christmas Day", "date": "2024-12-25", "timestamp": "2024-12-25T00:00:00Z" },
            { "name": "New Year's Eve", "date": "2024-12-31", "timestamp": "2024-12-31T00:00:00Z" },
        ])
    );
}

#[test]
fn test_is_holiday() {
    assert_eq!(stdout_json(&["is-holiday", "2024-12-25T15:30"]), json!(true));
    assert_eq!(stdout_json(&["is-holiday", "2024-12-24T12:00"]), json!(false));
}

#[test]
fn test_array_commands() {
    assert_eq!(stdout_json(&["unique", "[1,2,2,3,1]"]), json!([1, 2, 3]));
    assert_eq!(stdout_json(&["flatten", "[1,[2,[3]],4]"]), json!([1, 2, 3, 4]));
    assert_eq!(
        stdout_json(&["chunk", "[1,2,3,4,5]", "2"]),
        json!([[1, 2], [3, 4], [5]])
    );
    assert_eq!(stdout_json(&["chunk", "[]", "3"]), json!([]));
}

#[test]
fn test_array_commands_treat_numbers_by_value() {
    assert_eq!(stdout_json(&["unique", "[1, 1.0, 2]"]), json!([1, 2]));
    assert_eq!(
        stdout_json(&["chunk", "[1,2,3]", "2.0"]),
        json!([[1, 2], [3]])
    );
}

#[test]
fn test_chunk_invalid_sizes() {
    for size in ["0", "-1", "2.5"] {
        daybook()
            .args(["chunk", "[1,2,3]", size])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Chunk size must be a positive integer"));
    }
}

#[test]
fn test_flatten_rejects_non_array() {
    daybook()
        .args(["flatten", "{\"a\": 1}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a JSON array"));
}

#[test]
fn test_password_validation() {
    assert_eq!(
        stdout_json(&["password", "Abcdef1!"]),
        json!({ "valid": true, "errors": [] })
    );
    let weak = stdout_json(&["password", "short"]);
    assert_eq!(weak["valid"], json!(false));
    assert!(weak["errors"].as_array().unwrap().len() > 1);
}
