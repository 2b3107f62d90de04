#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

fn jsonfield_cmd() -> Command {
    let mut cmd = Command::cargo_bin("jsonfield").unwrap();
    cmd.env_remove("JSONFIELD_FIELD").env_remove("RUST_LOG");
    cmd
}

fn output_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn flatten_prints_root_keyed_and_presence_tokens() {
    let output = jsonfield_cmd()
        .arg("flatten")
        .write_stdin(r#"{"key1": "some value", "key2": {"key3": true}}"#)
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = output_lines(&output.stdout);
    let values: Vec<&str> = lines.iter().map(|l| l["value"].as_str().unwrap()).collect();
    assert_eq!(
        values,
        vec![
            "some value",
            "key1\u{0}some value",
            "true",
            "key2.key3\u{0}true",
            "json_field"
        ]
    );
    assert_eq!(lines[1]["kind"], "keyed");
    assert_eq!(lines[1]["field"], "json_field._keyed");
    assert_eq!(lines[4]["kind"], "field_presence");
}

#[test]
fn flatten_applies_mapping_file() {
    let dir = tempfile::tempdir().unwrap();
    let mapping = dir.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"type": "json", "ignore_above": 3, "null_value": "nil"}"#)
        .unwrap();
    let input = dir.path().join("docs.json");
    std::fs::write(&input, "{\"a\": \"long\", \"b\": null}\n{\"c\": \"ok\"}\n").unwrap();

    let output = jsonfield_cmd()
        .arg("flatten")
        .arg("--mapping")
        .arg(&mapping)
        .arg("--field")
        .arg("labels")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = output_lines(&output.stdout);
    let pairs: Vec<(u64, &str)> = lines
        .iter()
        .map(|l| (l["doc"].as_u64().unwrap(), l["value"].as_str().unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (0, "nil"),
            (0, "b\u{0}nil"),
            (0, "labels"),
            (1, "ok"),
            (1, "c\u{0}ok"),
            (1, "labels"),
        ]
    );
}

#[test]
fn flatten_field_name_from_env() {
    let output = jsonfield_cmd()
        .env("JSONFIELD_FIELD", "meta")
        .arg("flatten")
        .write_stdin(r#"{"a": 1}"#)
        .output()
        .unwrap();
    let lines = output_lines(&output.stdout);
    assert_eq!(lines[0]["field"], "meta");
    assert_eq!(lines[1]["field"], "meta._keyed");
}

#[test]
fn flatten_rejects_non_object_input() {
    jsonfield_cmd()
        .arg("flatten")
        .write_stdin("[1, 2]")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("START_OBJECT"));
}

#[test]
fn flatten_rejects_invalid_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let mapping = dir.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"ignore_above": -1}"#).unwrap();

    jsonfield_cmd()
        .arg("flatten")
        .arg("--mapping")
        .arg(&mapping)
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(contains("[ignore_above] must be positive, got -1"));
}

#[test]
fn search_counts_root_and_keyed_matches() {
    let input = r#"{"priority": "urgent"} {"owner": "urgent"} {"priority": "low"}"#;

    jsonfield_cmd()
        .args(["search", "--value", "urgent"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("2\n");

    jsonfield_cmd()
        .args(["search", "--key", "priority", "--value", "urgent"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn search_exists() {
    jsonfield_cmd()
        .args(["search", "--exists"])
        .write_stdin(r#"{"a": "x"} {} {"b": null}"#)
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn capabilities_lists_every_kind() {
    jsonfield_cmd()
        .arg("capabilities")
        .assert()
        .success()
        .stdout(contains("term\tsupported"))
        .stdout(contains("exists\tsupported"))
        .stdout(contains("wildcard\trejected"))
        .stdout(contains("fuzzy\trejected"));
}
