//! Integration tests for the kvue CLI
//!
//! These tests run the actual binary against templates in a temp dir.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const COUNTER: &str = r#"<div id="app"><span id="s">{{count}}</span><input id="in" k-model="count"><p id="msg" k-text="msg"></p></div>"#;

/// Get the binary to test, isolated from the caller's KVUE_* variables
fn kvue_cmd() -> Command {
    let mut cmd = Command::cargo_bin("kvue").unwrap();
    cmd.env_remove("KVUE_DIRECTIVE_PREFIX")
        .env_remove("KVUE_EVENT_PREFIX")
        .env_remove("KVUE_ON_MISSING_METHOD")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_flag() {
    kvue_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("check"));
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_with_json_data() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "counter.html", COUNTER);
    let data = write(&dir, "data.json", r#"{"count": 2, "msg": "hi"}"#);

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<span id="s">2</span>"#))
        .stdout(predicate::str::contains(r#"<p id="msg" k-text="msg">hi</p>"#));
}

#[test]
fn test_render_with_yaml_data() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "counter.html", COUNTER);
    let data = write(&dir, "data.yaml", "count: 7\nmsg: from yaml\n");

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<span id="s">7</span>"#))
        .stdout(predicate::str::contains("from yaml"));
}

#[test]
fn test_render_replays_steps() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "counter.html", COUNTER);
    let data = write(&dir, "data.json", r#"{"count": 0, "msg": ""}"#);

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .args(["--step", "input:#in=5", "--step", "set:msg=\"done\""])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<span id="s">5</span>"#))
        .stdout(predicate::str::contains(">done</p>"));
}

#[test]
fn test_render_json_output() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "counter.html", COUNTER);
    let data = write(&dir, "data.json", r#"{"count": 1, "msg": "m"}"#);

    let output = kvue_cmd()
        .arg("render")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .args(["--step", "set:count=4", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let out: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["data"]["count"], 4);
    assert_eq!(out["report"]["interpolations"], 1);
    assert_eq!(out["report"]["model_bindings"], 1);
    assert_eq!(out["report"]["text_bindings"], 1);
    assert!(out["html"].as_str().unwrap().contains(r#"<span id="s">4</span>"#));
}

#[test]
fn test_render_missing_root_warns() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", "<p>{{x}}</p>");

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>{{x}}</p>"))
        .stderr(predicate::str::contains("nothing was compiled"));
}

#[test]
fn test_render_unknown_method_fails() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", r#"<div id="app"><button @click="go"></button></div>"#);

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .assert()
        .failure()
        .stderr(predicate::str::contains("KVUE-002"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_render_lenient_skips_unknown_method() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", r#"<div id="app"><button @click="go">b</button></div>"#);

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .arg("--lenient")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<button @click="go">b</button>"#));
}

#[test]
fn test_render_env_policy_override() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", r#"<div id="app"><button @click="go"></button></div>"#);

    kvue_cmd()
        .env("KVUE_ON_MISSING_METHOD", "warn")
        .arg("render")
        .arg(&template)
        .assert()
        .success();
}

#[test]
fn test_render_custom_prefix_from_config() {
    let dir = TempDir::new().unwrap();
    let template = write(
        &dir,
        "t.html",
        r#"<div id="app"><b v-text="name"></b><i k-text="name"></i></div>"#,
    );
    let data = write(&dir, "data.json", r#"{"name": "N"}"#);
    let config = write(&dir, "kvue.toml", "directive_prefix = \"v-\"\n");

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<b v-text="name">N</b><i k-text="name"></i>"#));
}

#[test]
fn test_render_invalid_step() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", COUNTER);

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .args(["--step", "click:#in"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KVUE-012"));
}

#[test]
fn test_render_step_target_not_found() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", COUNTER);

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .args(["--step", "event:#nope=click"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KVUE-003"));
}

#[test]
fn test_render_non_object_data() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", COUNTER);
    let data = write(&dir, "data.json", "[1, 2]");

    kvue_cmd()
        .arg("render")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("KVUE-011"));
}

#[test]
fn test_render_missing_template() {
    kvue_cmd()
        .args(["render", "/nonexistent/template.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KVUE-090"));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_reports_bindings() {
    let dir = TempDir::new().unwrap();
    let template = write(
        &dir,
        "t.html",
        r#"<div id="app"><p>{{a}}</p><p k-text="b"></p><p k-show="c"></p><button @click="go"></button></div>"#,
    );

    kvue_cmd()
        .arg("check")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("compiled"))
        .stdout(predicate::str::contains("Interpolations: 1"))
        .stdout(predicate::str::contains("k-text: 1"))
        .stdout(predicate::str::contains("Subscriptions: 2"))
        .stdout(predicate::str::contains("Event bindings: 1"))
        .stdout(predicate::str::contains("1 unknown directive"));
}

#[test]
fn test_check_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", "<main></main>");

    kvue_cmd()
        .arg("check")
        .arg(&template)
        .args(["--root", "#app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KVUE-003"));
}

#[test]
fn test_check_invalid_selector() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", COUNTER);

    kvue_cmd()
        .arg("check")
        .arg(&template)
        .args(["--root", "div >"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KVUE-001"));
}

#[test]
fn test_check_rejects_overlapping_prefixes() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.html", COUNTER);

    kvue_cmd()
        .env("KVUE_EVENT_PREFIX", "k-")
        .arg("check")
        .arg(&template)
        .assert()
        .failure()
        .stderr(predicate::str::contains("KVUE-010"));
}
