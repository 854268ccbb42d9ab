//! Integration tests for the gitsim binary.
//!
//! These tests exercise the full CLI: argument parsing, configuration
//! loading, the shell and the JSON-lines batch mode.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::NamedTempFile;

const SESSION: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

/// Get a command for running gitsim with no ambient config.
fn gitsim() -> Command {
    let mut cmd = Command::cargo_bin("gitsim").unwrap();
    cmd.env_remove("RUST_LOG")
        .env("GITSIM_CONFIG", "/nonexistent/gitsim.toml")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .env("HOME", "/nonexistent");
    cmd
}

fn file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn responses(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8(stdout.to_vec())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn version_flag_works() {
    gitsim()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitsim"));
}

#[test]
fn help_flag_works() {
    gitsim()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("commit graph simulator"));
}

#[test]
fn shell_runs_a_lesson() {
    let script = "\
# diverge and merge
commit add readme -- hello
checkout feature
commit feature work
checkout main
commit main work
merge feature into main
status
verify
";
    gitsim()
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to a new branch: feature"))
        .stdout(predicate::str::contains("Merged feature into main"))
        .stdout(predicate::str::contains("5 commit(s), 2 branch(es)"))
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn shell_reports_failures_and_continues() {
    gitsim()
        .arg("shell")
        .write_stdin("merge ghost main\nstatus\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Merge failed - branches not found"))
        .stdout(predicate::str::contains("On branch main"));
}

#[test]
fn shell_script_fails_if_any_command_failed() {
    let script = file_with("commit one\nbranch main\n");
    gitsim()
        .args(["shell", "--script"])
        .arg(script.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 command(s) failed"));
}

#[test]
fn batch_answers_each_line() {
    let input = format!(
        r#"{{"op":"commit","session_id":"{SESSION}","message":"first"}}
{{"op":"checkout","session_id":"{SESSION}","branch_name":"feature"}}
{{"op":"commit","session_id":"{SESSION}","message":"on feature","content":"x"}}
{{"op":"merge","session_id":"{SESSION}","source_branch":"feature","target_branch":"main"}}
{{"op":"merge","session_id":"{SESSION}","source_branch":"ghost","target_branch":"main"}}
{{"op":"status","session_id":"{SESSION}"}}
"#
    );

    let output = gitsim().arg("batch").write_stdin(input).output().unwrap();
    assert!(output.status.success());

    let out = responses(&output.stdout);
    assert_eq!(out.len(), 6);
    assert_eq!(out[1]["current_branch"], "feature");
    assert_eq!(out[3]["current_branch"], "main");
    assert!(out[3]["merge_commit_id"].is_string());
    assert_eq!(out[4]["success"], false);
    assert_eq!(out[4]["error"], "unknown_branch");
    assert_eq!(out[5]["total_commits"], 4);
    assert_eq!(out[5]["total_branches"], 2);
}

#[test]
fn batch_log_labels_shared_heads() {
    let input = format!(
        r#"{{"op":"branch","session_id":"{SESSION}","branch_name":"a"}}
{{"op":"branch","session_id":"{SESSION}","branch_name":"b"}}
{{"op":"log","session_id":"{SESSION}"}}
"#
    );
    let output = gitsim().arg("batch").write_stdin(input).output().unwrap();
    let out = responses(&output.stdout);

    let commits = out[2]["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 1);
    let labels: Vec<&str> = commits[0]["branches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["a", "b", "main"]);
}

#[test]
fn batch_clear_issues_new_root() {
    let input = format!(
        r#"{{"op":"log","session_id":"{SESSION}"}}
{{"op":"commit","session_id":"{SESSION}","message":"gone soon"}}
{{"op":"clear","session_id":"{SESSION}"}}
{{"op":"log","session_id":"{SESSION}"}}
"#
    );
    let output = gitsim().arg("batch").write_stdin(input).output().unwrap();
    let out = responses(&output.stdout);

    let before = &out[0]["commits"][0]["id"];
    let after = &out[3]["commits"][0]["id"];
    assert_eq!(out[3]["commits"].as_array().unwrap().len(), 1);
    assert_ne!(before, after);
}

#[test]
fn config_file_sets_id_length() {
    let config = file_with("[repository]\nid_length = 12\n");
    let input = format!("{{\"op\":\"commit\",\"session_id\":\"{SESSION}\",\"message\":\"m\"}}\n");

    let output = gitsim()
        .arg("--config")
        .arg(config.path())
        .arg("batch")
        .write_stdin(input)
        .output()
        .unwrap();
    let out = responses(&output.stdout);
    assert_eq!(out[0]["commit_id"].as_str().unwrap().len(), 12);
}

#[test]
fn invalid_config_is_rejected() {
    let config = file_with("[repository]\nid_length = 1\n");
    gitsim()
        .arg("--config")
        .arg(config.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("id_length"));
}

#[test]
fn config_command_shows_defaults() {
    gitsim()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("no config file found"))
        .stdout(predicate::str::contains("id_length = 8"));
}

#[test]
fn completion_generates_script() {
    gitsim()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gitsim"));
}
