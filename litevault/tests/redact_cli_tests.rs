// litevault/tests/redact_cli_tests.rs
//! Binary-level tests for `redact`, `scan`, `attrs` and `rules`.
//!
//! Every command runs with `XDG_CONFIG_HOME`/`HOME` pointed at a temporary
//! directory so a developer's own rules file never leaks into the results.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn litevault(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("litevault"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("RUST_LOG")
        .env_remove("LITEVAULT_CONFIG")
        .env_remove("LITEVAULT_THEME")
        .env_remove("LITEVAULT_SESSION_FILE")
        .env_remove("LITEVAULT_ALLOW_DEBUG_PII");
    cmd
}

fn strip_ansi(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(bytes)).to_string()
}

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("rules.yaml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn redact_stdin_with_default_rules() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .args(["redact", "--no-redaction-summary"])
        .write_stdin("Authorization: Bearer abc.def.ghi\nmail jane@example.com\n")
        .assert()
        .success()
        .stdout("Authorization: [REDACTED]\nmail j***@example.com\n");
}

#[test]
fn redact_prints_summary_to_stderr() {
    let home = tempdir().unwrap();
    let output = litevault(home.path())
        .arg("redact")
        .write_stdin(r#"{"raw_text": "hello world", "otp": "123456"}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        r#"{"raw_text": "[REDACTED_TEXT len=11]", "otp": "[REDACTED_CODE]"}"#
    );
    let stderr = strip_ansi(&output.stderr);
    assert!(stderr.contains("--- Redaction Summary ---"), "stderr: {}", stderr);
    assert!(stderr.contains("raw_text_json (1 occurrences)"));
    assert!(stderr.contains("otp_code_json (1 occurrences)"));
    assert!(!stderr.contains("hello world"));
}

#[test]
fn redact_quiet_suppresses_summary() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .args(["--quiet", "redact"])
        .write_stdin("otp=123456")
        .assert()
        .success()
        .stdout("otp=[REDACTED_CODE]")
        .stderr(predicate::str::is_empty());
}

#[test]
fn redact_file_to_file() {
    let home = tempdir().unwrap();
    let input = home.path().join("in.log");
    let output = home.path().join("out.log");
    fs::write(&input, "cookie=session123; path=/\n").unwrap();

    litevault(home.path())
        .args(["redact", "--no-redaction-summary", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Writing redacted content to file:"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "cookie=[REDACTED]; path=/\n");
}

#[test]
fn redact_diff_shows_changes() {
    let home = tempdir().unwrap();
    let output = litevault(home.path())
        .args(["redact", "--diff", "--no-redaction-summary"])
        .write_stdin("keep this\npin: 4321\n")
        .output()
        .unwrap();
    let stdout = strip_ansi(&output.stdout);
    assert!(stdout.contains("-pin: 4321\n"), "stdout: {}", stdout);
    assert!(stdout.contains("+pin=[REDACTED_CODE]\n"));
}

#[test]
fn redact_with_custom_config_and_disable() {
    let home = tempdir().unwrap();
    let config = write_config(
        &home,
        r#"
rules:
  - name: ticket_id
    pattern: 'TCK-\d{6}'
    replace_with: "[TICKET]"
    order: 5
"#,
    );
    litevault(home.path())
        .args(["--quiet", "redact", "--config"])
        .arg(&config)
        .args(["-x", "email"])
        .write_stdin("TCK-123456 from jane@example.com")
        .assert()
        .success()
        .stdout("[TICKET] from jane@example.com");
}

#[test]
fn user_rules_file_is_picked_up() {
    let home = tempdir().unwrap();
    let dir = home.path().join("config").join("litevault");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("rules.yaml"), "enabled: false\n").unwrap();

    litevault(home.path())
        .args(["--quiet", "redact"])
        .write_stdin("otp=123456")
        .assert()
        .success()
        .stdout("otp=123456");
}

#[test]
fn invalid_config_fails_with_message() {
    let home = tempdir().unwrap();
    let config = write_config(&home, "rules:\n  - name: broken\n    pattern: '(oops'\n");
    litevault(home.path())
        .args(["redact", "--config"])
        .arg(&config)
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid regex pattern"));
}

#[test]
fn line_buffered_redacts_each_line() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .args(["redact", "--line-buffered"])
        .write_stdin("first otp=111111\nclean\nlast code: 2222")
        .assert()
        .success()
        .stdout("first otp=[REDACTED_CODE]\nclean\nlast code=[REDACTED_CODE]\n")
        .stderr(
            predicate::str::contains("Using line-buffered mode.")
                .and(predicate::str::contains("otp_code (2 occurrences)")),
        );
}

#[test]
fn line_buffered_empty_input() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .args(["redact", "--line-buffered"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No redaction matches found."));
}

#[test]
fn line_buffered_incompatible_with_diff() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .args(["redact", "--line-buffered", "--diff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: --line-buffered is incompatible with --diff and --input-file.",
        ));
}

#[test]
fn scan_reports_counts_without_content() {
    let home = tempdir().unwrap();
    let output = litevault(home.path())
        .args(["scan", "--json-stdout"])
        .write_stdin("a@example.com b@example.org otp=123456")
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_occurrences"], 3);
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(!text.contains("example.com"));
    assert!(!text.contains("123456"));
}

#[test]
fn scan_no_matches() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .arg("scan")
        .write_stdin("This is a clean string.")
        .assert()
        .success()
        .stderr(predicate::str::contains("No redaction matches found."));
}

#[test]
fn scan_fails_over_threshold() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .args(["scan", "--fail-over-threshold", "1"])
        .write_stdin("otp=123456 code=654321")
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 matches exceed the threshold of 1."));

    litevault(home.path())
        .args(["scan", "--fail-over-threshold", "2"])
        .write_stdin("otp=123456 code=654321")
        .assert()
        .success();
}

#[test]
fn attrs_from_arguments() {
    let home = tempdir().unwrap();
    let output = litevault(home.path())
        .args(["attrs", "code=123456", "raw_text=hello world", "screen=home"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["code"], "[REDACTED_CODE]");
    assert_eq!(json["raw_text"], "[REDACTED_TEXT len=11]");
    assert_eq!(json["screen"], "home");
}

#[test]
fn attrs_from_json_stdin() {
    let home = tempdir().unwrap();
    let output = litevault(home.path())
        .arg("attrs")
        .write_stdin(r#"{"token": "opaque", "email": "jane@example.com"}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["token"], "[REDACTED]");
    assert_eq!(json["email"], "j***@example.com");
}

#[test]
fn rules_list_shows_pipeline_order() {
    let home = tempdir().unwrap();
    let output = litevault(home.path())
        .args(["rules", "list", "-x", "email"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let auth = stdout.find("auth_header").unwrap();
    let bearer = stdout.find("bearer_token").unwrap();
    assert!(auth < bearer);
    assert!(!stdout.contains("Email addresses"));
}
