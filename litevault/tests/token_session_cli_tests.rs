// litevault/tests/token_session_cli_tests.rs
//! Binary-level tests for `token check` and `session`.

use assert_cmd::Command;
use chrono::Utc;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

use litevault_core::token::encode_unsigned;

fn litevault(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("litevault"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("RUST_LOG")
        .env_remove("LITEVAULT_SESSION_FILE");
    cmd
}

fn token_expiring_in(seconds: i64) -> String {
    encode_unsigned(&json!({ "sub": "user_1", "exp": Utc::now().timestamp() + seconds }))
}

#[test]
fn token_check_valid() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .args(["token", "check", token_expiring_in(3600).as_str()])
        .assert()
        .success()
        .stdout("valid\n");
}

#[test]
fn token_check_inside_buffer_is_expiring() {
    let home = tempdir().unwrap();
    let token = token_expiring_in(30);
    litevault(home.path())
        .args(["token", "check", "--buffer", "60", token.as_str()])
        .assert()
        .code(1)
        .stdout("expiring\n");

    litevault(home.path())
        .args(["token", "check", "--buffer", "0", token.as_str()])
        .assert()
        .success()
        .stdout("valid\n");
}

#[test]
fn token_check_reads_stdin_and_rejects_garbage() {
    let home = tempdir().unwrap();
    litevault(home.path())
        .args(["token", "check"])
        .write_stdin("not-a-token\n")
        .assert()
        .code(1)
        .stdout("expiring\n")
        .stderr(predicate::str::contains("Token could not be read"));
}

#[test]
fn session_save_show_clear() {
    let home = tempdir().unwrap();
    let store = home.path().join("session.json");
    let token = token_expiring_in(3600);

    litevault(home.path())
        .args(["session", "save", token.as_str(), "--store"])
        .arg(&store)
        .assert()
        .success();

    litevault(home.path())
        .args(["session", "show", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("signed_in: true")
                .and(predicate::str::contains("token: [REDACTED_JWT]"))
                .and(predicate::str::contains("status: valid"))
                .and(predicate::str::contains(token.as_str()).not()),
        );

    litevault(home.path())
        .args(["token", "check", "--from-session", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout("valid\n");

    litevault(home.path())
        .args(["session", "clear", "--store"])
        .arg(&store)
        .assert()
        .success();

    litevault(home.path())
        .args(["session", "show", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("signed_in: false")
                .and(predicate::str::contains("token: (none)"))
                .and(predicate::str::contains("status: expiring")),
        );
}

#[test]
fn session_store_from_environment() {
    let home = tempdir().unwrap();
    let store = home.path().join("env-session.json");
    litevault(home.path())
        .env("LITEVAULT_SESSION_FILE", &store)
        .args(["--quiet", "session", "save", "opaque-token"])
        .assert()
        .success();
    assert!(store.exists());

    litevault(home.path())
        .env("LITEVAULT_SESSION_FILE", &store)
        .args(["session", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("token: [REDACTED]").and(predicate::str::contains("status: expiring")));
}
