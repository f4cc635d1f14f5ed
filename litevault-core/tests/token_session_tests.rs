// litevault-core/tests/token_session_tests.rs
use anyhow::Result;
use serde_json::json;
use tempfile::tempdir;

use litevault_core::session::ensure_fresh_session_at;
use litevault_core::token::encode_unsigned;
use litevault_core::{
    decode_claims, is_about_to_expire_at, FileSessionStore, LogPolicy, MemorySink, RedactingLogger, Redactor,
    SessionStore, TokenRefresher,
};

const NOW_MS: i64 = 1_700_000_000_000;

struct StaticRefresher(String);

impl TokenRefresher for StaticRefresher {
    fn refresh(&self) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}

#[test_log::test]
fn file_store_persists_across_instances() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("nested").join("session.json");

    let store = FileSessionStore::new(&path);
    store.save_session("tok")?;
    store.save_device_token("push-1")?;
    let device_id = store.get_or_create_device_id()?;

    let reopened = FileSessionStore::new(&path);
    assert_eq!(reopened.session()?.as_deref(), Some("tok"));
    assert!(reopened.is_signed_in()?);
    assert_eq!(reopened.device_token()?.as_deref(), Some("push-1"));
    assert_eq!(reopened.get_or_create_device_id()?, device_id);

    reopened.clear_session()?;
    reopened.clear_device_token()?;
    assert_eq!(store.session()?, None);
    assert_eq!(store.device_token()?, None);
    assert_eq!(store.get_or_create_device_id()?, device_id);
    Ok(())
}

#[cfg(unix)]
#[test_log::test]
fn file_store_is_owner_only() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir()?;
    let store = FileSessionStore::new(dir.path().join("session.json"));
    store.save_session("tok")?;
    let mode = std::fs::metadata(store.path())?.permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    Ok(())
}

#[test_log::test]
fn missing_file_reads_as_empty() -> Result<()> {
    let dir = tempdir()?;
    let store = FileSessionStore::new(dir.path().join("absent.json"));
    assert_eq!(store.session()?, None);
    assert!(!store.is_signed_in()?);
    Ok(())
}

#[test_log::test]
fn refresh_writes_through_to_file() -> Result<()> {
    let dir = tempdir()?;
    let store = FileSessionStore::new(dir.path().join("session.json"));
    store.save_session(&encode_unsigned(&json!({ "exp": NOW_MS / 1000 - 5 })))?;

    let fresh = encode_unsigned(&json!({ "exp": NOW_MS / 1000 + 600 }));
    let logger = RedactingLogger::new(LogPolicy::Release, Redactor::default_rules()?, MemorySink::new());
    let out = ensure_fresh_session_at(&store, &StaticRefresher(fresh.clone()), 10, &logger, NOW_MS)?;

    assert_eq!(out.as_deref(), Some(fresh.as_str()));
    assert_eq!(FileSessionStore::new(store.path()).session()?, Some(fresh.clone()));
    assert!(!is_about_to_expire_at(Some(&fresh), 10, NOW_MS));
    assert_eq!(decode_claims(&fresh)?.exp, NOW_MS / 1000 + 600);
    Ok(())
}

#[test_log::test]
fn expiry_boundary_is_exclusive() {
    let token = encode_unsigned(&json!({ "exp": NOW_MS / 1000 + 10 }));
    assert!(!is_about_to_expire_at(Some(&token), 10, NOW_MS));
    assert!(is_about_to_expire_at(Some(&token), 11, NOW_MS));
}
