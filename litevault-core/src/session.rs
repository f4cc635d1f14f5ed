// litevault-core/src/session.rs
//! Session token storage and pre-emptive refresh.
//!
//! `SessionStore` is the single capability the client needs from platform
//! storage. Two adapters ship here: an in-memory store and a JSON file in
//! the user's config directory. `ensure_fresh_session` is the check the
//! HTTP layer runs before attaching a credential to a request.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

use crate::errors::LiteVaultError;
use crate::logging::Logger;
use crate::token::is_about_to_expire_at;

const LOG_TAG: &str = "Session";
const SESSION_FILE_NAME: &str = "session.json";
const TMP_SUFFIX: &str = ".tmp";

/// Everything a store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionData {
    pub session_token: Option<String>,
    pub is_signed_in: bool,
    pub device_token: Option<String>,
    pub device_id: Option<String>,
}

pub trait SessionStore: Send + Sync {
    /// Reads the current state.
    fn load(&self) -> Result<SessionData, LiteVaultError>;

    /// Applies `change` atomically with respect to other calls on this store
    /// and returns the new state.
    fn update(&self, change: &mut dyn FnMut(&mut SessionData)) -> Result<SessionData, LiteVaultError>;

    fn save_session(&self, token: &str) -> Result<(), LiteVaultError> {
        self.update(&mut |data| {
            data.session_token = Some(token.to_string());
            data.is_signed_in = true;
        })
        .map(|_| ())
    }

    fn session(&self) -> Result<Option<String>, LiteVaultError> {
        Ok(self.load()?.session_token)
    }

    fn clear_session(&self) -> Result<(), LiteVaultError> {
        self.update(&mut |data| {
            data.session_token = None;
            data.is_signed_in = false;
        })
        .map(|_| ())
    }

    fn is_signed_in(&self) -> Result<bool, LiteVaultError> {
        Ok(self.load()?.is_signed_in)
    }

    fn save_device_token(&self, token: &str) -> Result<(), LiteVaultError> {
        self.update(&mut |data| data.device_token = Some(token.to_string()))
            .map(|_| ())
    }

    fn device_token(&self) -> Result<Option<String>, LiteVaultError> {
        Ok(self.load()?.device_token)
    }

    fn clear_device_token(&self) -> Result<(), LiteVaultError> {
        self.update(&mut |data| data.device_token = None).map(|_| ())
    }

    /// Returns the stored device id, generating and persisting a UUID v4 the
    /// first time.
    fn get_or_create_device_id(&self) -> Result<String, LiteVaultError> {
        let data = self.update(&mut |data| {
            let missing = data.device_id.as_deref().map_or(true, |id| id.trim().is_empty());
            if missing {
                data.device_id = Some(Uuid::new_v4().to_string());
            }
        })?;
        data.device_id
            .ok_or_else(|| LiteVaultError::SessionStore("device id was not persisted".to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<SessionData, LiteVaultError> {
        Ok(self.data.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn update(&self, change: &mut dyn FnMut(&mut SessionData)) -> Result<SessionData, LiteVaultError> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        change(&mut *data);
        Ok(data.clone())
    }
}

/// JSON-file store. Writes go through a temporary file and a rename.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<config dir>/litevault/session.json`.
    pub fn default_path() -> Result<PathBuf, LiteVaultError> {
        dirs::config_dir()
            .map(|dir| dir.join("litevault").join(SESSION_FILE_NAME))
            .ok_or_else(|| LiteVaultError::SessionStore("no config directory on this platform".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SessionData, LiteVaultError> {
        if !self.path.exists() {
            return Ok(SessionData::default());
        }
        let raw = fs::read(&self.path)?;
        if raw.is_empty() {
            return Ok(SessionData::default());
        }
        Ok(serde_json::from_slice(&raw)?)
    }

    fn write(&self, data: &SessionData) -> Result<(), LiteVaultError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(TMP_SUFFIX);
        let tmp_path = PathBuf::from(tmp_name);

        let bytes = serde_json::to_vec_pretty(data)?;
        {
            let mut file = fs::File::create(&tmp_path)
                .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        restrict_permissions(&tmp_path)?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), LiteVaultError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), LiteVaultError> {
    Ok(())
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<SessionData, LiteVaultError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read()
    }

    fn update(&self, change: &mut dyn FnMut(&mut SessionData)) -> Result<SessionData, LiteVaultError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut data = self.read()?;
        change(&mut data);
        self.write(&data)?;
        Ok(data)
    }
}

/// Obtains a new session token from the backend.
pub trait TokenRefresher: Send + Sync {
    fn refresh(&self) -> anyhow::Result<String>;
}

/// Returns a token fit to attach to a request, refreshing first when the
/// stored one is expired or within `buffer_seconds` of expiry.
///
/// A failed refresh is logged and the stored token (possibly `None`) is
/// returned; the request layer then deals with any 401.
pub fn ensure_fresh_session(
    store: &dyn SessionStore,
    refresher: &dyn TokenRefresher,
    buffer_seconds: i64,
    logger: &dyn Logger,
) -> Result<Option<String>, LiteVaultError> {
    ensure_fresh_session_at(store, refresher, buffer_seconds, logger, Utc::now().timestamp_millis())
}

/// [`ensure_fresh_session`] with an explicit clock reading.
pub fn ensure_fresh_session_at(
    store: &dyn SessionStore,
    refresher: &dyn TokenRefresher,
    buffer_seconds: i64,
    logger: &dyn Logger,
    now_ms: i64,
) -> Result<Option<String>, LiteVaultError> {
    let current = store.session()?;
    if !is_about_to_expire_at(current.as_deref(), buffer_seconds, now_ms) {
        return Ok(current);
    }

    logger.info(LOG_TAG, "Token about to expire, pre-emptively refreshing", None);
    match refresher.refresh() {
        Ok(token) => {
            store.save_session(&token)?;
            logger.info(LOG_TAG, "Pre-emptive refresh successful", None);
            Ok(Some(token))
        }
        Err(e) => {
            logger.warn(LOG_TAG, "Pre-emptive refresh failed", Some(&*e));
            Ok(current)
        }
    }
}
