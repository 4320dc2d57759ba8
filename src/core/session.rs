//! # Session State
//!
//! The single source of truth for "is this client authenticated".
//!
//! A session is one optional opaque token. Presence of a non-empty token is
//! the only authentication signal; there is no expiry. Consumers (the
//! navigation guard, the API client) take an `Arc<dyn SessionStore>` so tests
//! can swap in a [`MemorySessionStore`].
//!
//! The durable store keeps a JSON document at `~/.rental-client/session.json`
//! (path configurable). Writes use atomic rename (write `.tmp`, then
//! `rename()`), and the token is cached in memory so reads never hit disk.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Encode(serde_json::Error),
    /// A writer panicked while holding the token lock.
    Poisoned,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "session I/O error: {e}"),
            SessionError::Encode(e) => write!(f, "session encode error: {e}"),
            SessionError::Poisoned => write!(f, "session lock poisoned"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Read/write access to the persisted session token.
///
/// Reads must be cheap and must never fail: an unavailable store reads as
/// "no token". Writers are explicit login/logout actions only.
pub trait SessionStore: Send + Sync {
    /// Snapshot of the current token, if any.
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: &str) -> Result<(), SessionError>;

    fn clear_token(&self) -> Result<(), SessionError>;

    /// True iff a non-empty token is currently stored.
    fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }
}

/// Normalizes an incoming token: empty means "no session".
fn normalize(token: &str) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(normalize(token)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        // Poisoned lock fails closed.
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let mut slot = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *slot = normalize(token);
        Ok(())
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        let mut slot = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// On-disk shape of the session file.
#[derive(Serialize, Deserialize, Debug)]
struct SessionFile {
    token: String,
    saved_at: i64,
}

/// Durable store backed by a single JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileSessionStore {
    /// Opens the store at `path`. A missing, unreadable or malformed file
    /// yields an unauthenticated store rather than an error.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = match load_token(&path) {
            Ok(token) => token,
            Err(e) => {
                warn!("Session file {} unavailable, starting signed out: {}", path.display(), e);
                None
            }
        };
        debug!(
            "Opened session store at {} (authenticated: {})",
            path.display(),
            cached.is_some()
        );
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store(&self, token: Option<String>) -> Result<(), SessionError> {
        let mut slot = self.cached.write().map_err(|_| SessionError::Poisoned)?;
        *slot = token;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        self.cached.read().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let Some(token) = normalize(token) else {
            return self.clear_token();
        };
        let data = SessionFile {
            token: token.clone(),
            saved_at: Utc::now().timestamp(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(SessionError::Io)?;
        }
        atomic_write_json(&self.path, &data)?;
        self.store(Some(token))?;
        info!("Session token saved to {}", self.path.display());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), SessionError> {
        // Disk first: the cache only reads signed out once the file is gone.
        match fs::remove_file(&self.path) {
            Ok(()) => info!("Session cleared ({})", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Failed to remove session file {}: {}", self.path.display(), e);
                return Err(SessionError::Io(e));
            }
        }
        self.store(None)
    }
}

/// Reads the token from disk. A missing file is an empty session.
fn load_token(path: &Path) -> io::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    let data: SessionFile =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(normalize(&data.token))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SessionError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data).map_err(SessionError::Encode)?;
    fs::write(&tmp_path, json).map_err(SessionError::Io)?;
    fs::rename(&tmp_path, path).map_err(SessionError::Io)?;
    Ok(())
}
