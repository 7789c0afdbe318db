//! Persisted session slots.
//!
//! A session is persisted as two named slots: the canonical role string and
//! the JSON-encoded profile. Backends store both in one operation so a reader
//! never sees a role from one login next to a profile from another.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::SessionResult;

/// Slot holding the canonical role string.
pub const ROLE_SLOT: &str = "userType";

/// Slot holding the serialized profile.
pub const PROFILE_SLOT: &str = "userData";

/// Raw persisted slots.
///
/// Either slot may be missing when storage was cleared from outside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSlots {
    /// Contents of [`ROLE_SLOT`].
    #[serde(rename = "userType", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,

    /// Contents of [`PROFILE_SLOT`].
    #[serde(rename = "userData", default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

impl PersistedSlots {
    /// Returns true when neither slot holds a value.
    pub fn is_empty(&self) -> bool {
        self.user_type.is_none() && self.user_data.is_none()
    }

    /// Removes one slot by name. Unknown names are ignored.
    pub fn remove(&mut self, slot: &str) {
        match slot {
            ROLE_SLOT => self.user_type = None,
            PROFILE_SLOT => self.user_data = None,
            _ => {}
        }
    }
}

/// Storage for the persisted session slots.
pub trait SessionBackend: Send + Sync + fmt::Debug {
    /// Reads both slots.
    fn load(&self) -> SessionResult<PersistedSlots>;

    /// Replaces both slots in a single operation.
    fn save(&self, slots: &PersistedSlots) -> SessionResult<()>;

    /// Removes both slots.
    fn erase(&self) -> SessionResult<()>;
}

/// Process-local backend. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: Mutex<PersistedSlots>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a single slot, as an outside actor clearing storage would.
    pub fn remove_slot(&self, slot: &str) {
        self.slots.lock().remove(slot);
    }
}

impl SessionBackend for MemoryBackend {
    fn load(&self) -> SessionResult<PersistedSlots> {
        Ok(self.slots.lock().clone())
    }

    fn save(&self, slots: &PersistedSlots) -> SessionResult<()> {
        *self.slots.lock() = slots.clone();
        Ok(())
    }

    fn erase(&self) -> SessionResult<()> {
        *self.slots.lock() = PersistedSlots::default();
        Ok(())
    }
}

/// JSON file backend.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so both slots change together.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend storing slots at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default session file location, `<config_dir>/khel/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("khel").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionBackend for FileBackend {
    fn load(&self) -> SessionResult<PersistedSlots> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "Session file not found");
            return Ok(PersistedSlots::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, slots: &PersistedSlots) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(slots)?;
        let temp = self.temp_path();
        fs::write(&temp, contents)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(path = ?self.path, "Saved session");
        Ok(())
    }

    fn erase(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
