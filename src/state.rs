//! Persisted user preferences.
//!
//! Preferences live in a small JSON file in the state directory. The only
//! stored value today is the theme.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::{LottoError, Result};
use crate::theme::Theme;

/// File name of the preferences file inside the state directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Stored preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Theme picked by the user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

/// Storage backend for preferences.
pub trait PreferenceStore {
    /// Read preferences; a store with nothing saved yields defaults.
    fn load(&self) -> Result<Preferences>;

    /// Replace stored preferences.
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

/// Preferences stored as JSON on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/preferences.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> Result<Preferences> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "No preferences file yet");
                return Ok(Preferences::default());
            }
            Err(e) => return Err(e.into()),
        };
        let prefs: Preferences = serde_json::from_str(&content)
            .map_err(|e| LottoError::StateParse(format!("{}: {e}", self.path.display())))?;
        debug!(?prefs, "Preferences loaded");
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(prefs)
            .map_err(|e| LottoError::Other(format!("Failed to encode preferences: {e}")))?;

        // Atomic replace.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}

/// In-memory store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    prefs: Arc<Mutex<Preferences>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out with `prefs`.
    pub fn with(prefs: Preferences) -> Self {
        Self {
            prefs: Arc::new(Mutex::new(prefs)),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Preferences> {
        let prefs = self
            .prefs
            .lock()
            .map_err(|_| LottoError::Other("preference lock poisoned".to_string()))?;
        Ok(*prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        let mut stored = self
            .prefs
            .lock()
            .map_err(|_| LottoError::Other("preference lock poisoned".to_string()))?;
        *stored = *prefs;
        Ok(())
    }
}
