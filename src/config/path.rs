//! Path resolution for configuration and preference files.
//!
//! Supports absolute paths, relative paths and "~" home directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{LottoError, Result};

/// Application directory name under the platform config dir.
pub const APP_DIR: &str = "lotto";

/// Default config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| LottoError::ConfigInvalid("Could not determine home directory".to_string()))
}

/// Expand a leading `~` to the home directory.
///
/// Other paths are returned unchanged.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() {
            home
        } else {
            home.join(rest)
        };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }
    trace!(path = %path.display(), "Using path as-is");
    Ok(path.to_path_buf())
}

/// Platform directory holding config and preferences, e.g. `~/.config/lotto`.
pub fn app_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| {
            LottoError::ConfigInvalid("Could not determine config directory".to_string())
        })
}

/// Default config file location.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_dir()?.join(CONFIG_FILE))
}

/// Pick the state directory: explicit override, then config, then default.
pub fn resolve_state_dir(cli: Option<&Path>, config: Option<&Path>) -> Result<PathBuf> {
    match cli.or(config) {
        Some(dir) => expand_home(dir),
        None => app_dir(),
    }
}
