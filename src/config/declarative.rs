//! Configuration file loading and saving.
//!
//! Files may be YAML or TOML; the format follows the file extension.

use std::path::Path;

use tracing::{debug, info, instrument, trace};

use crate::error::{LottoError, Result};

use super::LottoConfig;
use super::path::default_config_path;

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        trace!(extension = %ext, "Detecting config format from extension");
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

fn format_for(path: &Path) -> Result<ConfigFormat> {
    ConfigFormat::from_extension(path).ok_or_else(|| {
        LottoError::ConfigParse(format!(
            "Unknown config format for '{}': expected .yaml, .yml, or .toml",
            path.display()
        ))
    })
}

/// Load and validate a configuration file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LottoConfig> {
    let path = path.as_ref();
    info!("Loading configuration file");

    let format = format_for(path)?;
    debug!(format = ?format, "Detected config format");

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LottoError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            LottoError::Io(e)
        }
    })?;
    debug!(bytes = content.len(), "Read config file");

    load_config_from_str(&content, format)
}

/// Parse and validate configuration text in the given format.
#[instrument(skip(content), fields(format = ?format, content_len = content.len()))]
pub fn load_config_from_str(content: &str, format: ConfigFormat) -> Result<LottoConfig> {
    let config: LottoConfig = match format {
        ConfigFormat::Yaml if content.trim().is_empty() => LottoConfig::default(),
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| LottoError::ConfigParse(format!("YAML: {e}")))?,
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| LottoError::ConfigParse(format!("TOML: {e}")))?
        }
    };

    config.validate()?;
    debug!(?config, "Configuration loaded and validated");
    Ok(config)
}

/// Load the explicit config file, or the default one if it exists.
///
/// A missing explicit file is an error; a missing default file yields
/// defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<LottoConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let path = default_config_path()?;
    if path.is_file() {
        load_config(&path)
    } else {
        debug!(path = %path.display(), "No config file, using defaults");
        Ok(LottoConfig::default())
    }
}
