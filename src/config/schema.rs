//! Configuration schema.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{LottoError, Result};

/// Top-level configuration file.
///
/// # Example TOML
///
/// ```toml
/// state_dir = "~/.local/state/lotto"
///
/// [board]
/// delay_step_ms = 130
/// shuffle_max_delay_ms = 120
/// time_format = "%H:%M"
///
/// [serve]
/// port = 8420
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LottoConfig {
    /// Ball layout and animation timing.
    #[serde(default)]
    pub board: BoardConfig,

    /// Local web server.
    #[serde(default)]
    pub serve: ServeConfig,

    /// Where preferences are stored. Defaults to the platform config dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl LottoConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        trace!("Validating configuration");
        self.board.validate()?;
        self.serve.validate()?;
        debug!("Configuration validated");
        Ok(())
    }
}

/// Ticket board settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Entrance delay added per ball position.
    pub delay_step_ms: u32,
    /// Upper bound for delays picked by a shuffle.
    pub shuffle_max_delay_ms: u64,
    pub main_ball_size_px: u16,
    pub bonus_ball_size_px: u16,
    /// `chrono` format string for the draw-time label.
    pub time_format: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            delay_step_ms: 130,
            shuffle_max_delay_ms: 120,
            main_ball_size_px: 54,
            bonus_ball_size_px: 62,
            time_format: "%H:%M".to_string(),
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.delay_step_ms == 0 {
            return Err(LottoError::ConfigInvalid(
                "board.delay_step_ms must be greater than 0".to_string(),
            ));
        }
        if self.main_ball_size_px == 0 || self.bonus_ball_size_px == 0 {
            return Err(LottoError::ConfigInvalid(
                "ball sizes must be greater than 0".to_string(),
            ));
        }
        if self.time_format.trim().is_empty() {
            return Err(LottoError::ConfigInvalid(
                "board.time_format must not be empty".to_string(),
            ));
        }
        if !renders_cleanly(&self.time_format) {
            return Err(LottoError::ConfigInvalid(format!(
                "board.time_format '{}' is not a valid strftime format",
                self.time_format
            )));
        }
        Ok(())
    }

    /// Copy with every field `validate` would reject reset to its default.
    #[must_use]
    pub fn repaired(self) -> Self {
        let defaults = Self::default();
        let time_format = if self.time_format.trim().is_empty()
            || !renders_cleanly(&self.time_format)
        {
            defaults.time_format
        } else {
            self.time_format
        };
        Self {
            delay_step_ms: nonzero(self.delay_step_ms, defaults.delay_step_ms),
            shuffle_max_delay_ms: self.shuffle_max_delay_ms,
            main_ball_size_px: nonzero(self.main_ball_size_px, defaults.main_ball_size_px),
            bonus_ball_size_px: nonzero(self.bonus_ball_size_px, defaults.bonus_ball_size_px),
            time_format,
        }
    }
}

fn nonzero<T: Copy + Default + PartialEq>(value: T, fallback: T) -> T {
    if value == T::default() { fallback } else { value }
}

/// Whether chrono can format `format` without hitting an unknown specifier.
fn renders_cleanly(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Web server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8420,
        }
    }
}

impl ServeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bind.trim().is_empty() {
            return Err(LottoError::ConfigInvalid(
                "serve.bind must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `bind:port` socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
