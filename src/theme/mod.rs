//! Light/dark theme handling.
//!
//! The controller resolves the theme once at startup (saved preference,
//! then the environment's preferred scheme, then light), applies it, and
//! persists every explicit change. Terminal styles for human-mode output are
//! derived from the applied theme.

use std::fmt;
use std::str::FromStr;

use console::Style;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{LottoError, Result};
use crate::state::{PreferenceStore, Preferences};

/// Environment override for the preferred scheme.
pub const THEME_ENV: &str = "LOTTO_THEME";

/// Terminal foreground/background hint, e.g. `15;0`.
pub const COLORFGBG_ENV: &str = "COLORFGBG";

/// Display theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Value of the document-level `data-theme` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Text of the toggle button, naming the theme a press switches to.
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Dark Mode",
            Self::Dark => "Light Mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = LottoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(LottoError::InvalidTheme {
                value: s.to_string(),
            }),
        }
    }
}

/// Where the applied theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSource {
    Saved,
    Environment,
    Default,
}

/// Interpret environment hints as a preferred scheme.
///
/// `LOTTO_THEME` wins when it names a theme. Otherwise the background index
/// in `COLORFGBG` decides: the standard dark colours (0-6, 8) mean dark.
pub fn preferred_scheme(lotto_theme: Option<&str>, colorfgbg: Option<&str>) -> Option<Theme> {
    if let Some(theme) = lotto_theme.and_then(|v| v.parse().ok()) {
        return Some(theme);
    }
    let background: u8 = colorfgbg?.rsplit(';').next()?.trim().parse().ok()?;
    Some(match background {
        0..=6 | 8 => Theme::Dark,
        _ => Theme::Light,
    })
}

/// Read the preferred scheme from the process environment.
pub fn environment_scheme() -> Option<Theme> {
    let lotto_theme = std::env::var(THEME_ENV).ok();
    let colorfgbg = std::env::var(COLORFGBG_ENV).ok();
    preferred_scheme(lotto_theme.as_deref(), colorfgbg.as_deref())
}

/// Serializable theme state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ThemeView {
    pub theme: Theme,
    pub toggle_label: &'static str,
    pub source: ThemeSource,
}

/// Resolves, applies and persists the theme.
pub struct ThemeController<S> {
    store: S,
    theme: Theme,
    source: ThemeSource,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Resolve the startup theme from the store, then `environment`.
    ///
    /// An unreadable preference file is logged and treated as absent.
    #[instrument(skip(store))]
    pub fn init_theme(store: S, environment: Option<Theme>) -> Self {
        let saved = match store.load() {
            Ok(prefs) => prefs.theme,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable preferences");
                None
            }
        };

        let (theme, source) = match (saved, environment) {
            (Some(theme), _) => (theme, ThemeSource::Saved),
            (None, Some(theme)) => (theme, ThemeSource::Environment),
            (None, None) => (Theme::default(), ThemeSource::Default),
        };
        debug!(%theme, ?source, "Theme resolved");

        Self {
            store,
            theme,
            source,
        }
    }

    /// Flip the theme, apply it and persist it.
    #[instrument(skip(self), fields(from = %self.theme))]
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Apply and persist an explicit theme.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        let mut prefs = self.store.load().unwrap_or_else(|_| Preferences::default());
        prefs.theme = Some(theme);
        self.store.save(&prefs)?;

        self.theme = theme;
        self.source = ThemeSource::Saved;
        info!(%theme, "Theme applied");
        Ok(())
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn source(&self) -> ThemeSource {
        self.source
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn view(&self) -> ThemeView {
        ThemeView {
            theme: self.theme,
            toggle_label: self.theme.toggle_label(),
            source: self.source,
        }
    }
}

/// Terminal styles for human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
#[derive(Debug, Clone)]
pub struct TerminalTheme {
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,
    pub header: Style,
    pub label: Style,
    pub value: Style,
}

impl TerminalTheme {
    /// Styles tuned for a light or dark terminal background.
    pub fn for_theme(theme: Theme) -> Self {
        let (accent, success, error, warning, muted) = match theme {
            // xterm-256 indices
            Theme::Light => (25, 28, 160, 130, 244),
            Theme::Dark => (75, 42, 203, 214, 245),
        };
        Self {
            accent: Style::new().color256(accent),
            success: Style::new().bold().color256(success),
            error: Style::new().bold().color256(error),
            warning: Style::new().bold().color256(warning),
            muted: Style::new().color256(muted),
            header: Style::new().bold().underlined().color256(accent),
            label: Style::new().dim(),
            value: Style::new().bold(),
        }
    }
}

impl Default for TerminalTheme {
    fn default() -> Self {
        Self::for_theme(Theme::default())
    }
}
