//! Output mode abstraction for robot and human output.

use std::path::Path;

use serde::Serialize;

use crate::cli::Cli;
use crate::config::LottoConfig;
use crate::error::LottoError;
use crate::palette::Palette;
use crate::theme::{Theme, ThemeView};
use crate::ticket::TicketView;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// A drawn ticket together with its terminal rendering.
#[derive(Debug, Clone, Serialize)]
pub struct TicketReport {
    #[serde(flatten)]
    pub view: TicketView,
    /// Board rendered as one styled terminal line.
    #[serde(skip)]
    pub text: String,
}

/// Board change reported by the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardEvent {
    Generated,
    Shuffled,
    Tapped { position: usize },
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human(Theme),
}

impl OutputMode {
    /// Create OutputMode from CLI arguments and the applied theme.
    #[must_use]
    pub const fn from_cli(cli: &Cli, theme: Theme) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human(theme)
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human(theme) => Box::new(HumanOutput::new(theme)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &LottoError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Ticket board
    /// Tickets drawn by one command.
    fn tickets(&self, tickets: &[TicketReport]);
    /// Board state after an interactive action.
    fn board_event(&self, event: BoardEvent, report: &TicketReport);

    // Theme and palettes
    fn theme(&self, view: &ThemeView);
    fn palettes(&self, palettes: &[&Palette]);

    // Configuration
    fn config(&self, config: &LottoConfig, path: &Path, exists: bool);
    fn config_path(&self, path: &Path);

    // Web interface
    fn serve_started(&self, url: &str);

    // Metadata
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>);

    // Visual separators
    fn rule(&self, title: Option<&str>);
}
