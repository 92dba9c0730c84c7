//! Structured logging initialization for the lotto CLI.
//!
//! Logs always go to stderr so stdout stays clean for tickets and robot JSON.

use std::io;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::cli::Cli;

/// Shape of log lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines, for robot mode.
    Json,
    /// Full format for an interactive terminal.
    Styled,
    /// Single-line plain format for pipes and files.
    Compact,
}

/// Subscriber settings resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub directive: &'static str,
    pub ansi: bool,
}

impl LogSettings {
    /// Settings for `cli`; `stderr_tty` tells whether stderr is a terminal.
    ///
    /// `-q` wins over `-v`. From `-v` on, the web server's request spans
    /// (`tower_http`) are logged alongside lotto's own.
    pub fn for_cli(cli: &Cli, stderr_tty: bool) -> Self {
        let format = if cli.use_json() {
            LogFormat::Json
        } else if stderr_tty {
            LogFormat::Styled
        } else {
            LogFormat::Compact
        };
        let directive = match (cli.quiet, cli.verbose) {
            (true, _) => "lotto=error",
            (false, 0) => "lotto=info",
            (false, 1) => "lotto=debug,tower_http=debug",
            (false, _) => "lotto=trace,tower_http=trace",
        };
        Self {
            format,
            directive,
            ansi: format == LogFormat::Styled && !cli.no_color,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive))
    }
}

/// Install the global tracing subscriber.
///
/// # Environment Variables
///
/// * `RUST_LOG` - Override the directive (e.g., "lotto=debug,tower_http=warn")
///
/// # Output Behavior
///
/// | Mode | TTY | Output |
/// |------|-----|--------|
/// | Robot | any | JSON lines to stderr |
/// | Human | yes | Full output, coloured unless `--no-color` |
/// | Human | no | Compact plain output |
pub fn init_logging(settings: &LogSettings) {
    let layer = match settings.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Styled => fmt::layer()
            .with_ansi(settings.ansi)
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(false)
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(settings.filter())
        .with(layer)
        .init();
}
