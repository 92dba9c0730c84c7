//! CLI argument definitions and command dispatch.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lotto - Draw lotto tickets as animated, colour-coded balls.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "lotto", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "LOTTO_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only log errors)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Config file (TOML or YAML)
    #[arg(long, global = true, env = "LOTTO_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding saved preferences
    #[arg(long, global = true, env = "LOTTO_STATE_DIR", value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Tickets ===
    /// Draw tickets
    Generate(GenerateArgs),

    /// Interactive board: g generate, s shuffle, t theme, 1-7 tap, q quit
    Play(PlayArgs),

    /// Show the ball colour palettes
    Palettes,

    // === Preferences ===
    /// Show or change the light/dark theme
    Theme(ThemeArgs),

    /// Show current configuration
    Config(ConfigArgs),

    // === Web Interface ===
    /// Start the local web page and JSON API
    Serve(ServeArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug, Default)]
pub struct GenerateArgs {
    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Play the ball entrance in the terminal
    #[arg(long, short = 'a')]
    pub animate: bool,

    /// Number of tickets to draw
    #[arg(
        long,
        short = 'n',
        default_value = "1",
        value_parser = clap::value_parser!(u16).range(1..=50)
    )]
    pub count: u16,
}

#[derive(Parser, Debug)]
pub struct PlayArgs {
    /// Seed for reproducible draws
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct ThemeArgs {
    /// What to do with the theme
    #[arg(default_value = "show")]
    pub action: ThemeAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    /// Show the applied theme
    #[default]
    Show,
    /// Switch between light and dark
    Toggle,
    /// Use the light theme
    Light,
    /// Use the dark theme
    Dark,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show configuration file path
    #[arg(long)]
    pub path: bool,
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Bind address (overrides config)
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
