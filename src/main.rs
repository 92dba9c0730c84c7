//! Lotto CLI - Draw lotto tickets as animated, colour-coded balls.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use console::{Style, Term};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use lotto::cli::{self, Cli, Commands, ThemeAction};
use lotto::config::{LottoConfig, default_config_path, load_or_default, resolve_state_dir};
use lotto::error::Result;
use lotto::logging::{LogSettings, init_logging};
use lotto::output::{BoardEvent, Output, OutputMode, TicketReport};
use lotto::palette::all_palettes;
use lotto::state::FileStore;
use lotto::theme::{Theme, ThemeController, environment_scheme};
use lotto::ticket::{BallSlot, Clock, SystemClock, TicketBuilder};
use lotto::web::{self, AppState};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }
}

/// Delay between terminal animation frames.
const FRAME: Duration = Duration::from_millis(40);

fn main() {
    let cli = Cli::parse();

    // Handle no-color flag or non-TTY
    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }
    if cli.no_color || !io::stderr().is_terminal() {
        console::set_colors_enabled_stderr(false);
    }

    init_logging(&LogSettings::for_cli(&cli, io::stderr().is_terminal()));

    if let Err(e) = run(&cli) {
        let theme = environment_scheme().unwrap_or_default();
        OutputMode::from_cli(&cli, theme).into_output().error(&e);
        std::process::exit(1);
    }
}

/// Everything a command needs once config and preferences are loaded.
struct App<'a> {
    cli: &'a Cli,
    config: LottoConfig,
    config_path: PathBuf,
    theme: ThemeController<FileStore>,
    output: Box<dyn Output>,
}

impl<'a> App<'a> {
    fn load(cli: &'a Cli) -> Result<Self> {
        let config = load_or_default(cli.config.as_deref())?;
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        let state_dir = resolve_state_dir(cli.state_dir.as_deref(), config.state_dir.as_deref())?;
        debug!(state_dir = %state_dir.display(), "State directory resolved");

        let store = FileStore::in_dir(&state_dir);
        let theme = ThemeController::init_theme(store, environment_scheme());
        let output = OutputMode::from_cli(cli, theme.theme()).into_output();
        Ok(Self {
            cli,
            config,
            config_path,
            theme,
            output,
        })
    }

    fn is_robot(&self) -> bool {
        self.cli.use_json()
    }

    /// Re-create the output after the theme changed.
    fn restyle(&mut self) {
        self.output = OutputMode::from_cli(self.cli, self.theme.theme()).into_output();
    }

    fn board(&self, seed: Option<u64>) -> TicketBuilder<StdRng, SystemClock> {
        TicketBuilder::new(self.config.board.clone(), make_rng(seed), SystemClock::new())
    }

    /// Board already showing its opening ticket.
    fn drawn_board(&self, seed: Option<u64>) -> TicketBuilder<StdRng, SystemClock> {
        TicketBuilder::drawn(self.config.board.clone(), make_rng(seed), SystemClock::new())
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Commands that need no config or preferences.
    match &cli.command {
        Some(Commands::Completions(args)) => return cmd_completions(args),
        Some(Commands::Version) => {
            OutputMode::from_cli(cli, Theme::default())
                .into_output()
                .version_info(
                    build_info::VERSION,
                    Some(build_info::git_sha()),
                    Some(build_info::build_timestamp()),
                );
            return Ok(());
        }
        None => return print_quick_start(cli),
        _ => {}
    }

    let mut app = App::load(cli)?;
    match &cli.command {
        Some(Commands::Generate(args)) => cmd_generate(&app, args),
        Some(Commands::Play(args)) => cmd_play(&mut app, args),
        Some(Commands::Palettes) => cmd_palettes(&app),
        Some(Commands::Theme(args)) => cmd_theme(&mut app, args),
        Some(Commands::Config(args)) => cmd_config(&app, args),
        Some(Commands::Serve(args)) => cmd_serve(app, args),
        Some(Commands::Version | Commands::Completions(_)) | None => Ok(()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start(cli);
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_robot_quick_start(cli: &Cli) {
    let help = RobotQuickStart {
        tool: "lotto",
        version: build_info::VERSION,
        description: "Lotto ticket generator with animated balls and robot mode",
        tickets: RobotTickets {
            generate: "lotto generate --robot",
            reproducible: "lotto generate --seed 42 --robot",
            several: "lotto generate --count 5 --robot",
            interactive: "lotto play --robot (stdin: g, s, t, 1-7, q)",
        },
        theme: RobotTheme {
            show: "lotto theme --robot",
            toggle: "lotto theme toggle --robot",
            set: "lotto theme light | lotto theme dark",
        },
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
        web_ui: "lotto serve --port 8420",
    };

    let encoded = if cli.use_compact_json() {
        serde_json::to_string(&help)
    } else {
        serde_json::to_string_pretty(&help)
    };
    match encoded {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "JSON serialization failed"),
    }
}

fn print_human_quick_start() {
    let title = Style::new().bold().cyan();
    let heading = Style::new().bold().underlined();
    let cmd = Style::new().green();

    println!("{} {} - Lotto ticket generator\n", title.apply_to("lotto"), build_info::VERSION);

    println!("{}", heading.apply_to("QUICK START"));
    println!();
    println!("  {}  Draw a ticket", cmd.apply_to("lotto generate"));
    println!("  {}  Watch the balls drop in", cmd.apply_to("lotto generate --animate"));
    println!("  {}  Interactive board", cmd.apply_to("lotto play"));
    println!("  {}  Switch light/dark", cmd.apply_to("lotto theme toggle"));
    println!("  {}  Open the web page", cmd.apply_to("lotto serve"));
    println!();

    println!("{}", heading.apply_to("ROBOT MODE (for AI agents)"));
    println!();
    println!("  {}  JSON output", Style::new().cyan().apply_to("lotto --robot <command>"));
    println!("  {}  Quick-start JSON", Style::new().cyan().apply_to("lotto --robot"));
    println!();

    println!("Run {} for full help", Style::new().yellow().apply_to("lotto --help"));
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    tickets: RobotTickets,
    theme: RobotTheme,
    output_modes: OutputModes,
    web_ui: &'static str,
}

#[derive(Serialize)]
struct RobotTickets {
    generate: &'static str,
    reproducible: &'static str,
    several: &'static str,
    interactive: &'static str,
}

#[derive(Serialize)]
struct RobotTheme {
    show: &'static str,
    toggle: &'static str,
    set: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

fn cmd_generate(app: &App<'_>, args: &cli::GenerateArgs) -> Result<()> {
    let mut board = app.board(args.seed);
    let animate = args.animate && !app.is_robot();

    let mut reports = Vec::with_capacity(usize::from(args.count));
    for _ in 0..args.count {
        board.generate_ticket();
        if animate {
            play_animation(&board)?;
        }
        reports.push(report(&board));
    }
    app.output.tickets(&reports);
    Ok(())
}

fn cmd_play(app: &mut App<'_>, args: &cli::PlayArgs) -> Result<()> {
    let mut board = app.drawn_board(args.seed);
    let animate = !app.is_robot();
    if animate {
        app.output
            .info("g generate, s shuffle, t toggle theme, 1-7 tap a ball, q quit");
        play_animation(&board)?;
    }
    app.output.board_event(BoardEvent::Generated, &report(&board));

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = line.trim();
        let event = match command {
            "" => continue,
            "q" | "quit" => break,
            "g" => {
                board.generate_ticket();
                BoardEvent::Generated
            }
            "s" => {
                board.shuffle_delays();
                BoardEvent::Shuffled
            }
            "t" => {
                app.theme.toggle_theme()?;
                app.restyle();
                app.output.theme(&app.theme.view());
                continue;
            }
            other => {
                let Some((position, slot)) = other
                    .parse::<usize>()
                    .ok()
                    .and_then(|p| BallSlot::from_position(p).map(|slot| (p, slot)))
                else {
                    app.output.warning(&format!("Unknown command '{other}'"));
                    continue;
                };
                if !board.tap(slot) {
                    app.output.warning("Draw a ticket first (g)");
                    continue;
                }
                BoardEvent::Tapped { position }
            }
        };

        if animate {
            play_animation(&board)?;
        }
        app.output.board_event(event, &report(&board));
    }
    info!("Play session ended");
    Ok(())
}

fn cmd_palettes(app: &App<'_>) -> Result<()> {
    let palettes: Vec<_> = all_palettes().collect();
    app.output.palettes(&palettes);
    Ok(())
}

fn cmd_theme(app: &mut App<'_>, args: &cli::ThemeArgs) -> Result<()> {
    match args.action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            app.theme.toggle_theme()?;
        }
        ThemeAction::Light => app.theme.set_theme(Theme::Light)?,
        ThemeAction::Dark => app.theme.set_theme(Theme::Dark)?,
    }
    app.restyle();
    app.output.theme(&app.theme.view());
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_config(app: &App<'_>, args: &cli::ConfigArgs) -> Result<()> {
    if args.path {
        app.output.config_path(&app.config_path);
    } else {
        app.output
            .config(&app.config, &app.config_path, app.config_path.is_file());
    }
    Ok(())
}

fn cmd_serve(app: App<'_>, args: &cli::ServeArgs) -> Result<()> {
    let mut serve = app.config.serve.clone();
    if let Some(port) = args.port {
        serve.port = port;
    }
    if let Some(bind) = &args.bind {
        serve.bind.clone_from(bind);
    }
    serve.validate()?;

    let board = app.drawn_board(None);
    let state = AppState::new(board, app.theme);
    let output = app.output;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(&serve.addr(), state, |url| output.serve_started(url)))
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "lotto", &mut io::stdout());
    Ok(())
}

// === Utility Functions ===

fn report<C: Clock>(board: &TicketBuilder<StdRng, C>) -> TicketReport {
    TicketReport {
        view: board.view(),
        text: board.render_settled_text(),
    }
}

/// Redraw the board in place until every animation has settled.
fn play_animation<C: Clock>(board: &TicketBuilder<StdRng, C>) -> Result<()> {
    let term = Term::stdout();
    if !term.is_term() {
        return Ok(());
    }
    term.hide_cursor()?;
    while !board.is_settled() {
        term.write_line(&format!("  {}", board.render_text()))?;
        std::thread::sleep(FRAME);
        term.clear_last_lines(1)?;
    }
    term.show_cursor()?;
    Ok(())
}
