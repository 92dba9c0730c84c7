//! Human-friendly output implementation using console.

use std::path::Path;

use console::{Style, Term};
use tracing::{debug, instrument, trace};

use crate::config::LottoConfig;
use crate::error::LottoError;
use crate::palette::Palette;
use crate::theme::{TerminalTheme, Theme, ThemeView};

use super::{BoardEvent, Output, TicketReport};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    out: Term,
    err: Term,
    theme: TerminalTheme,
}

impl HumanOutput {
    #[instrument]
    pub fn new(theme: Theme) -> Self {
        debug!("Creating HumanOutput");
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: TerminalTheme::for_theme(theme),
        }
    }

    fn print(&self, line: &str) {
        if let Err(e) = self.out.write_line(line) {
            trace!(error = %e, "stdout closed");
        }
    }

    fn eprint(&self, line: &str) {
        if let Err(e) = self.err.write_line(line) {
            trace!(error = %e, "stderr closed");
        }
    }

    fn width(&self) -> usize {
        usize::from(self.out.size().1).clamp(20, 100)
    }

    fn labelled(&self, name: &str, value: &str, value_style: &Style) {
        self.print(&format!(
            "  {}{}",
            self.theme.label.apply_to(format!("{name:<10}")),
            value_style.apply_to(value)
        ));
    }

    fn ticket_block(&self, report: &TicketReport) {
        self.print(&format!("  {}", report.text));
        if let Some(time) = &report.view.draw_time {
            self.print(&format!(
                "  {} {}",
                self.theme.label.apply_to("Drawn at"),
                self.theme.muted.apply_to(time)
            ));
        }
    }
}

impl Output for HumanOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Outputting success");
        self.print(&format!("{} {message}", self.theme.success.apply_to("[OK]")));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &LottoError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        self.eprint(&format!(
            "{} {}",
            self.theme.error.apply_to("[ERR]"),
            Style::new().bold().apply_to(error)
        ));
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            self.eprint(&format!(
                "  {} {}",
                self.theme.label.apply_to("Suggestion:"),
                self.theme.muted.apply_to(suggestion)
            ));
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Outputting warning");
        self.eprint(&format!("{} {message}", self.theme.warning.apply_to("[WARN]")));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Outputting info");
        self.print(&format!("{} {message}", self.theme.accent.apply_to("[INFO]")));
    }

    #[instrument(skip(self, tickets), fields(count = tickets.len()))]
    fn tickets(&self, tickets: &[TicketReport]) {
        debug!("Outputting tickets");
        for (index, report) in tickets.iter().enumerate() {
            if tickets.len() > 1 {
                let header = format!("Ticket {}", index + 1);
                self.print(&self.theme.header.apply_to(header).to_string());
            }
            self.ticket_block(report);
        }
    }

    #[instrument(skip(self, report))]
    fn board_event(&self, event: BoardEvent, report: &TicketReport) {
        trace!("Outputting board event");
        let label = match event {
            BoardEvent::Generated => "Generated".to_string(),
            BoardEvent::Shuffled => "Shuffled".to_string(),
            BoardEvent::Tapped { position } => format!("Tapped ball {position}"),
        };
        self.print(&self.theme.accent.apply_to(label).to_string());
        self.ticket_block(report);
    }

    #[instrument(skip(self, view), fields(theme = %view.theme))]
    fn theme(&self, view: &ThemeView) {
        debug!("Outputting theme");
        self.labelled("Theme", view.theme.as_str(), &self.theme.value);
        self.labelled("Toggle", view.toggle_label, &self.theme.muted);
    }

    #[instrument(skip(self, palettes), fields(count = palettes.len()))]
    fn palettes(&self, palettes: &[&Palette]) {
        debug!("Outputting palettes");
        self.print(&self.theme.header.apply_to("Ball palettes").to_string());
        for palette in palettes {
            let swatch = Style::new()
                .bold()
                .color256(palette.text.to_ansi256())
                .on_color256(palette.gradient.from.to_ansi256());
            self.print(&format!(
                "  {} {:<6} {} -> {}  ring {}  text {}",
                swatch.apply_to(" 00 "),
                palette.band.to_string(),
                palette.gradient.from,
                palette.gradient.to,
                palette.ring.css(),
                palette.text
            ));
        }
    }

    #[instrument(skip(self, config))]
    fn config(&self, config: &LottoConfig, path: &Path, exists: bool) {
        debug!("Outputting config");
        let source = if exists {
            path.display().to_string()
        } else {
            format!("{} (not found, using defaults)", path.display())
        };
        self.labelled("File", &source, &self.theme.muted);
        self.rule(Some("board"));
        let board = &config.board;
        self.labelled("Step", &format!("{}ms", board.delay_step_ms), &self.theme.value);
        self.labelled("Shuffle", &format!("0-{}ms", board.shuffle_max_delay_ms), &self.theme.value);
        self.labelled(
            "Sizes",
            &format!("{}px / {}px bonus", board.main_ball_size_px, board.bonus_ball_size_px),
            &self.theme.value,
        );
        self.labelled("Time", &board.time_format, &self.theme.value);
        self.rule(Some("serve"));
        self.labelled("Address", &config.serve.addr(), &self.theme.value);
        if let Some(dir) = &config.state_dir {
            self.labelled("State", &dir.display().to_string(), &self.theme.value);
        }
    }

    fn config_path(&self, path: &Path) {
        self.print(&path.display().to_string());
    }

    #[instrument(skip(self))]
    fn serve_started(&self, url: &str) {
        self.success(&format!("Serving on {url}"));
        self.print(&self.theme.muted.apply_to("Press Ctrl+C to stop").to_string());
    }

    #[instrument(skip(self))]
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        debug!(version, ?git_sha, ?build_time, "Outputting version info");
        self.print(&self.theme.header.apply_to("lotto").to_string());
        self.labelled("Version", version, &self.theme.value);

        if let Some(sha) = git_sha {
            let dirty =
                sha.contains("dirty") || matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true"));
            let clean_sha = sha.replace(" (dirty)", "").replace("(dirty)", "");
            let shown = if dirty {
                format!("{} {}", clean_sha.trim(), self.theme.warning.apply_to("(dirty)"))
            } else {
                clean_sha.trim().to_string()
            };
            self.labelled("Git SHA", &shown, &self.theme.value);
        }
        if let Some(time) = build_time {
            self.labelled("Built", time, &self.theme.muted);
        }
        if let Some(rustc) = option_env!("VERGEN_RUSTC_SEMVER") {
            self.labelled("Rust", rustc, &self.theme.muted);
        }
        if let Some(target) = option_env!("VERGEN_CARGO_TARGET_TRIPLE") {
            self.labelled("Target", target, &self.theme.muted);
        }
    }

    fn rule(&self, title: Option<&str>) {
        let width = self.width();
        let line = match title {
            Some(t) => {
                let pad = width.saturating_sub(t.chars().count() + 4);
                format!("── {t} {}", "─".repeat(pad))
            }
            None => "─".repeat(width),
        };
        self.print(&self.theme.muted.apply_to(line).to_string());
    }
}
