//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, error, instrument, trace};

use crate::config::LottoConfig;
use crate::error::LottoError;
use crate::palette::Palette;
use crate::theme::ThemeView;

use super::{BoardEvent, Output, RobotFormat, TicketReport};

/// JSON output implementation for AI agents and scripting.
///
/// Results go to stdout, errors to stderr.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn encode<T: Serialize + ?Sized>(&self, data: &T) -> Option<String> {
        let encoded = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        match encoded {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                Some(json)
            }
            Err(e) => {
                error!(error = %e, "JSON serialization failed");
                None
            }
        }
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        if let Some(json) = self.encode(data) {
            println!("{json}");
        }
    }

    /// Output single-line JSON (for streamed events).
    fn output_json_line<T: Serialize>(&self, data: &T) {
        match serde_json::to_string(data) {
            Ok(json) => println!("{json}"),
            Err(e) => error!(error = %e, "JSON serialization failed"),
        }
    }
}

impl Output for RobotOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Robot: success");
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &LottoError) {
        debug!(error = %error, "Robot: error");
        if let Some(json) = self.encode(&serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        })) {
            eprintln!("{json}");
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Robot: warning");
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Robot: info");
        self.output_json(&serde_json::json!({
            "info": true,
            "message": message
        }));
    }

    #[instrument(skip(self, tickets), fields(count = tickets.len()))]
    fn tickets(&self, tickets: &[TicketReport]) {
        debug!("Robot: tickets");
        match tickets {
            [single] => self.output_json(single),
            many => self.output_json(many),
        }
    }

    #[instrument(skip(self, report))]
    fn board_event(&self, event: BoardEvent, report: &TicketReport) {
        trace!("Robot: board_event");
        self.output_json_line(&serde_json::json!({
            "event": event,
            "ticket": report,
        }));
    }

    #[instrument(skip(self, view))]
    fn theme(&self, view: &ThemeView) {
        debug!("Robot: theme");
        self.output_json(view);
    }

    #[instrument(skip(self, palettes), fields(count = palettes.len()))]
    fn palettes(&self, palettes: &[&Palette]) {
        debug!("Robot: palettes");
        self.output_json(palettes);
    }

    #[instrument(skip(self, config))]
    fn config(&self, config: &LottoConfig, path: &Path, exists: bool) {
        debug!("Robot: config");
        self.output_json(&serde_json::json!({
            "path": path.display().to_string(),
            "exists": exists,
            "config": config,
        }));
    }

    fn config_path(&self, path: &Path) {
        self.output_json(&serde_json::json!({ "path": path.display().to_string() }));
    }

    #[instrument(skip(self))]
    fn serve_started(&self, url: &str) {
        debug!(url, "Robot: serve_started");
        self.output_json_line(&serde_json::json!({ "serving": true, "url": url }));
    }

    #[instrument(skip(self))]
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        debug!(version, ?git_sha, ?build_time, "Robot: version_info");
        self.output_json(&serde_json::json!({
            "version": version,
            "git_sha": git_sha,
            "build_time": build_time
        }));
    }

    fn rule(&self, _title: Option<&str>) {
        trace!("Robot: rule (no-op)");
    }
}
