//! CLI test runner with fluent assertions.
//!
//! Runs the compiled `lotto` binary with an isolated home, config and state
//! directory so tests never touch the developer's real preferences.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;
use tempfile::TempDir;

/// Variables a developer shell may carry that would change CLI behaviour.
const SCRUBBED_ENV: [&str; 5] = [
    "LOTTO_FORMAT",
    "LOTTO_THEME",
    "LOTTO_CONFIG",
    "COLORFGBG",
    "NO_COLOR",
];

/// Runner for the `lotto` binary.
///
/// # Example
///
/// ```ignore
/// let cli = CliRunner::new().with_stdin("g\nq\n");
/// cli.run(&["--format", "json-compact", "play"])
///    .assert_success()
///    .assert_stdout_contains("generated");
/// ```
pub struct CliRunner {
    binary_path: PathBuf,
    env_vars: HashMap<String, String>,
    stdin: Option<String>,
    home: TempDir,
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRunner {
    #[must_use]
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("Failed to create temp home");
        let mut env_vars = HashMap::new();
        env_vars.insert("RUST_LOG".to_string(), "off".to_string());
        for (key, dir) in [
            ("HOME", home.path().to_path_buf()),
            ("XDG_CONFIG_HOME", home.path().join("config")),
            ("LOTTO_STATE_DIR", home.path().join("state")),
        ] {
            env_vars.insert(key.to_string(), dir.display().to_string());
        }
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_lotto")),
            env_vars,
            stdin: None,
            home,
        }
    }

    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Text fed to the command's stdin; stdin is closed afterwards.
    #[must_use]
    pub fn with_stdin(mut self, stdin: &str) -> Self {
        self.stdin = Some(stdin.to_string());
        self
    }

    #[must_use]
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Directory holding `preferences.json` unless overridden.
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.home.path().join("state")
    }

    #[must_use]
    pub fn run(&self, args: &[&str]) -> CliResult {
        let start = Instant::now();

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.envs(&self.env_vars);

        let mut child = cmd.spawn().expect("Failed to spawn lotto");
        let mut stdin = child.stdin.take().expect("stdin not piped");
        if let Some(input) = &self.stdin {
            stdin.write_all(input.as_bytes()).expect("Failed to write stdin");
        }
        drop(stdin);
        let output = child.wait_with_output().expect("Failed to wait for lotto");

        CliResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Run with `--robot` prepended.
    #[must_use]
    pub fn run_robot(&self, args: &[&str]) -> CliResult {
        let mut full_args = vec!["--robot"];
        full_args.extend(args);
        self.run(&full_args)
    }
}

/// Captured output of one run.
#[derive(Debug, Clone)]
pub struct CliResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
    pub args: Vec<String>,
}

impl CliResult {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success(),
            "{:?} exited with {}:\n{}",
            self.args,
            self.exit_code,
            self.stderr
        );
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success(), "{:?} unexpectedly succeeded", self.args);
        self
    }

    pub fn assert_exit_code(&self, expected: i32) -> &Self {
        assert_eq!(self.exit_code, expected, "exit code of {:?}", self.args);
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "stdout lacks \"{text}\":\n{}",
            self.stdout
        );
        self
    }

    pub fn assert_stdout_matches(&self, pattern: &str) -> &Self {
        let re = regex::Regex::new(pattern).expect("Invalid regex pattern");
        assert!(
            re.is_match(&self.stdout),
            "stdout does not match /{pattern}/:\n{}",
            self.stdout
        );
        self
    }

    pub fn assert_stdout_is_empty(&self) -> &Self {
        assert!(self.stdout.is_empty(), "expected empty stdout, got:\n{}", self.stdout);
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "stderr lacks \"{text}\":\n{}",
            self.stderr
        );
        self
    }

    // === JSON (robot mode) ===

    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|_| panic!("stdout is not JSON:\n{}", self.stdout))
    }

    /// Each non-empty stdout line parsed as JSON.
    #[must_use]
    pub fn json_lines(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).unwrap_or_else(|_| panic!("not a JSON line: {line}"))
            })
            .collect()
    }

    #[must_use]
    pub fn stderr_json(&self) -> Value {
        serde_json::from_str(&self.stderr)
            .unwrap_or_else(|_| panic!("stderr is not JSON:\n{}", self.stderr))
    }

    pub fn assert_json_field(&self, pointer: &str, expected: &Value) -> &Self {
        let json = self.json();
        let actual = json
            .pointer(pointer)
            .unwrap_or_else(|| panic!("{pointer} missing in:\n{json:#}"));
        assert_eq!(actual, expected, "JSON field {pointer}");
        self
    }

    pub fn assert_json_field_exists(&self, pointer: &str) -> &Self {
        assert!(self.json().pointer(pointer).is_some(), "{pointer} missing");
        self
    }

    pub fn assert_json_array_len(&self, pointer: &str, expected: usize) -> &Self {
        let json = self.json();
        let len = json
            .pointer(pointer)
            .and_then(Value::as_array)
            .unwrap_or_else(|| panic!("{pointer} is not an array"))
            .len();
        assert_eq!(len, expected, "length of {pointer}");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_isolates_state() {
        let cli = CliRunner::new();
        cli.run_robot(&["theme", "dark"]).assert_success();
        assert!(cli.state_dir().join("preferences.json").is_file());
        assert!(cli.state_dir().starts_with(cli.home()));
    }

    #[test]
    fn test_runner_robot_quick_start() {
        CliRunner::new()
            .run_robot(&[])
            .assert_success()
            .assert_json_field("/tool", &Value::from("lotto"));
    }

    #[test]
    fn test_runner_invalid_command() {
        CliRunner::new().run(&["nonexistent-command"]).assert_failure();
    }
}
