//! Human-readable output checks.
//!
//! Stdout is a pipe here, so styling is off and output is plain text.

use crate::common::assertions::{assert_contains_all, assert_no_ansi};
use crate::common::cli::CliRunner;

#[test]
fn test_quick_start_text() {
    let cli = CliRunner::new();
    let result = cli.run(&[]);
    result
        .assert_success()
        .assert_stdout_contains("QUICK START")
        .assert_stdout_contains("lotto generate");
    assert_no_ansi(&result.stdout);
}

#[test]
fn test_generate_prints_board_and_draw_time() {
    let cli = CliRunner::new();
    let result = cli.run(&["generate", "--seed", "5"]);
    result
        .assert_success()
        .assert_stdout_contains("Drawn at")
        .assert_stdout_contains("+")
        .assert_stdout_matches(r"\b\d{2}:\d{2}\b");
    assert_no_ansi(&result.stdout);
}

#[test]
fn test_generate_matches_robot_numbers() {
    let cli = CliRunner::new();
    let robot = cli.run_robot(&["generate", "--seed", "77"]).json();
    let human = cli.run(&["generate", "--seed", "77"]);

    for ball in robot["numbers"].as_array().unwrap() {
        let label = format!("{:02}", ball["number"].as_u64().unwrap());
        human.assert_stdout_contains(&label);
    }
}

#[test]
fn test_animate_flag_is_harmless_without_terminal() {
    let cli = CliRunner::new();
    cli.run(&["generate", "--animate"])
        .assert_success()
        .assert_stdout_contains("Drawn at");
}

#[test]
fn test_several_tickets_are_headed() {
    let cli = CliRunner::new();
    let result = cli.run(&["generate", "-n", "2"]);
    result.assert_success();
    assert_contains_all(&result.stdout, &["Ticket 1", "Ticket 2"]);
}

#[test]
fn test_palettes_text() {
    let cli = CliRunner::new();
    let result = cli.run(&["palettes"]);
    result.assert_success();
    assert_contains_all(
        &result.stdout,
        &["Ball palettes", "1-10", "11-20", "21-30", "31-40", "41-45", "bonus"],
    );
}

#[test]
fn test_theme_text_names_toggle() {
    let cli = CliRunner::new();
    cli.run(&["theme", "dark"])
        .assert_success()
        .assert_stdout_contains("dark")
        .assert_stdout_contains("Light Mode");
}

#[test]
fn test_invalid_config_reports_error_on_stderr() {
    let cli = CliRunner::new();
    let result = cli.run(&["--config", "/definitely/not/here.toml", "generate"]);
    result
        .assert_failure()
        .assert_stderr_contains("[ERR]")
        .assert_stderr_contains("Suggestion:");
}

#[test]
fn test_version_text() {
    let cli = CliRunner::new();
    cli.run(&["version"])
        .assert_success()
        .assert_stdout_contains(env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_fails() {
    let cli = CliRunner::new();
    cli.run(&["draw-everything"]).assert_failure().assert_exit_code(2);
}
