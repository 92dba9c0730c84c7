//! Robot mode JSON contracts.

use serde_json::Value;

use crate::common::assertions::{assert_json_has_fields, assert_valid_ticket};
use crate::common::cli::CliRunner;
use crate::common::fixtures::{SAMPLE_TOML, Workspace};

#[test]
fn test_quick_start_json() {
    let cli = CliRunner::new();
    let result = cli.run_robot(&[]);
    result
        .assert_success()
        .assert_json_field("/tool", &Value::from("lotto"))
        .assert_json_field_exists("/tickets/generate")
        .assert_json_field_exists("/theme/toggle");
}

#[test]
fn test_generate_single_ticket() {
    let cli = CliRunner::new();
    let result = cli.run_robot(&["generate"]);
    result
        .assert_success()
        .assert_json_array_len("/numbers", 6)
        .assert_json_array_len("/bonus", 1)
        .assert_json_field("/bonus/0/bonus", &Value::Bool(true))
        .assert_json_field("/celebrations", &Value::from(1));

    let ticket = assert_json_has_fields(&result.stdout, &["id", "numbers", "bonus", "draw_time"]);
    assert_valid_ticket(&ticket);
    for (index, ball) in ticket["numbers"].as_array().unwrap().iter().enumerate() {
        assert_eq!(ball["delay_ms"], Value::from(130 * index as u64));
        let gradient = ball["colors"]["gradient"].as_str().unwrap();
        assert!(gradient.starts_with("linear-gradient(135deg"));
    }
}

#[test]
fn test_seed_is_reproducible() {
    let cli = CliRunner::new();
    let first = cli.run_robot(&["generate", "--seed", "2024"]).json();
    let second = cli.run_robot(&["generate", "--seed", "2024"]).json();
    let other = cli.run_robot(&["generate", "--seed", "2025"]).json();

    assert_eq!(first["numbers"], second["numbers"]);
    assert_eq!(first["bonus"], second["bonus"]);
    assert_ne!(first["id"], second["id"]);
    assert_ne!(
        (first["numbers"].clone(), first["bonus"].clone()),
        (other["numbers"].clone(), other["bonus"].clone())
    );
}

#[test]
fn test_count_returns_array() {
    let cli = CliRunner::new();
    let result = cli.run_robot(&["generate", "--count", "3", "--seed", "1"]);
    result.assert_success().assert_json_array_len("", 3);

    let tickets = result.json();
    for ticket in tickets.as_array().unwrap() {
        assert_valid_ticket(ticket);
    }
    assert_eq!(tickets[2]["celebrations"], Value::from(3));
}

#[test]
fn test_compact_json_is_one_line() {
    let cli = CliRunner::new();
    let result = cli.run(&["--format", "json-compact", "generate"]);
    result.assert_success();
    assert_eq!(result.stdout.trim().lines().count(), 1);
    assert_valid_ticket(&result.json());
}

#[test]
fn test_palettes_lists_bands_and_bonus() {
    let cli = CliRunner::new();
    let result = cli.run_robot(&["palettes"]);
    result.assert_success().assert_json_array_len("", 6);

    let palettes = result.json();
    assert_eq!(palettes[0]["band"]["kind"], Value::from("range"));
    assert_eq!(palettes[0]["band"]["min"], Value::from(1));
    assert_eq!(palettes[4]["band"]["max"], Value::from(45));
    assert_eq!(palettes[5]["band"]["kind"], Value::from("bonus"));
    assert!(palettes[5]["ring"].as_str().unwrap().starts_with("rgba("));
}

#[test]
fn test_theme_toggle_persists() {
    let cli = CliRunner::new();

    cli.run_robot(&["theme"])
        .assert_success()
        .assert_json_field("/theme", &Value::from("light"))
        .assert_json_field("/source", &Value::from("default"));

    cli.run_robot(&["theme", "toggle"])
        .assert_success()
        .assert_json_field("/theme", &Value::from("dark"))
        .assert_json_field("/toggle_label", &Value::from("Light Mode"));

    cli.run_robot(&["theme"])
        .assert_success()
        .assert_json_field("/theme", &Value::from("dark"))
        .assert_json_field("/source", &Value::from("saved"));

    let saved = std::fs::read_to_string(cli.state_dir().join("preferences.json")).unwrap();
    assert!(saved.contains("dark"));
}

#[test]
fn test_explicit_theme_overrides_saved() {
    let cli = CliRunner::new();
    cli.run_robot(&["theme", "dark"]).assert_success();
    cli.run_robot(&["theme", "light"])
        .assert_success()
        .assert_json_field("/theme", &Value::from("light"));
}

#[test]
fn test_config_reports_file() {
    let ws = Workspace::new();
    let path = ws.write("lotto.toml", SAMPLE_TOML);
    let cli = CliRunner::new();

    let result = cli.run_robot(&["--config", path.to_str().unwrap(), "config"]);
    result
        .assert_success()
        .assert_json_field("/exists", &Value::Bool(true))
        .assert_json_field("/config/board/delay_step_ms", &Value::from(200))
        .assert_json_field("/config/serve/port", &Value::from(9000));
}

#[test]
fn test_config_changes_generated_delays() {
    let ws = Workspace::new();
    let path = ws.write("lotto.toml", SAMPLE_TOML);
    let cli = CliRunner::new();

    cli.run_robot(&["--config", path.to_str().unwrap(), "generate"])
        .assert_success()
        .assert_json_field("/numbers/1/delay_ms", &Value::from(200))
        .assert_json_field("/bonus/0/delay_ms", &Value::from(1200));
}

#[test]
fn test_missing_config_is_json_error() {
    let ws = Workspace::new();
    let missing = ws.path().join("absent.toml");
    let cli = CliRunner::new();

    let result = cli.run_robot(&["--config", missing.to_str().unwrap(), "generate"]);
    result.assert_failure().assert_exit_code(1).assert_stdout_is_empty();

    let err = result.stderr_json();
    assert_eq!(err["error"], Value::Bool(true));
    assert_eq!(err["recoverable"], Value::Bool(true));
    assert!(err["suggestion"].is_string());
}

#[test]
fn test_version_json() {
    let cli = CliRunner::new();
    cli.run_robot(&["version"])
        .assert_success()
        .assert_json_field("/version", &Value::from(env!("CARGO_PKG_VERSION")))
        .assert_json_field_exists("/git_sha");
}
