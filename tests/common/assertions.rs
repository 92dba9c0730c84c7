//! Custom assertion helpers for tests.
#![allow(dead_code)]

use tracing::error;

#[must_use]
pub fn assert_json_has_fields(json_str: &str, fields: &[&str]) -> serde_json::Value {
    let value: serde_json::Value =
        serde_json::from_str(json_str).expect("invalid JSON payload");
    for field in fields {
        if value.get(field).is_none() {
            error!(field, json = %value, "Missing expected JSON field");
            panic!("Missing JSON field: {field}");
        }
    }
    value
}

pub fn assert_no_ansi(output: &str) {
    if output.contains("\u{1b}[") {
        error!("ANSI escape sequence detected");
        panic!("Expected no ANSI escape sequences");
    }
}

pub fn assert_contains_all(output: &str, expected: &[&str]) {
    for needle in expected {
        if !output.contains(needle) {
            error!(needle, "Missing expected substring");
            panic!("Missing expected substring: {needle}");
        }
    }
}

/// Check the ticket invariants on a robot-mode ticket object.
pub fn assert_valid_ticket(ticket: &serde_json::Value) {
    let numbers: Vec<u64> = ticket["numbers"]
        .as_array()
        .expect("numbers is not an array")
        .iter()
        .map(|ball| ball["number"].as_u64().expect("number is not an integer"))
        .collect();
    let bonus = ticket["bonus"][0]["number"]
        .as_u64()
        .expect("bonus number missing");

    assert_eq!(numbers.len(), 6, "expected 6 main numbers in {ticket}");
    assert!(numbers.windows(2).all(|w| w[0] < w[1]), "not ascending: {numbers:?}");
    assert!(numbers.iter().all(|n| (1..=45).contains(n)), "out of range: {numbers:?}");
    assert!((1..=45).contains(&bonus), "bonus out of range: {bonus}");
    assert!(!numbers.contains(&bonus), "bonus {bonus} repeats a main number");
}
