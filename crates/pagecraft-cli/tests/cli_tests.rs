//! Integration tests for the `pagecraft` CLI binary.
//!
//! These run the CLI as a subprocess and check exit codes and output. None of
//! them need a running server: remote commands are pointed at a closed port.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn pagecraft_bin() -> String {
    let path = env!("CARGO_BIN_EXE_pagecraft");
    assert!(
        Path::new(path).exists(),
        "pagecraft binary not found at {path}"
    );
    path.to_owned()
}

/// Run pagecraft with args and return (`exit_code`, stdout, stderr).
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(pagecraft_bin())
        .args(args)
        .env("PAGECRAFT_ADDR", "http://127.0.0.1:19999")
        .env_remove("PAGECRAFT_TOKEN")
        .output()
        .expect("failed to execute pagecraft");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

fn run_json(args: &[&str]) -> Value {
    let (code, stdout, stderr) = run(args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).unwrap()
}

// ── Version & help ───────────────────────────────────────────────────

#[test]
fn test_version_flag() {
    let (code, stdout, _) = run(&["--version"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pagecraft"), "{stdout}");
}

#[test]
fn test_help_lists_commands() {
    let (code, stdout, _) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Pagecraft CLI"));
    for command in ["generate", "pages", "leads", "stats", "theme", "highlights"] {
        assert!(stdout.contains(command), "help should list '{command}'");
    }
}

#[test]
fn test_subcommand_help() {
    for sub in ["generate", "theme", "highlights"] {
        let (code, stdout, _) = run(&[sub, "--help"]);
        assert_eq!(code, 0, "{sub} --help should exit 0");
        assert!(!stdout.is_empty());
    }
}

// ── Theme (local) ────────────────────────────────────────────────────

#[test]
fn test_theme_defaults() {
    let out = run_json(&["theme", "--json"]);
    assert_eq!(out["theme"]["mode"], "white");
    assert_eq!(out["classes"]["background"], "bg-white");
    assert!(out["accent_rgba"].is_null());
}

#[test]
fn test_theme_black_with_opacity() {
    let out = run_json(&[
        "theme", "--mode", "black", "--accent", "#336699", "--opacity", "0.5", "--json",
    ]);
    assert_eq!(out["theme"]["mode"], "black");
    assert_eq!(out["theme"]["accentColor"], "#336699");
    assert_eq!(out["classes"]["background"], "bg-black");
    assert_eq!(out["accent_rgba"], "rgba(51, 102, 153, 0.5)");
}

#[test]
fn test_theme_invalid_accent_falls_back() {
    let (code, stdout, _) = run(&["theme", "--accent", "orange"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("using the default"), "{stdout}");
}

// ── Highlights (local) ───────────────────────────────────────────────

#[test]
fn test_highlights_toggle() {
    let out = run_json(&["highlights", "toggle", "Fast", "--current", "Smart", "--json"]);
    assert_eq!(out["highlights"], serde_json::json!(["Smart", "Fast"]));

    let out = run_json(&["highlights", "toggle", "Fast", "--current", "Smart,Fast", "--json"]);
    assert_eq!(out["highlights"], serde_json::json!(["Smart"]));
}

#[test]
fn test_highlights_cleanup() {
    let out = run_json(&[
        "highlights", "cleanup", "Fast shipping", "--current", "Fast,Cheap", "--json",
    ]);
    assert_eq!(out["highlights"], serde_json::json!(["Fast"]));
}

#[test]
fn test_highlights_suggest_caps_at_three() {
    let out = run_json(&[
        "highlights",
        "suggest",
        "Smart fast simple powerful secure modern tools",
        "--json",
    ]);
    assert!(out["highlights"].as_array().unwrap().len() <= 3);
}

// ── Remote commands without a server ─────────────────────────────────

#[test]
fn test_generate_requires_prompt() {
    let (code, _, stderr) = run(&["generate"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("required") || stderr.contains("error"), "{stderr}");
}

#[test]
fn test_pages_without_token_fails() {
    let (code, _, stderr) = run(&["pages"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("PAGECRAFT_TOKEN"), "{stderr}");
}

#[test]
fn test_status_unreachable_server_fails() {
    let (code, _, stderr) = run(&["status"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("127.0.0.1:19999"), "{stderr}");
}
