//! Integration tests for the `netatlas` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live monitor backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

// A port nothing listens on; connection attempts fail fast.
const DEAD_BACKEND: &str = "http://127.0.0.1:1";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `netatlas` binary with env isolation.
///
/// Clears all `NETATLAS_*` env vars and points config directories at a
/// throwaway path so tests never touch the user's real configuration.
fn netatlas_cmd() -> Command {
    let mut cmd = Command::cargo_bin("netatlas").unwrap();
    cmd.env("HOME", "/tmp/netatlas-cli-test")
        .env("XDG_CONFIG_HOME", "/tmp/netatlas-cli-test/.config")
        .env("XDG_DATA_HOME", "/tmp/netatlas-cli-test/.local/share")
        .env_remove("NETATLAS_URL")
        .env_remove("NETATLAS_OUTPUT")
        .env_remove("NETATLAS_TIMEOUT")
        .env_remove("NO_COLOR");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = netatlas_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    netatlas_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("network diagram")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("layout"))
            .and(predicate::str::contains("logs")),
    );
}

#[test]
fn test_version_flag() {
    netatlas_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("netatlas"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    netatlas_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    netatlas_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = netatlas_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_status_unreachable_backend_exits_7() {
    let output = netatlas_cmd()
        .args(["status", "--backend", DEAD_BACKEND])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[test]
fn test_logs_unreachable_backend_exits_7() {
    let output = netatlas_cmd()
        .args(["logs", "--backend", DEAD_BACKEND])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[test]
fn test_add_missing_name_is_usage_error() {
    let output = netatlas_cmd()
        .args(["add", "10.0.0.1", "--location", "PGCIL"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}

#[test]
fn test_add_empty_location_is_validation_error() {
    // The backend is never reached: validation fires before the request.
    let output = netatlas_cmd()
        .args([
            "add",
            "10.0.0.1",
            "--location",
            "",
            "--name",
            "Switch A",
            "--backend",
            DEAD_BACKEND,
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    let text = combined_output(&output);
    assert!(text.contains("location"), "{text}");
}

#[test]
fn test_delete_without_yes_requires_confirmation() {
    // Non-interactive stdin without --yes must refuse, not hang.
    let output = netatlas_cmd()
        .args(["delete", "10.0.0.1", "--backend", DEAD_BACKEND])
        .write_stdin("")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    let text = combined_output(&output);
    assert!(text.contains("confirmation") || text.contains("--yes"), "{text}");
}

#[test]
fn test_invalid_backend_url_is_usage_error() {
    let output = netatlas_cmd()
        .args(["status", "--backend", "not a url"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}
