//! Basic CLI E2E tests.
//!
//! Tests invoke the built `studyplan` binary with HOME pointed at a scratch
//! directory and verify outputs.

use std::io::Write;
use std::process::{Command, Stdio};

fn cli(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_studyplan"));
    cmd.env("HOME", home.path())
        .env_remove("STUDYPLAN_ENV")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(home: &tempfile::TempDir, args: &[&str]) -> (i32, String, String) {
    let output = cli(home)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Run a CLI command with `input` on stdin.
fn run_cli_with_input(home: &tempfile::TempDir, args: &[&str], input: &str) -> (i32, String, String) {
    let mut child = cli(home)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn test_sort_orders_by_priority_then_difficulty() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(
        &home,
        &[
            "sort",
            "-t",
            "A:urgent:easy:1",
            "-t",
            "B:high:hard:2",
            "-t",
            "C:urgent:hard:1",
        ],
    );
    assert_eq!(code, 0, "sort failed: {stderr}");
    let a = stdout.find("1. A").expect("A listed first");
    let c = stdout.find("2. C").expect("C listed second");
    let b = stdout.find("3. B").expect("B listed third");
    assert!(a < c && c < b);
    assert!(stdout.contains("Estimated time: 1h 40m"));
}

#[test]
fn test_sort_json() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&home, &["sort", "--json", "-t", "x:low", "-t", "y:urgent"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks[0]["name"], "y");
    assert_eq!(tasks[0]["order"], 1);
    assert_eq!(tasks[1]["name"], "x");
}

#[test]
fn test_sort_rejects_bad_task_flag() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(&home, &["sort", "-t", "x:someday"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("someday"));
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&home, &["config", "get", "schedule.focus_duration"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");

    let (code, stdout, _) = run_cli(&home, &["config", "set", "schedule.focus_duration", "50"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (_, stdout, _) = run_cli(&home, &["config", "get", "schedule.focus_duration"]);
    assert_eq!(stdout.trim(), "50");

    let (code, _, _) = run_cli(&home, &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(&home, &["config", "get", "schedule.focus_duration"]);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_rejects_unknown_key_and_zero_duration() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(&home, &["config", "get", "schedule.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));

    let (code, _, _) = run_cli(&home, &["config", "set", "schedule.short_break", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_path_and_list() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&home, &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("studyplan/config.toml"));

    let (code, stdout, _) = run_cli(&home, &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("timer.auto_start_next_phase = false"));
}

#[test]
fn test_extract_without_api_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(&home, &["extract", "study for the exam"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_run_requires_tasks() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli_with_input(&home, &["run"], "q\n");
    assert_ne!(code, 0);
    assert!(stderr.contains("empty task queue"));
}

#[test]
fn test_run_status_and_quit() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli_with_input(
        &home,
        &["run", "-t", "Essay:high:hard:2", "-t", "Reading:low"],
        "st\nc\ns\nq\n",
    );
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stdout.contains("Session started with 2 task(s)."));
    assert!(stdout.contains("Now: Essay"));
    assert!(stdout.contains("active | Work Session"));
    // Completing before the work phase ends is refused.
    assert!(stderr.contains("No work phase has finished for the active task yet"));
    assert!(stdout.contains("Skipped to task 2."));
    assert!(stdout.contains("Completed 0 of 2 task(s)"));
}

#[test]
fn test_run_json_events() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli_with_input(&home, &["run", "--json", "-t", "Quiz"], "t\nq\n");
    assert_eq!(code, 0);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect();
    assert_eq!(events[0]["type"], "SessionStarted");
    assert_eq!(events[1]["type"], "PhaseStarted");
    assert_eq!(events[1]["phase"], "work");
    assert!(events.iter().any(|e| e["type"] == "TimerPaused"));
}
