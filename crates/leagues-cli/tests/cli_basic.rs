//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with HOME pointed at a fresh temp dir,
//! so the data directory starts empty.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(home, args, "")
}

fn run_cli_with_input(home: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_leagues"))
        .args(args)
        .env("HOME", home)
        .env_remove("LEAGUES_ENV")
        .env_remove("LEAGUES_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn goals_json(home: &Path) -> Vec<serde_json::Value> {
    serde_json::from_str(&run_ok(home, &["goal", "list", "--json"])).unwrap()
}

#[test]
fn test_first_run_has_starter_goal() {
    let home = tempfile::tempdir().unwrap();
    let goals = goals_json(home.path());
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["name"], "My First Goal");
    assert_eq!(goals[0]["current"], true);
    assert_eq!(goals[0]["progress"]["next_tier"], 20);
    assert!(home.path().join(".config/leagues/leagues.db").exists());
}

#[test]
fn test_goal_new_select_and_rename() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["goal", "new", "Reading"]);
    let event: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(event["type"], "GoalCreated");

    let goals = goals_json(home.path());
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[1]["name"], "Reading");
    assert_eq!(goals[1]["current"], true);

    run_ok(home.path(), &["goal", "select", "My First Goal"]);
    run_ok(home.path(), &["goal", "rename", "Walking"]);
    let goals = goals_json(home.path());
    assert_eq!(goals[0]["name"], "Walking");
    assert_eq!(goals[0]["current"], true);
}

#[test]
fn test_goal_new_from_stdin() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli_with_input(home.path(), &["goal", "new"], "Guitar\n");
    assert_eq!(code, 0);
    assert!(stderr.contains("New goal name:"));
    assert!(goals_json(home.path()).iter().any(|g| g["name"] == "Guitar"));
}

#[test]
fn test_delete_last_goal_is_refused() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["goal", "delete", "--yes"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("You need at least one goal."));
}

#[test]
fn test_delete_without_confirmation_keeps_goal() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["goal", "new", "Other"]);
    let (_, stderr, code) = run_cli_with_input(home.path(), &["goal", "delete"], "n\n");
    assert_eq!(code, 0);
    assert!(stderr.contains("Delete this goal?"));
    assert_eq!(goals_json(home.path()).len(), 2);

    run_ok(home.path(), &["goal", "delete", "--yes"]);
    assert_eq!(goals_json(home.path()).len(), 1);
}

#[test]
fn test_session_start_and_stop() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["session", "start"]);

    let status: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["session", "status", "--json"])).unwrap();
    assert_eq!(status["state"], "running");

    let (_, stderr, code) = run_cli(home.path(), &["session", "start"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already running"));

    let out = run_ok(home.path(), &["session", "stop", "--note", "quick"]);
    let event: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(event["type"], "SessionStopped");

    let status: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["session", "status", "--json"])).unwrap();
    assert_eq!(status["state"], "idle");
}

#[test]
fn test_stop_without_session_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["session", "stop", "--note", "x"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("No session is running."));
}

#[test]
fn test_empty_log_feed() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["log"]);
    assert_eq!(out.trim(), "No logs yet. Start walking!");
    let out = run_ok(home.path(), &["log", "--json"]);
    assert_eq!(out.trim(), "[]");
}

#[test]
fn test_status_json() {
    let home = tempfile::tempdir().unwrap();
    let status: serde_json::Value =
        serde_json::from_str(&run_ok(home.path(), &["status", "--json"])).unwrap();
    assert_eq!(status["goal_name"], "My First Goal");
    assert_eq!(status["leagues"], "0.0");
    assert_eq!(status["session"], "idle");
    assert!(status["user_id"].is_null());
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(home.path(), &["config", "get", "pomodoro.focus_minutes"]).trim(), "25");
    run_ok(home.path(), &["config", "set", "pomodoro.focus_minutes", "50"]);
    assert_eq!(run_ok(home.path(), &["config", "get", "pomodoro.focus_minutes"]).trim(), "50");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "nope.nothing"]);
    assert_eq!(code, 1);
}

#[test]
fn test_auth_login_migrates_goals() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["goal", "new", "Portable"]);

    let out = run_ok(home.path(), &["auth", "login", "--user", "alice"]);
    assert!(out.contains("local goals copied"));
    assert!(home.path().join(".config/leagues/remote/alice.json").exists());
    assert!(run_ok(home.path(), &["auth", "status"]).contains("Signed in as alice"));

    run_ok(home.path(), &["goal", "new", "Cloud only"]);
    run_ok(home.path(), &["auth", "logout"]);
    let names: Vec<_> = goals_json(home.path())
        .iter()
        .map(|g| g["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["My First Goal", "Portable"]);
}

#[test]
fn test_reset_requires_yes() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["goal", "new", "Doomed"]);

    let (_, stderr, code) = run_cli_with_input(home.path(), &["reset"], "\n");
    assert_eq!(code, 0);
    assert!(stderr.contains("Delete ALL goals and logs?"));
    assert_eq!(goals_json(home.path()).len(), 2);

    run_ok(home.path(), &["reset", "--yes"]);
    let goals = goals_json(home.path());
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["name"], "My First Goal");
}

#[test]
fn test_pomodoro_quits_on_q() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli_with_input(home.path(), &["pomodoro"], "q\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Focus 25:00"));
    assert!(stderr.contains("focus 25:00, break 05:00"));
}

#[test]
fn test_pomodoro_minutes_override_config() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli_with_input(
        home.path(),
        &["pomodoro", "--focus-minutes", "50", "--break-minutes", "10"],
        "q\n",
    );
    assert_eq!(code, 0);
    assert!(stderr.contains("focus 50:00, break 10:00"));
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let out = run_ok(home.path(), &["completions", "bash"]);
    assert!(out.contains("leagues"));
}
