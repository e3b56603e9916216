use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("kanban-{nanos}-{name}"))
}

fn run(store_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kanban"))
        .args(args)
        .env("KANBAN_STORE_DIR", store_dir)
        .env("KANBAN_CONFIG_PATH", store_dir.join("config.json"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .output()
        .expect("failed to run kanban")
}

fn stored(store_dir: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(store_dir.join("kanban_tasks_v1.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn ids(tasks: &serde_json::Value) -> Vec<String> {
    tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn delete_command_removes_task() {
    let dir = temp_dir("cli-delete");

    let output = run(&dir, &["delete", "t1"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Deleted task: Set up project repository (t1)"));
    assert_eq!(ids(&tasks), vec!["t2"]);
}

#[test]
fn delete_command_reports_missing_id_and_keeps_store() {
    let dir = temp_dir("cli-delete-missing");

    let output = run(&dir, &["delete", "t9"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - task not found"));
    assert_eq!(ids(&tasks), vec!["t1", "t2"]);
}

#[test]
fn toggle_command_flips_substep() {
    let dir = temp_dir("cli-toggle");

    let first = run(&dir, &["toggle", "t2", "s2"]);
    let after_first = stored(&dir);
    let second = run(&dir, &["toggle", "t2", "s2"]);
    let after_second = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(first.status.success());
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("Toggled sub-step: [x] Define Task table (s2)"));
    assert_eq!(after_first[1]["substeps"][1]["completed"], true);
    assert_eq!(after_second[1]["substeps"][1]["completed"], false);
}

#[test]
fn toggle_command_rejects_unknown_step() {
    let dir = temp_dir("cli-toggle-missing");

    let output = run(&dir, &["toggle", "t2", "s9"]);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sub-step not found"));
}

#[test]
fn status_command_keeps_position() {
    let dir = temp_dir("cli-status");

    let output = run(&dir, &["status", "t1", "done"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Moved task: Set up project repository (t1) [DONE]"));
    assert_eq!(ids(&tasks), vec!["t1", "t2"]);
    assert_eq!(tasks[0]["status"], "DONE");
}

#[test]
fn status_command_rejects_unknown_status() {
    let dir = temp_dir("cli-status-bad");

    let output = run(&dir, &["status", "t1", "blocked"]);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - unknown status"));
}

#[test]
fn move_command_reorders_without_status_change() {
    let dir = temp_dir("cli-move");

    let before = run(&dir, &["move", "t2", "--before", "t1"]);
    let after_before = stored(&dir);
    let last = run(&dir, &["move", "t2"]);
    let after_last = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(before.status.success());
    assert!(last.status.success());
    assert_eq!(ids(&after_before), vec!["t2", "t1"]);
    assert_eq!(after_before[0]["status"], "IN_PROGRESS");
    assert_eq!(ids(&after_last), vec!["t1", "t2"]);
}
