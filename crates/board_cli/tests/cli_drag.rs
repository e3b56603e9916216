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
fn drag_onto_task_in_other_column_lands_before_it() {
    let dir = temp_dir("cli-drag-task");

    run(&dir, &["add", "Extra"]);
    let added = stored(&dir);
    let extra = added[2]["id"].as_str().unwrap().to_string();

    let output = run(&dir, &["drag", &extra, "--onto-task", "t2"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[IN_PROGRESS]"));
    assert_eq!(ids(&tasks), vec!["t1".to_string(), extra, "t2".to_string()]);
    assert_eq!(tasks[1]["status"], "IN_PROGRESS");
}

#[test]
fn drag_onto_empty_done_column_appends() {
    let dir = temp_dir("cli-drag-column");

    let output = run(&dir, &["drag", "t1", "--onto-column", "done", "--json"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "DONE");
    assert_eq!(ids(&tasks), vec!["t2", "t1"]);
    assert_eq!(tasks[1]["status"], "DONE");
}

#[test]
fn drag_within_column_takes_target_slot() {
    let dir = temp_dir("cli-drag-same-column");

    run(&dir, &["add", "Second todo"]);
    let added = stored(&dir);
    let second = added[2]["id"].as_str().unwrap().to_string();

    let output = run(&dir, &["drag", &second, "--onto-task", "t1"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    assert_eq!(ids(&tasks), vec![second, "t1".to_string(), "t2".to_string()]);
    assert_eq!(tasks[0]["status"], "TODO");
}

#[test]
fn drag_onto_itself_changes_nothing() {
    let dir = temp_dir("cli-drag-self");

    run(&dir, &["board"]);
    let before = stored(&dir);
    let output = run(&dir, &["drag", "t1", "--onto-task", "t1"]);
    let after = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    assert_eq!(before, after);
}

#[test]
fn drag_rejects_unknown_target() {
    let dir = temp_dir("cli-drag-missing");

    let output = run(&dir, &["drag", "t1", "--onto-task", "t9"]);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("task not found"));
}

#[test]
fn keyboard_drag_moves_right_across_columns() {
    let dir = temp_dir("cli-keys");

    let output = run(&dir, &["keys", "t1", "right", "right"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    assert_eq!(ids(&tasks), vec!["t2", "t1"]);
    assert_eq!(tasks[1]["status"], "DONE");
}

#[test]
fn keyboard_drag_reorders_within_column() {
    let dir = temp_dir("cli-keys-vertical");

    run(&dir, &["add", "Second todo"]);
    let output = run(&dir, &["keys", "t1", "down"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let order = ids(&tasks);
    assert_eq!(order[2], "t1");
    assert_eq!(tasks[2]["status"], "TODO");
}

#[test]
fn space_drops_before_remaining_keys() {
    let dir = temp_dir("cli-keys-space");

    let output = run(&dir, &["keys", "t1", "right", "space", "right"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    assert_eq!(ids(&tasks), vec!["t2", "t1"]);
    assert_eq!(tasks[1]["status"], "IN_PROGRESS");
}

#[test]
fn keyboard_drag_rejects_unknown_key() {
    let dir = temp_dir("cli-keys-bad");

    let output = run(&dir, &["keys", "t1", "sideways"]);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown key"));
}
