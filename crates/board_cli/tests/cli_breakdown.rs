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

fn step_texts(task: &serde_json::Value) -> Vec<String> {
    task["substeps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|step| step["text"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn breakdown_without_key_appends_fallback_steps() {
    let dir = temp_dir("cli-breakdown-fallback");

    let output = run(&dir, &["breakdown", "t1"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added 2 sub-steps to: Set up project repository (t1)"));
    assert_eq!(
        step_texts(&tasks[0]),
        vec!["Check API Key Configuration", "Manually add steps"]
    );
    assert_eq!(tasks[0]["substeps"][0]["completed"], false);
}

#[test]
fn breakdown_appends_after_existing_steps() {
    let dir = temp_dir("cli-breakdown-append");

    let output = run(&dir, &["breakdown", "t2", "--offline"]);
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    assert_eq!(
        step_texts(&tasks[1]),
        vec![
            "Define User table",
            "Define Task table",
            "Check API Key Configuration",
            "Manually add steps"
        ]
    );
}

#[test]
fn breakdown_failure_shows_banner_and_keeps_steps() {
    let dir = temp_dir("cli-breakdown-failure");

    let output = run(
        &dir,
        &[
            "breakdown",
            "t2",
            "--config-override",
            "api_key=test-key",
            "--config-override",
            "endpoint=http://127.0.0.1:1",
        ],
    );
    let tasks = stored(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to generate breakdown. Check API Key or try again."));
    assert!(stderr.contains("ERROR: generation_error"));
    assert_eq!(
        step_texts(&tasks[1]),
        vec!["Define User table", "Define Task table"]
    );
}

#[test]
fn breakdown_rejects_unknown_task() {
    let dir = temp_dir("cli-breakdown-missing");

    let output = run(&dir, &["breakdown", "t9"]);
    std::fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - task not found"));
}
