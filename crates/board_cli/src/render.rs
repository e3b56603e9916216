use board_core::board::BoardState;
use board_core::config::Palette;
use board_core::model::{Task, columns, format_created_at};
use tabled::builder::Builder;
use tabled::settings::Style;

fn card(task: &Task, generating: bool, palette: &Palette) -> String {
    let mut lines = vec![task.title.clone(), palette.mutedize(&format!("#{}", task.id))];
    if let Some(description) = task.description.as_deref() {
        lines.push(palette.mutedize(description));
    }
    for step in &task.substeps {
        lines.push(format!("{} {}", checkbox(step.completed), step.text));
    }
    if generating {
        lines.push(palette.mutedize("thinking..."));
    }
    lines.join("\n")
}

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// The three columns side by side, each card in list order.
pub fn board_table(state: &BoardState, palette: &Palette) -> String {
    let columns = columns(&state.tasks);
    let mut builder = Builder::default();

    builder.push_record(columns.iter().map(|(status, tasks)| {
        palette.accentize(*status, &format!("{} ({})", status.title(), tasks.len()))
    }));

    let depth = columns.iter().map(|(_, tasks)| tasks.len()).max().unwrap_or(0);
    for row in 0..depth {
        builder.push_record(columns.iter().map(|(_, tasks)| {
            tasks
                .get(row)
                .map(|task| card(task, state.generating.contains(&task.id), palette))
                .unwrap_or_default()
        }));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn task_detail(task: &Task, palette: &Palette) -> String {
    let mut lines = vec![
        format!("{} ({})", task.title, task.id),
        format!("status: {}", palette.accentize(task.status, task.status.title())),
        format!("created: {}", format_created_at(task.created_at)),
    ];
    if let Some(description) = task.description.as_deref() {
        lines.push(format!("description: {description}"));
    }
    if task.substeps.is_empty() {
        lines.push(palette.mutedize("no sub-steps"));
    }
    for step in &task.substeps {
        lines.push(format!(
            "  {} {} {}",
            checkbox(step.completed),
            step.text,
            palette.mutedize(&format!("({})", step.id))
        ));
    }
    lines.join("\n")
}

pub fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "description": task.description,
        "status": task.status,
        "substeps": task.substeps,
        "createdAt": task.created_at,
    })
}

pub fn board_json(state: &BoardState, banner: Option<&str>) -> serde_json::Value {
    let columns: Vec<serde_json::Value> = columns(&state.tasks)
        .into_iter()
        .map(|(status, tasks)| {
            serde_json::json!({
                "status": status,
                "title": status.title(),
                "tasks": tasks.into_iter().map(task_json).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::json!({
        "columns": columns,
        "generating": state.generating,
        "banner": banner,
    })
}

#[cfg(test)]
mod tests {
    use super::{board_json, board_table, task_detail};
    use board_core::board::{BoardState, example_tasks};
    use board_core::config::palette_for_theme;

    fn state() -> BoardState {
        BoardState {
            tasks: example_tasks(0),
            ..BoardState::default()
        }
    }

    #[test]
    fn table_lists_columns_with_counts() {
        let rendered = board_table(&state(), &palette_for_theme(None));

        assert!(rendered.contains("To Do (1)"));
        assert!(rendered.contains("In Progress (1)"));
        assert!(rendered.contains("Done (0)"));
        assert!(rendered.contains("Set up project repository"));
        assert!(rendered.contains("[x] Define User table"));
        assert!(rendered.contains("[ ] Define Task table"));
    }

    #[test]
    fn generating_tasks_are_marked() {
        let mut state = state();
        state.generating.insert("t1".to_string());

        let rendered = board_table(&state, &palette_for_theme(None));

        assert!(rendered.contains("thinking..."));
    }

    #[test]
    fn json_groups_tasks_by_column() {
        let value = board_json(&state(), Some("boom"));

        assert_eq!(value["columns"][0]["status"], "TODO");
        assert_eq!(value["columns"][0]["tasks"][0]["id"], "t1");
        assert_eq!(value["columns"][1]["tasks"][0]["substeps"][1]["id"], "s2");
        assert!(value["columns"][2]["tasks"].as_array().unwrap().is_empty());
        assert_eq!(value["banner"], "boom");
    }

    #[test]
    fn detail_shows_substep_ids() {
        let tasks = example_tasks(0);
        let rendered = task_detail(&tasks[1], &palette_for_theme(None));

        assert!(rendered.starts_with("Design database schema (t2)"));
        assert!(rendered.contains("status: In Progress"));
        assert!(rendered.contains("[x] Define User table (s1)"));
        assert!(rendered.contains("created: 1969-12-31T23:59:50Z"));
    }
}
