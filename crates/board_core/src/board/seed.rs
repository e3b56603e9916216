use crate::model::{SubStep, Task, TaskStatus};

/// Example tasks written to an empty store on first open.
pub fn example_tasks(now: i64) -> Vec<Task> {
    vec![
        Task {
            id: "t1".to_string(),
            title: "Set up project repository".to_string(),
            description: Some("Initialize Git, setup Vite and Tailwind".to_string()),
            status: TaskStatus::Todo,
            substeps: Vec::new(),
            created_at: now,
        },
        Task {
            id: "t2".to_string(),
            title: "Design database schema".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            substeps: vec![
                SubStep {
                    id: "s1".to_string(),
                    text: "Define User table".to_string(),
                    completed: true,
                },
                SubStep {
                    id: "s2".to_string(),
                    text: "Define Task table".to_string(),
                    completed: false,
                },
            ],
            created_at: now - 10_000,
        },
    ]
}
