use crate::model::Task;
use crate::storage::Storage;

pub const STORAGE_KEY: &str = "kanban_tasks_v1";

/// Mirrors the full task list to a [`Storage`] under [`STORAGE_KEY`].
///
/// Neither direction reports failure to the caller: a bad read yields an
/// empty board and a failed write leaves the in-memory list authoritative.
#[derive(Debug, Clone)]
pub struct TaskStore<S> {
    storage: S,
}

impl<S: Storage> TaskStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load(&self) -> Vec<Task> {
        let content = match self.storage.get(STORAGE_KEY) {
            Ok(Some(content)) => content,
            Ok(None) => {
                tracing::debug!(key = STORAGE_KEY, "no stored tasks");
                return Vec::new();
            }
            Err(err) => {
                tracing::warn!(key = STORAGE_KEY, error = %err, "failed to read tasks");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&content) {
            Ok(tasks) => {
                tracing::debug!(key = STORAGE_KEY, count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(err) => {
                tracing::warn!(key = STORAGE_KEY, error = %err, "stored tasks are corrupt");
                Vec::new()
            }
        }
    }

    pub fn save(&self, tasks: &[Task]) {
        let content = match serde_json::to_string(tasks) {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize tasks");
                return;
            }
        };

        match self.storage.set(STORAGE_KEY, &content) {
            Ok(()) => tracing::debug!(key = STORAGE_KEY, count = tasks.len(), "saved tasks"),
            Err(err) => tracing::error!(key = STORAGE_KEY, error = %err, "failed to save tasks"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{STORAGE_KEY, TaskStore};
    use crate::model::{SubStep, Task, TaskStatus};
    use crate::storage::MemoryStorage;

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task {
                id: "t1".to_string(),
                title: "Set up project repository".to_string(),
                description: Some("Initialize Git".to_string()),
                status: TaskStatus::Todo,
                substeps: Vec::new(),
                created_at: 1_700_000_000_000,
            },
            Task {
                id: "t2".to_string(),
                title: "Design database schema".to_string(),
                description: None,
                status: TaskStatus::Done,
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
                created_at: 1_699_999_990_000,
            },
        ]
    }

    #[test]
    fn save_and_load_round_trip() {
        let store = TaskStore::new(MemoryStorage::new());
        let tasks = sample_tasks();

        store.save(&tasks);

        assert_eq!(store.load(), tasks);
    }

    #[test]
    fn empty_list_round_trips() {
        let store = TaskStore::new(MemoryStorage::new());
        store.save(&[]);

        assert_eq!(store.storage().raw(STORAGE_KEY).as_deref(), Some("[]"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn stored_value_is_a_bare_array() {
        let store = TaskStore::new(MemoryStorage::new());
        store.save(&sample_tasks());

        let raw = store.storage().raw(STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[1]["createdAt"], 1_699_999_990_000_i64);
    }

    #[test]
    fn absent_value_loads_empty() {
        let store = TaskStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty() {
        let storage = MemoryStorage::new();
        storage.put_raw(STORAGE_KEY, "{ not json");
        let store = TaskStore::new(storage);

        assert!(store.load().is_empty());
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let storage = MemoryStorage::new();
        storage.put_raw(STORAGE_KEY, r#"{"tasks": []}"#);
        let store = TaskStore::new(storage);

        assert!(store.load().is_empty());
    }

    #[test]
    fn failed_write_is_swallowed() {
        let storage = MemoryStorage::new();
        let store = TaskStore::new(storage.clone());
        store.save(&sample_tasks());
        storage.fail_writes(true);

        store.save(&[]);

        assert_eq!(store.load(), sample_tasks());
    }
}
