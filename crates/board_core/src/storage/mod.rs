use crate::error::AppError;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

mod file_store;
mod task_store;

pub use file_store::{FileStorage, store_dir};
pub use task_store::{STORAGE_KEY, TaskStore};

/// Synchronous key-value port the board state is persisted through.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail, like a full browser quota.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_writes.get() {
            return Err(AppError::io("storage quota exceeded"));
        }
        self.put_raw(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStorage, Storage};

    #[test]
    fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("k", "v").unwrap();

        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn failing_writes_leave_previous_value() {
        let storage = MemoryStorage::new();
        storage.set("k", "old").unwrap();
        storage.fail_writes(true);

        let err = storage.set("k", "new").unwrap_err();

        assert_eq!(err.code(), "io_error");
        assert_eq!(storage.raw("k").as_deref(), Some("old"));
    }
}
