mod task;

pub use task::{SubStep, Task, TaskStatus, columns, format_created_at, partition};
